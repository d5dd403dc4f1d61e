//! Constraint expressions: linear expression with comparison sense and RHS.

use crate::expr::linear::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "==",
        }
    }

    /// Check `lhs <sense> rhs` with an absolute tolerance.
    pub fn is_satisfied(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ComparisonSense::LessEqual => lhs <= rhs + tolerance,
            ComparisonSense::GreaterEqual => lhs >= rhs - tolerance,
            ComparisonSense::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }

    /// Interval `[lower, upper]` admitted by `expr <sense> rhs`.
    pub fn bounds(self, rhs: f64) -> (f64, f64) {
        match self {
            ComparisonSense::LessEqual => (f64::NEG_INFINITY, rhs),
            ComparisonSense::GreaterEqual => (rhs, f64::INFINITY),
            ComparisonSense::Equal => (rhs, rhs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::ComparisonSense;

    #[test]
    fn sense_bounds() {
        assert_eq!(ComparisonSense::Equal.bounds(1.0), (1.0, 1.0));
        let (lower, upper) = ComparisonSense::LessEqual.bounds(3.0);
        assert!(lower.is_infinite());
        assert_eq!(upper, 3.0);
    }

    #[test]
    fn sense_satisfaction_uses_tolerance() {
        assert!(ComparisonSense::LessEqual.is_satisfied(1.0 + 1e-9, 1.0, 1e-6));
        assert!(!ComparisonSense::GreaterEqual.is_satisfied(0.5, 1.0, 1e-6));
        assert!(ComparisonSense::Equal.is_satisfied(0.9999999, 1.0, 1e-6));
        assert_eq!(ComparisonSense::Equal.symbol(), "==");
    }
}
