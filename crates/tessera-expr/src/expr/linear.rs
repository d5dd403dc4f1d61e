//! Affine expressions `Σ coeff·var + constant`.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::ids::VariableId;
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Terms are kept in insertion order and may repeat a variable until
/// [`Expr::normalized_terms`] merges them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    terms: Vec<(VariableId, f64)>,
    constant: f64,
}

impl Expr {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(terms: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self { terms, constant }
    }

    pub fn from_constant(constant: f64) -> Self {
        Self::new(Vec::new(), constant)
    }

    /// `coeff * var`; a zero coefficient yields the empty expression.
    pub fn term(var: VariableId, coeff: f64) -> Self {
        let terms = if coeff == 0.0 { Vec::new() } else { vec![(var, coeff)] };
        Self::new(terms, 0.0)
    }

    pub fn var(var: VariableId) -> Self {
        Self::term(var, 1.0)
    }

    /// Unit-coefficient sum, the shape of every cover and capacity row.
    pub fn sum(vars: impl IntoIterator<Item = VariableId>) -> Self {
        Self::new(vars.into_iter().map(|var| (var, 1.0)).collect(), 0.0)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn into_linear_terms(self) -> Vec<(VariableId, f64)> {
        self.terms
    }

    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms, self.constant)
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Variables unknown to `value` count as zero.
    pub fn evaluate(&self, value: impl Fn(VariableId) -> Option<f64>) -> f64 {
        self.terms.iter().fold(self.constant, |acc, (var, coeff)| {
            acc + coeff * value(*var).unwrap_or(0.0)
        })
    }

    pub fn add_constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    /// Duplicates merged, zeros dropped, ordered by variable id.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for &(var, coeff) in &self.terms {
            *merged.entry(var).or_insert(0.0) += coeff;
        }
        merged.into_iter().filter(|&(_, coeff)| coeff != 0.0).collect()
    }

    /// `self <sense> rhs`, with every constant moved to the right-hand side.
    pub fn compare(self, sense: ComparisonSense, rhs: impl Into<Expr>) -> ConstraintExpr {
        let Expr { terms, constant } = self - rhs.into();
        ConstraintExpr::new(Expr::new(terms, 0.0), sense, -constant)
    }

    pub fn leq(self, rhs: impl Into<Expr>) -> ConstraintExpr {
        self.compare(ComparisonSense::LessEqual, rhs)
    }

    pub fn geq(self, rhs: impl Into<Expr>) -> ConstraintExpr {
        self.compare(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn equals(self, rhs: impl Into<Expr>) -> ConstraintExpr {
        self.compare(ComparisonSense::Equal, rhs)
    }
}

impl From<f64> for Expr {
    fn from(constant: f64) -> Self {
        Expr::from_constant(constant)
    }
}

impl From<VariableId> for Expr {
    fn from(var: VariableId) -> Self {
        Expr::var(var)
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(mut self, rhs: Expr) -> Expr {
        self += rhs;
        self
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, by: f64) -> Expr {
        let terms = self
            .terms
            .into_iter()
            .map(|(var, coeff)| (var, coeff * by))
            .filter(|&(_, coeff)| coeff != 0.0)
            .collect();
        Expr::new(terms, self.constant * by)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self * -1.0
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + (-rhs)
    }
}

impl std::iter::Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        iter.fold(Expr::zero(), Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::VariableId;
    use crate::expr::{ComparisonSense, Expr};

    fn x() -> VariableId {
        VariableId::new(1)
    }

    fn y() -> VariableId {
        VariableId::new(2)
    }

    #[test]
    fn zero_coefficient_term_is_empty() {
        assert!(Expr::term(x(), 0.0).is_constant());
        assert_eq!(Expr::from(5.0).constant(), 5.0);
    }

    #[test]
    fn constants_move_to_the_right_hand_side() {
        let row = Expr::var(x()).add_constant(3.0).leq(10.0);
        assert_eq!(row.sense(), ComparisonSense::LessEqual);
        assert_eq!(row.rhs(), 7.0);
        assert_eq!(row.expr().constant(), 0.0);
    }

    #[test]
    fn comparing_two_expressions_subtracts_them() {
        let row = Expr::var(x()).equals(y());
        assert_eq!(row.rhs(), 0.0);
        assert_eq!(row.expr().normalized_terms(), vec![(x(), 1.0), (y(), -1.0)]);
    }

    #[test]
    fn normalized_terms_cancel_duplicates() {
        let expr = Expr::term(x(), 2.0) + Expr::term(x(), -2.0) + Expr::term(y(), 4.0);
        assert_eq!(expr.linear_terms().len(), 3);
        assert_eq!(expr.normalized_terms(), vec![(y(), 4.0)]);
    }

    #[test]
    fn operators_compose() {
        let total: Expr = [Expr::var(x()), Expr::var(y())].into_iter().sum();
        assert_eq!(total, Expr::sum([x(), y()]));

        let diff = Expr::var(x()) * 3.0 - Expr::var(y());
        assert_eq!(diff.normalized_terms(), vec![(x(), 3.0), (y(), -1.0)]);
        assert_eq!((-Expr::from_constant(2.0)).constant(), -2.0);
    }

    #[test]
    fn evaluate_treats_unknown_variables_as_zero() {
        let expr = Expr::new(vec![(x(), 2.0), (y(), 5.0)], 1.0);
        assert_eq!(expr.evaluate(|id| (id == x()).then_some(3.0)), 7.0);
    }
}
