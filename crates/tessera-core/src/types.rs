use serde::{Deserialize, Serialize};
use tessera_expr::{ComparisonSense, VariableId};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }

    /// Whether `candidate` is strictly better than `incumbent` beyond `tolerance`.
    pub fn improves(self, candidate: f64, incumbent: f64, tolerance: f64) -> bool {
        match self {
            Sense::Minimize => candidate < incumbent - tolerance,
            Sense::Maximize => candidate > incumbent + tolerance,
        }
    }
}

/// Bounds for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn binary() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Binary,
    Integer,
    Continuous,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Binary => "binary",
            VarKind::Integer => "integer",
            VarKind::Continuous => "continuous",
        }
    }
}

/// A decision variable with bounds and domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub kind: VarKind,
    pub bounds: Bounds,
}

impl Variable {
    /// Create a binary variable with bounds [0, 1].
    pub fn binary() -> Self {
        Self {
            kind: VarKind::Binary,
            bounds: Bounds::binary(),
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            kind: VarKind::Continuous,
            bounds,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            kind: VarKind::Integer,
            bounds,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self.kind, VarKind::Continuous)
    }
}

/// A named linear constraint `Σ coeff·var <sense> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub terms: Vec<(VariableId, f64)>,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

impl Constraint {
    /// Row bounds `[lower, upper]` equivalent to the relational form.
    pub fn bounds(&self) -> Bounds {
        let (lower, upper) = self.sense.bounds(self.rhs);
        Bounds::new(lower, upper)
    }

    /// Row activity for a dense value vector indexed by variable id.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Objective function with a sense and linear terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objective {
    pub sense: Option<Sense>,
    pub terms: Vec<(VariableId, f64)>,
}

impl Objective {
    /// Create a new empty objective
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.sense.is_some()
    }

    /// Objective value for a dense value vector indexed by variable id.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }
}
