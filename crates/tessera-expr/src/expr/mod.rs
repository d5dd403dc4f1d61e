//! Expression types for linear models.

pub mod constraint;
pub mod linear;

pub use constraint::{ComparisonSense, ConstraintExpr};
pub use linear::Expr;
