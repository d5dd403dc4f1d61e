//! Linear expressions over typed variable ids.

pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr};
pub use ids::{ConstraintId, VariableId};
