//! Tessera core: a keyed model builder for binary/integer linear programs.
//!
//! - [`model`]: the [`Model`] builder (index sets, keyed variables, named constraints, objective)
//! - [`templates`]: reusable constraint families (exact cover, mutual exclusion, flow, ...)
//! - [`bound`]: structural bounds computed before a model is sized
//! - [`conflict`]: symmetric conflict relations between elements

pub mod bound;
pub mod conflict;
pub mod key;
pub mod model;
pub mod templates;
pub mod types;

pub use bound::{clique_lower_bound, estimate_bound, greedy_coloring};
pub use conflict::{Adjacency, ConflictSet};
pub use key::{IndexSet, VarKey};
pub use model::{
    ConstraintView, InspectOptions, Model, ModelError, ModelSnapshot, ObjectiveView,
    SnapshotMetadata, VariableView, Violation,
};
pub use types::{Bounds, Constraint, Objective, Sense, VarKind, Variable};

pub use tessera_expr::{ComparisonSense, ConstraintExpr, ConstraintId, Expr, VariableId};
