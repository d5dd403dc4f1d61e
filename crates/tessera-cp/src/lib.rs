//! Depth-first branch and bound over bounded integer models.
//!
//! [`CpAdapter`] implements [`SolverAdapter`](tessera_solver::SolverAdapter)
//! for models whose variables are all binary or integer with finite bounds.
//! Every assignment is checked against the touched rows with interval
//! (min/max activity) reasoning and the objective is pruned against the
//! incumbent with an optimistic bound.

mod adapter;
mod search;
mod state;
mod stats;

pub use adapter::CpAdapter;
pub use stats::SearchStatistics;
