//! HiGHS-backed MILP adapter for Tessera models.
//!
//! [`HighsAdapter`] lowers a keyed [`tessera_core::Model`] into a HiGHS row
//! problem, solves it and maps the outcome back onto [`VarKey`](tessera_core::VarKey)s.

pub mod ffi;
pub mod solver;
mod status;

pub use ffi::{ColumnOutOfRange, HighsOption, HighsProblem, HighsSolution, HighsStatus, highs_version};
pub use solver::HighsAdapter;
