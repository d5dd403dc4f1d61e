//! Shared solver abstractions for Tessera models.
//!
//! This crate provides the contract that solver backends (like
//! `tessera-highs` and `tessera-cp`) implement.
//!
//! # Overview
//!
//! - [`SolverConfig`]: Configuration options for solver behavior
//! - [`SolveStatus`]: The four-way termination taxonomy
//! - [`SolveResult`]: Key-addressed solve outcome
//! - [`AdapterError`]: Error types for adapter failures
//! - [`SolverAdapter`]: Trait for solver implementations

mod config;
mod error;
mod result;
mod status;
mod traits;

pub use config::{SolutionObserver, SolverConfig, SolverKind, SolverSettings};
pub use error::{AdapterError, ConfigError};
pub use result::{ImprovedSolution, SolveResult};
pub use status::SolveStatus;
pub use traits::{SolverAdapter, require_objective, solve_trivially};
