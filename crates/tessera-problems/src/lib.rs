//! Problem families built on the Tessera model layer.
//!
//! Each family turns a parsed instance into a [`Model`](tessera_core::Model)
//! with the constraint templates of `tessera-core`, hands it to a backend
//! through [`solve`], and projects the [`SolveResult`](tessera_solver::SolveResult)
//! back into domain terms. [`solve_family`] runs the whole pipeline.

pub mod dispatch;
pub mod domain;
pub mod error;
pub mod families;
pub mod family;
pub mod logging;
pub mod projector;

pub use dispatch::{adapter_for, solve};
pub use domain::{
    DomainResult, Lesson, PathResult, RoomAssignment, SubsetSelection, TaskAssignment, Timetable,
};
pub use error::ProblemError;
pub use families::{
    AssignmentInstance, Connection, PartitionInstance, PathInstance, RoomInstance, Subset,
    TimetableInstance,
};
pub use family::{Outcome, ProblemFamily, Solved, solve_family};
pub use logging::{LoggingError, init_logging};
pub use projector::{Instance, project};
