//! The problem family contract and the build, solve and project pipeline.

use std::time::Instant;

use serde::Serialize;
use tessera_core::Model;
use tessera_solver::{SolveResult, SolveStatus, SolverConfig};
use tracing::{debug, warn};

use crate::dispatch;
use crate::error::ProblemError;

/// Tolerance for row checks and the objective round trip.
pub(crate) const VALIDATION_TOLERANCE: f64 = 1e-6;

/// A combinatorial problem that can be expressed as a [`Model`].
pub trait ProblemFamily {
    /// Domain-level view of a solution.
    type Output: Serialize;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Build the model. Never solves.
    fn build(&self) -> Result<Model, ProblemError>;

    /// Read a solved result back into domain terms and validate it.
    fn project(&self, result: &SolveResult) -> Result<Self::Output, ProblemError>;

    /// Recompute the objective from a projected output and the instance data.
    fn objective_of(&self, output: &Self::Output) -> f64;
}

/// A validated solution of a problem family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solved<T> {
    pub output: T,
    pub objective: f64,
    /// The search stopped at the time limit; the output is the best found.
    pub time_limit_reached: bool,
    pub solve_time_seconds: f64,
}

/// Terminal outcome of [`solve_family`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    Solved(Solved<T>),
    Infeasible,
    Unbounded,
}

impl<T> Outcome<T> {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    pub fn solved(self) -> Option<Solved<T>> {
        match self {
            Outcome::Solved(solved) => Some(solved),
            Outcome::Infeasible | Outcome::Unbounded => None,
        }
    }
}

/// `NotSolved` unless the result carries an optimal (or best found) solution.
pub(crate) fn ensure_solved(result: &SolveResult) -> Result<(), ProblemError> {
    if result.is_optimal() {
        Ok(())
    } else {
        Err(ProblemError::NotSolved {
            status: result.status,
        })
    }
}

/// Build, solve, project and validate one problem instance.
///
/// Infeasible and unbounded models are outcomes, not errors. A result with
/// status `error` (for example a time limit without incumbent) is surfaced
/// as [`ProblemError::NotSolved`].
pub fn solve_family<F: ProblemFamily>(
    family: &F,
    config: &SolverConfig,
) -> Result<Outcome<F::Output>, ProblemError> {
    let started = Instant::now();
    let model = family.build()?;
    debug!(
        component = "problems",
        operation = "build",
        status = "success",
        problem = family.name(),
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Built model"
    );

    let result = dispatch::solve(&model, config)?;
    match result.status {
        SolveStatus::Infeasible => return Ok(Outcome::Infeasible),
        SolveStatus::Unbounded => return Ok(Outcome::Unbounded),
        SolveStatus::Error => {
            warn!(
                component = "problems",
                operation = "solve",
                status = "warn",
                problem = family.name(),
                time_limit_reached = result.time_limit_reached,
                "No solution to project"
            );
            return Err(ProblemError::NotSolved {
                status: result.status,
            });
        }
        SolveStatus::Optimal => {}
    }

    let violations = model.constraint_violations(&result.values, VALIDATION_TOLERANCE);
    if let Some(first) = violations.first() {
        return Err(ProblemError::Validation(format!(
            "{} violated rows, first {first}",
            violations.len()
        )));
    }

    let output = family.project(&result)?;
    let objective = result
        .objective_value
        .unwrap_or_else(|| model.evaluate_objective(&result.values));
    let recomputed = family.objective_of(&output);
    if (recomputed - objective).abs() > VALIDATION_TOLERANCE {
        return Err(ProblemError::Validation(format!(
            "objective {objective} reported, {recomputed} recomputed from the projection"
        )));
    }

    debug!(
        component = "problems",
        operation = "solve_family",
        status = "success",
        problem = family.name(),
        objective,
        time_limit_reached = result.time_limit_reached,
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Projected solution"
    );

    Ok(Outcome::Solved(Solved {
        output,
        objective,
        time_limit_reached: result.time_limit_reached,
        solve_time_seconds: result.solve_time_seconds,
    }))
}
