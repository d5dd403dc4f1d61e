//! Mapping of HiGHS statuses onto the four-way [`SolveStatus`] taxonomy.

use crate::ffi::HighsStatus;
use tessera_solver::SolveStatus;

/// Terminal status plus whether the time limit stopped the search.
pub(crate) fn to_solve_status(
    status: HighsStatus,
    has_solution: bool,
    bounded: bool,
) -> (SolveStatus, bool) {
    match status {
        HighsStatus::Optimal => (SolveStatus::Optimal, false),
        HighsStatus::Infeasible => (SolveStatus::Infeasible, false),
        HighsStatus::Unbounded => (SolveStatus::Unbounded, false),
        // Every column has finite bounds, so the model cannot be unbounded.
        HighsStatus::UnboundedOrInfeasible if bounded => (SolveStatus::Infeasible, false),
        HighsStatus::UnboundedOrInfeasible => (SolveStatus::Error, false),
        HighsStatus::ReachedTimeLimit => (incumbent_status(has_solution), true),
        HighsStatus::ReachedIterationLimit | HighsStatus::Unknown => {
            (incumbent_status(has_solution), false)
        }
    }
}

fn incumbent_status(has_solution: bool) -> SolveStatus {
    if has_solution {
        SolveStatus::Optimal
    } else {
        SolveStatus::Error
    }
}

pub(crate) fn highs_status_string(status: HighsStatus) -> &'static str {
    match status {
        HighsStatus::Optimal => "optimal",
        HighsStatus::Infeasible => "infeasible",
        HighsStatus::Unbounded => "unbounded",
        HighsStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
        HighsStatus::ReachedTimeLimit => "time_limit",
        HighsStatus::ReachedIterationLimit => "iteration_limit",
        HighsStatus::Unknown => "unknown",
    }
}
