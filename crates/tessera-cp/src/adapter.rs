//! [`SolverAdapter`] implementation for the branch and bound search.

use std::time::{Duration, Instant};

use tessera_core::{Model, Sense};
use tessera_solver::{
    AdapterError, ImprovedSolution, SolveResult, SolveStatus, SolverAdapter, SolverConfig,
    require_objective, solve_trivially,
};
use tracing::{debug, warn};

use crate::search::{SearchSession, TerminationReason};
use crate::state::{Domain, SearchState};
use crate::stats::SearchStatistics;

/// Largest magnitude accepted for an integer bound.
const MAX_DOMAIN_MAGNITUDE: f64 = 1e15;

/// Exact search backend for models over binary and bounded integer variables.
///
/// The adapter solves whatever model it is given regardless of
/// [`SolverConfig::solver_kind`]; backend selection happens in the caller.
#[derive(Debug, Clone, Default)]
pub struct CpAdapter {
    last_statistics: Option<SearchStatistics>,
}

impl CpAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the most recent search, if one ran.
    pub fn last_statistics(&self) -> Option<&SearchStatistics> {
        self.last_statistics.as_ref()
    }
}

impl SolverAdapter for CpAdapter {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<SolveResult, AdapterError> {
        let sense = require_objective(model)?;
        let solve_started = Instant::now();
        self.last_statistics = None;

        if let Some(result) = solve_trivially(model) {
            return Ok(result.with_solve_time(solve_started.elapsed().as_secs_f64()));
        }

        let domains = integer_domains(model)?;
        if let Some(var) = domains.iter().position(|domain| domain.lower > domain.upper) {
            debug!(
                component = "cp",
                operation = "solve",
                status = "infeasible",
                variable = var,
                "Variable bounds contain no integer"
            );
            return Ok(SolveResult::without_solution(SolveStatus::Infeasible)
                .with_solve_time(solve_started.elapsed().as_secs_f64()));
        }

        let rows = model
            .constraints()
            .map(|(_, row)| {
                let bounds = row.bounds();
                (bounds.lower, bounds.upper)
            })
            .collect();
        let columns = model
            .columns()
            .into_iter()
            .map(|column| {
                column
                    .into_iter()
                    .map(|(row, coeff)| (row.index(), coeff))
                    .collect()
            })
            .collect();
        let costs = minimisation_costs(model, sense);
        let time_limit = config
            .time_limit
            .and_then(|limit| Duration::try_from_secs_f64(limit.max(0.0)).ok());

        debug!(
            component = "cp",
            operation = "solve",
            status = "start",
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            nnz = model.num_coefficients(),
            time_limit = config.time_limit,
            "Starting branch and bound"
        );

        let orient = |objective: f64| match sense {
            Sense::Minimize => objective,
            Sense::Maximize => -objective,
        };
        let mut on_solution = |objective: f64, values: &[i64], elapsed: Duration| {
            config.notify(&ImprovedSolution {
                objective: orient(objective),
                values: SolveResult::keyed_values(model, &as_dense(values)),
                elapsed_seconds: elapsed.as_secs_f64(),
            });
        };
        let state = SearchState::new(rows, columns, domains);
        let outcome = SearchSession::new(state, costs, time_limit, &mut on_solution).run();
        let solve_seconds = solve_started.elapsed().as_secs_f64();
        let time_limit_reached = outcome.reason == TerminationReason::TimeLimit;

        debug!(
            component = "cp",
            operation = "solve",
            status = "success",
            time_limit_reached,
            has_solution = outcome.best.is_some(),
            nodes = outcome.statistics.nodes_explored,
            backtracks = outcome.statistics.backtracks,
            prunings_infeasible = outcome.statistics.prunings_infeasible,
            prunings_bound = outcome.statistics.prunings_bound,
            solutions = outcome.statistics.solutions_found,
            max_depth = outcome.statistics.max_depth,
            duration_ms = solve_seconds * 1000.0,
            "Branch and bound completed"
        );
        self.last_statistics = Some(outcome.statistics);

        let status = terminal_status(outcome.best.is_some(), time_limit_reached);
        let Some((objective, best)) = outcome.best else {
            warn!(
                component = "cp",
                operation = "solve",
                status = "warn",
                mapped_status = status.as_str(),
                time_limit_reached,
                duration_ms = solve_seconds * 1000.0,
                "Search ended without a solution"
            );
            return Ok(SolveResult::without_solution(status)
                .with_time_limit_reached(time_limit_reached)
                .with_solve_time(solve_seconds));
        };

        if time_limit_reached {
            warn!(
                component = "cp",
                operation = "solve",
                status = "warn",
                objective_value = orient(objective),
                duration_ms = solve_seconds * 1000.0,
                "Search hit time limit but returning best solution found"
            );
        }

        let dense = as_dense(&best);
        let objective_value = model.objective().evaluate(&dense);
        Ok(SolveResult::optimal(objective_value, SolveResult::keyed_values(model, &dense))
            .with_time_limit_reached(time_limit_reached)
            .with_solve_time(solve_seconds))
    }
}

/// An incumbent counts as optimal even when the clock stopped the search.
fn terminal_status(has_solution: bool, time_limit_reached: bool) -> SolveStatus {
    match (has_solution, time_limit_reached) {
        (true, _) => SolveStatus::Optimal,
        (false, true) => SolveStatus::Error,
        (false, false) => SolveStatus::Infeasible,
    }
}

/// Integer domains for every variable, rounded inward.
fn integer_domains(model: &Model) -> Result<Vec<Domain>, AdapterError> {
    model
        .variables()
        .map(|(_, key, var)| {
            if !var.is_integer() {
                return Err(AdapterError::MalformedModel(format!(
                    "variable {key} is continuous; the cp backend needs integer domains"
                )));
            }
            let lower = var.bounds.lower.ceil();
            let upper = var.bounds.upper.floor();
            if !(lower.abs() <= MAX_DOMAIN_MAGNITUDE && upper.abs() <= MAX_DOMAIN_MAGNITUDE) {
                return Err(AdapterError::MalformedModel(format!(
                    "variable {key} has unbounded domain [{}, {}]",
                    var.bounds.lower, var.bounds.upper
                )));
            }
            Ok(Domain {
                lower: lower as i64,
                upper: upper as i64,
            })
        })
        .collect()
}

/// Dense objective coefficients, negated for maximisation.
fn minimisation_costs(model: &Model, sense: Sense) -> Vec<f64> {
    let mut costs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in &model.objective().terms {
        if let Some(slot) = costs.get_mut(var_id.index()) {
            *slot += *coeff;
        }
    }
    if sense == Sense::Maximize {
        costs.iter_mut().for_each(|cost| *cost = -*cost);
    }
    costs
}

fn as_dense(values: &[i64]) -> Vec<f64> {
    values.iter().map(|&value| value as f64).collect()
}
