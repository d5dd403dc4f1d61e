//! HiGHS solver implementation.

use crate::ffi::{ColumnOutOfRange, HighsOption, HighsProblem, highs_version};
use crate::status::{highs_status_string, to_solve_status};
use std::time::Instant;
use tessera_core::Model;
use tessera_solver::{
    AdapterError, ImprovedSolution, SolveResult, SolverAdapter, SolverConfig, SolverKind,
    require_objective, solve_trivially,
};
use tracing::{debug, trace, warn};

/// Integer values closer than this to an integer are snapped to it.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

fn column_error(err: ColumnOutOfRange) -> AdapterError {
    AdapterError::Internal(err.to_string())
}

/// MILP adapter backed by HiGHS.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsAdapter;

impl HighsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SolverAdapter for HighsAdapter {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<SolveResult, AdapterError> {
        if config.kind() != SolverKind::Milp {
            return Err(AdapterError::SolverUnavailable(format!(
                "HiGHS cannot solve as '{}'",
                config.kind().as_str()
            )));
        }
        solve_model(model, config)
    }
}

fn apply_solver_config(problem: &mut HighsProblem, config: &SolverConfig) {
    problem.set_verbose(config.trace_enabled());
    if let Some(limit) = config.time_limit {
        problem.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        problem.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(threads) = config.threads {
        problem.set_option("threads", HighsOption::Int(threads as i32));
    }
}

fn add_variables_to_highs(model: &Model, problem: &mut HighsProblem) {
    let mut objective_coeffs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in &model.objective().terms {
        if let Some(slot) = objective_coeffs.get_mut(var_id.index()) {
            *slot += *coeff;
        }
    }

    for (var_id, key, var) in model.variables() {
        let obj_coeff = objective_coeffs[var_id.index()];
        let col_idx = problem.add_column(var.bounds, obj_coeff, var.is_integer());

        trace!(
            component = "solver",
            operation = "add_variable",
            status = "success",
            key = %key,
            col_idx,
            lower = var.bounds.lower,
            upper = var.bounds.upper,
            obj_coeff,
            kind = var.kind.as_str(),
            "Added variable to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_vars = model.num_variables(),
        "Added all variables to HiGHS"
    );
}

fn add_constraints_to_highs(model: &Model, problem: &mut HighsProblem) -> Result<(), AdapterError> {
    let matrix_build_started = Instant::now();
    for (_, constraint) in model.constraints() {
        let bounds = constraint.bounds();
        let terms: Vec<(usize, f64)> = constraint
            .terms
            .iter()
            .map(|(var_id, coeff)| (var_id.index(), *coeff))
            .collect();
        let row_idx = problem.add_row(bounds, &terms).map_err(column_error)?;

        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint = %constraint.name,
            row_idx,
            lower = bounds.lower,
            upper = bounds.upper,
            num_coeffs = terms.len(),
            "Added constraint to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = model.num_constraints(),
        duration_ms = matrix_build_started.elapsed().as_secs_f64() * 1000.0,
        "Added all constraints to HiGHS"
    );

    Ok(())
}

fn snap_integral(model: &Model, values: &mut [f64]) {
    for (var_id, _, var) in model.variables() {
        if !var.is_integer() {
            continue;
        }
        if let Some(value) = values.get_mut(var_id.index()) {
            let rounded = value.round();
            if (*value - rounded).abs() <= INTEGRALITY_TOLERANCE {
                *value = rounded;
            }
        }
    }
}

fn solve_model(model: &Model, config: &SolverConfig) -> Result<SolveResult, AdapterError> {
    let sense = require_objective(model)?;
    let solve_started = Instant::now();

    if let Some(result) = solve_trivially(model) {
        return Ok(result.with_solve_time(solve_started.elapsed().as_secs_f64()));
    }

    let solver_version = highs_version().unwrap_or_else(|| "unknown".to_string());
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_version = %solver_version,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        "Starting solve process"
    );

    let mut problem = HighsProblem::new(sense);
    apply_solver_config(&mut problem, config);
    add_variables_to_highs(model, &mut problem);
    add_constraints_to_highs(model, &mut problem)?;

    let solution = problem.solve();
    let highs_status = solution.status();
    let solve_seconds = solve_started.elapsed().as_secs_f64();
    let has_solution = solution.has_primal_solution();
    let bounded = model.variables().all(|(_, _, var)| var.bounds.is_finite());
    let (status, time_limit_reached) = to_solve_status(highs_status, has_solution, bounded);
    let objective_value = solution.objective_value();
    let optimality_gap = solution.mip_gap();

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_status = highs_status_string(highs_status),
        mapped_status = status.as_str(),
        has_solution,
        objective_value,
        optimality_gap,
        duration_ms = solve_seconds * 1000.0,
        "HiGHS solve completed"
    );

    if !status.is_optimal() {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = highs_status_string(highs_status),
            mapped_status = status.as_str(),
            time_limit_reached,
            duration_ms = solve_seconds * 1000.0,
            "Solver did not find optimal solution"
        );
        return Ok(SolveResult::without_solution(status)
            .with_time_limit_reached(time_limit_reached)
            .with_solve_time(solve_seconds));
    }

    if time_limit_reached {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            objective_value,
            optimality_gap,
            duration_ms = solve_seconds * 1000.0,
            "Solver hit time limit but returning best solution found"
        );
    }

    let mut primal_values = solution.column_values();
    snap_integral(model, &mut primal_values);
    let values = SolveResult::keyed_values(model, &primal_values);

    debug!(
        component = "solver",
        operation = "extract_solution",
        status = "success",
        objective_value,
        num_primal_values = primal_values.len(),
        "Solution extracted"
    );

    config.notify(&ImprovedSolution {
        objective: objective_value,
        values: values.clone(),
        elapsed_seconds: solve_seconds,
    });

    Ok(SolveResult::optimal(objective_value, values)
        .with_time_limit_reached(time_limit_reached)
        .with_solve_time(solve_seconds))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use tessera_core::{Bounds, VarKey, VarKind};

    #[test]
    fn test_cp_kind_is_unavailable() {
        let model = Model::new();
        let config = SolverConfig::new().with_solver_kind(SolverKind::Cp);
        let err = HighsAdapter::new().solve(&model, &config).unwrap_err();
        assert_eq!(err.code(), "SOLVER_UNAVAILABLE");
    }

    #[test]
    fn test_missing_objective_is_malformed() {
        let model = Model::new();
        let err = HighsAdapter::new()
            .solve(&model, &SolverConfig::new())
            .unwrap_err();
        assert!(matches!(err, AdapterError::MalformedModel(_)));
    }

    #[test]
    fn test_snap_integral_only_touches_integer_columns() {
        let mut model = Model::new();
        model.declare_index_set("items", [0, 1]).unwrap();
        model.declare_family("x", &["items"]).unwrap();
        model
            .add_variable(VarKey::new("x", [0]), VarKind::Integer, Bounds::new(0.0, 5.0))
            .unwrap();
        model
            .add_variable(
                VarKey::new("x", [1]),
                VarKind::Continuous,
                Bounds::new(0.0, 5.0),
            )
            .unwrap();

        let mut values = vec![2.9999999, 1.0000001];
        snap_integral(&model, &mut values);
        assert_eq!(values, vec![3.0, 1.0000001]);
    }
}
