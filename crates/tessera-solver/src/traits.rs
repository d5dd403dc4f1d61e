//! Solver traits for abstraction over different solver backends.

use std::collections::BTreeMap;

use tessera_core::{Model, Sense};

use crate::{AdapterError, SolveResult, SolveStatus, SolverConfig};

/// Tolerance for checking term-less rows of an empty model.
const TRIVIAL_TOLERANCE: f64 = 1e-9;

/// Trait for solver implementations.
///
/// Adapters borrow the model read-only and must map every native status
/// onto [`SolveStatus`].
pub trait SolverAdapter {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Solve the model with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an `AdapterError` if:
    /// - The backend is unavailable for the requested solver kind
    /// - The model has no objective or uses unsupported variable domains
    /// - The solver fails internally
    fn solve(&mut self, model: &Model, config: &SolverConfig)
    -> Result<SolveResult, AdapterError>;
}

/// The objective sense, or `MalformedModel` when the model has no objective.
pub fn require_objective(model: &Model) -> Result<Sense, AdapterError> {
    model
        .objective()
        .sense
        .ok_or_else(|| AdapterError::MalformedModel("model has no objective".to_string()))
}

/// Solve a model with zero variables without calling a backend.
///
/// Returns `None` when the model has variables. Otherwise the result is
/// optimal with objective 0 when every row admits zero activity, and
/// infeasible when one does not.
pub fn solve_trivially(model: &Model) -> Option<SolveResult> {
    if model.num_variables() > 0 {
        return None;
    }
    let blocking = model
        .constraints()
        .find(|(_, row)| !row.sense.is_satisfied(0.0, row.rhs, TRIVIAL_TOLERANCE));
    let result = match blocking {
        Some((_, row)) => {
            tracing::debug!(
                component = "solver",
                operation = "solve_trivially",
                status = "infeasible",
                constraint = %row.name,
                "Empty model has an unsatisfiable row"
            );
            SolveResult::without_solution(SolveStatus::Infeasible)
        }
        None => {
            tracing::debug!(
                component = "solver",
                operation = "solve_trivially",
                status = "optimal",
                constraints = model.num_constraints(),
                "Solved empty model"
            );
            SolveResult::optimal(0.0, BTreeMap::new())
        }
    };
    Some(result)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use tessera_core::{ComparisonSense, Expr, VarKey};

    struct FixtureAdapter {
        status: SolveStatus,
    }

    impl SolverAdapter for FixtureAdapter {
        fn name(&self) -> &'static str {
            "fixture"
        }

        fn solve(
            &mut self,
            model: &Model,
            _config: &SolverConfig,
        ) -> Result<SolveResult, AdapterError> {
            require_objective(model)?;
            if let Some(result) = solve_trivially(model) {
                return Ok(result);
            }
            Ok(SolveResult::without_solution(self.status))
        }
    }

    #[test]
    fn test_missing_objective_is_malformed() {
        let model = Model::new();
        let mut adapter = FixtureAdapter {
            status: SolveStatus::Optimal,
        };
        let err = adapter.solve(&model, &SolverConfig::new()).unwrap_err();
        assert_eq!(err.code(), "MODEL_MALFORMED");
    }

    #[test]
    fn test_empty_model_is_trivially_optimal() {
        let mut model = Model::new();
        model.minimize(Expr::zero()).unwrap();
        model
            .add_constraint("slack", Vec::<(VarKey, f64)>::new(), ComparisonSense::LessEqual, 3.0)
            .unwrap();

        let mut adapter = FixtureAdapter {
            status: SolveStatus::Error,
        };
        let result = adapter.solve(&model, &SolverConfig::new()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective_value, Some(0.0));
        assert!(result.values.is_empty());
        assert!(!result.time_limit_reached);
    }

    #[test]
    fn test_empty_model_with_unsatisfiable_row() {
        let mut model = Model::new();
        model.maximize(Expr::zero()).unwrap();
        model
            .add_constraint("demand", Vec::<(VarKey, f64)>::new(), ComparisonSense::Equal, 1.0)
            .unwrap();

        let result = solve_trivially(&model).unwrap();
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert_eq!(result.objective_value, None);
    }

    #[test]
    fn test_non_empty_model_is_not_trivial() {
        let mut model = Model::new();
        model.declare_index_set("items", [0]).unwrap();
        model.declare_family("x", &["items"]).unwrap();
        model.add_binary(VarKey::new("x", [0])).unwrap();
        assert!(solve_trivially(&model).is_none());
    }
}
