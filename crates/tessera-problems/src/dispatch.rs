//! Backend selection.

use tessera_core::Model;
use tessera_cp::CpAdapter;
use tessera_solver::{AdapterError, SolveResult, SolverAdapter, SolverConfig, SolverKind};

/// A fresh adapter for the requested solver kind.
///
/// MILP needs the `highs` feature; without it the kind is unavailable.
pub fn adapter_for(kind: SolverKind) -> Result<Box<dyn SolverAdapter>, AdapterError> {
    match kind {
        SolverKind::Cp => Ok(Box::new(CpAdapter::new())),
        #[cfg(feature = "highs")]
        SolverKind::Milp => Ok(Box::new(tessera_highs::HighsAdapter::new())),
        #[cfg(not(feature = "highs"))]
        SolverKind::Milp => Err(AdapterError::SolverUnavailable(
            "built without the 'highs' feature".to_string(),
        )),
    }
}

/// Solve a model with the backend named by `config.solver_kind`.
pub fn solve(model: &Model, config: &SolverConfig) -> Result<SolveResult, AdapterError> {
    let kind = config.kind();
    let mut adapter = adapter_for(kind)?;
    tracing::debug!(
        component = "problems",
        operation = "dispatch",
        status = "success",
        solver_kind = kind.as_str(),
        adapter = adapter.name(),
        "Dispatching model"
    );
    adapter.solve(model, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp_kind_selects_cp_adapter() {
        let adapter = adapter_for(SolverKind::Cp).unwrap();
        assert_eq!(adapter.name(), "cp");
    }

    #[cfg(feature = "highs")]
    #[test]
    fn test_milp_kind_selects_highs() {
        let adapter = adapter_for(SolverKind::Milp).unwrap();
        assert_eq!(adapter.name(), "highs");
    }

    #[cfg(not(feature = "highs"))]
    #[test]
    fn test_milp_kind_unavailable_without_feature() {
        let err = adapter_for(SolverKind::Milp).err().unwrap();
        assert_eq!(err.code(), "SOLVER_UNAVAILABLE");
    }
}
