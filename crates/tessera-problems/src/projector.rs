//! Family-polymorphic projection of solve results into domain terms.

use serde::{Deserialize, Serialize};
use tessera_core::Model;
use tessera_solver::SolveResult;

use crate::domain::DomainResult;
use crate::error::ProblemError;
use crate::families::{
    AssignmentInstance, PartitionInstance, PathInstance, RoomInstance, TimetableInstance,
};
use crate::family::ProblemFamily;

/// Any of the supported problem instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum Instance {
    RoomAssignment(RoomInstance),
    Path(PathInstance),
    TaskAssignment(AssignmentInstance),
    Timetable(TimetableInstance),
    SubsetSelection(PartitionInstance),
}

impl Instance {
    /// Parse an instance from its JSON form.
    pub fn from_json(text: &str) -> Result<Self, ProblemError> {
        serde_json::from_str(text).map_err(|err| ProblemError::InvalidInstance(err.to_string()))
    }
}

macro_rules! each_family {
    ($instance:expr, $family:ident => $body:expr) => {
        match $instance {
            Instance::RoomAssignment($family) => $body,
            Instance::Path($family) => $body,
            Instance::TaskAssignment($family) => $body,
            Instance::Timetable($family) => $body,
            Instance::SubsetSelection($family) => $body,
        }
    };
}

impl ProblemFamily for Instance {
    type Output = DomainResult;

    fn name(&self) -> &'static str {
        each_family!(self, family => family.name())
    }

    fn build(&self) -> Result<Model, ProblemError> {
        each_family!(self, family => family.build())
    }

    fn project(&self, result: &SolveResult) -> Result<DomainResult, ProblemError> {
        Ok(match self {
            Instance::RoomAssignment(family) => DomainResult::RoomAssignment(family.project(result)?),
            Instance::Path(family) => DomainResult::Path(family.project(result)?),
            Instance::TaskAssignment(family) => DomainResult::TaskAssignment(family.project(result)?),
            Instance::Timetable(family) => DomainResult::Timetable(family.project(result)?),
            Instance::SubsetSelection(family) => {
                DomainResult::SubsetSelection(family.project(result)?)
            }
        })
    }

    /// Zero when the output belongs to another family.
    fn objective_of(&self, output: &DomainResult) -> f64 {
        match (self, output) {
            (Instance::RoomAssignment(family), DomainResult::RoomAssignment(out)) => {
                family.objective_of(out)
            }
            (Instance::Path(family), DomainResult::Path(out)) => family.objective_of(out),
            (Instance::TaskAssignment(family), DomainResult::TaskAssignment(out)) => {
                family.objective_of(out)
            }
            (Instance::Timetable(family), DomainResult::Timetable(out)) => family.objective_of(out),
            (Instance::SubsetSelection(family), DomainResult::SubsetSelection(out)) => {
                family.objective_of(out)
            }
            _ => 0.0,
        }
    }
}

/// Project a solve result into the domain result of its instance.
///
/// Fails with [`ProblemError::NotSolved`] when the result is not optimal and
/// with [`ProblemError::Validation`] or [`ProblemError::IncompletePath`] when
/// the selected variables do not form a valid solution.
pub fn project(instance: &Instance, result: &SolveResult) -> Result<DomainResult, ProblemError> {
    let projected = instance.project(result);
    match &projected {
        Ok(output) => tracing::debug!(
            component = "projector",
            operation = "project",
            status = "success",
            problem = output.problem(),
            "Projected result"
        ),
        Err(err) => tracing::debug!(
            component = "projector",
            operation = "project",
            status = "error",
            problem = instance.name(),
            code = err.code(),
            "Projection failed"
        ),
    }
    projected
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use tessera_core::VarKey;
    use tessera_solver::SolveStatus;

    fn partition_json() -> &'static str {
        r#"{
            "problem": "subset_selection",
            "products": [1, 2, 3],
            "subsets": [
                {"cost": 3.0, "elements": [1, 2]},
                {"cost": 1.0, "elements": [3]}
            ]
        }"#
    }

    #[test]
    fn test_instance_from_json() {
        let instance = Instance::from_json(partition_json()).unwrap();
        assert_eq!(instance.name(), "set_partition");
        assert!(matches!(instance, Instance::SubsetSelection(_)));
    }

    #[test]
    fn test_malformed_json_is_invalid_instance() {
        let err = Instance::from_json(r#"{"problem": "knapsack"}"#).unwrap_err();
        assert_eq!(err.code(), "INSTANCE_INVALID");
    }

    #[test]
    fn test_project_requires_optimal_status() {
        let instance = Instance::from_json(partition_json()).unwrap();
        let result = SolveResult::without_solution(SolveStatus::Infeasible);
        let err = project(&instance, &result).unwrap_err();
        assert_eq!(
            err,
            ProblemError::NotSolved {
                status: SolveStatus::Infeasible
            }
        );
    }

    #[test]
    fn test_project_dispatches_by_family() {
        let instance = Instance::from_json(partition_json()).unwrap();
        let values = [(VarKey::new("x", [0]), 1.0), (VarKey::new("x", [1]), 1.0)];
        let result = SolveResult::optimal(4.0, values.into_iter().collect());

        let output = project(&instance, &result).unwrap();
        let DomainResult::SubsetSelection(selection) = &output else {
            panic!("expected a subset selection, got {output:?}");
        };
        assert_eq!(selection.chosen, vec![0, 1]);
        assert_eq!(instance.objective_of(&output), 4.0);
    }
}
