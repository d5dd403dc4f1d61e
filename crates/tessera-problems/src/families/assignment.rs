//! Task assignment: match `n` tasks one-to-one with `n` employees at least cost.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tessera_core::templates::exact_cover;
use tessera_core::{Model, Sense, VarKey};
use tessera_solver::SolveResult;

use crate::domain::TaskAssignment;
use crate::error::ProblemError;
use crate::family::{ProblemFamily, ensure_solved};

/// `costs[task][employee]`; the matrix must be square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentInstance {
    pub costs: Vec<Vec<f64>>,
}

fn x(task: i64, employee: i64) -> VarKey {
    VarKey::new("x", [task, employee])
}

impl AssignmentInstance {
    pub fn new(costs: Vec<Vec<f64>>) -> Self {
        Self { costs }
    }

    fn size(&self) -> Result<usize, ProblemError> {
        let n = self.costs.len();
        if let Some((task, row)) = self.costs.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(ProblemError::InvalidInstance(format!(
                "cost matrix is not square: task {task} has {} costs, expected {n}",
                row.len()
            )));
        }
        Ok(n)
    }

    fn cost(&self, task: i64, employee: i64) -> f64 {
        self.costs
            .get(task as usize)
            .and_then(|row| row.get(employee as usize))
            .copied()
            .unwrap_or(0.0)
    }
}

impl ProblemFamily for AssignmentInstance {
    type Output = TaskAssignment;

    fn name(&self) -> &'static str {
        "task_assignment"
    }

    fn build(&self) -> Result<Model, ProblemError> {
        let indices: Vec<i64> = (0..self.size()? as i64).collect();

        let mut model = Model::new();
        model.declare_index_set("tasks", indices.iter().copied())?;
        model.declare_index_set("employees", indices.iter().copied())?;
        model.declare_family("x", &["tasks", "employees"])?;
        for &task in &indices {
            for &employee in &indices {
                model.add_binary(x(task, employee))?;
            }
        }

        exact_cover(&mut model, "task", &indices, &indices, |t, e| Some(x(t, e)))?;
        exact_cover(&mut model, "employee", &indices, &indices, |e, t| Some(x(t, e)))?;

        let terms = indices.iter().flat_map(|&task| {
            indices
                .iter()
                .map(move |&employee| (x(task, employee), self.cost(task, employee)))
        });
        model.set_objective(terms, Sense::Minimize)?;
        Ok(model)
    }

    fn project(&self, result: &SolveResult) -> Result<TaskAssignment, ProblemError> {
        ensure_solved(result)?;
        let n = self.size()? as i64;

        let mut assignment = BTreeMap::new();
        for task in 0..n {
            let chosen: Vec<i64> = (0..n)
                .filter(|&employee| result.is_selected(&x(task, employee)))
                .collect();
            let [employee] = chosen.as_slice() else {
                return Err(ProblemError::Validation(format!(
                    "task {task} has {} employees",
                    chosen.len()
                )));
            };
            assignment.insert(task, *employee);
        }

        let busy: BTreeSet<i64> = assignment.values().copied().collect();
        if busy.len() != assignment.len() {
            return Err(ProblemError::Validation(
                "an employee holds more than one task".to_string(),
            ));
        }

        let cost: f64 = assignment
            .iter()
            .map(|(&task, &employee)| self.cost(task, employee))
            .sum();
        Ok(TaskAssignment { assignment, cost })
    }

    fn objective_of(&self, output: &TaskAssignment) -> f64 {
        output
            .assignment
            .iter()
            .map(|(&task, &employee)| self.cost(task, employee))
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_non_square_matrix_is_invalid() {
        let instance = AssignmentInstance::new(vec![vec![1.0, 2.0], vec![3.0]]);
        let err = instance.build().unwrap_err();
        assert_eq!(err.code(), "INSTANCE_INVALID");
    }

    #[test]
    fn test_build_has_two_cover_families() {
        let instance = AssignmentInstance::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let model = instance.build().unwrap();
        assert_eq!(model.num_variables(), 4);
        assert_eq!(model.num_constraints(), 4);
        assert!(model.constraint_by_name("task[1]").is_some());
        assert!(model.constraint_by_name("employee[0]").is_some());
    }

    #[test]
    fn test_project_rejects_shared_employee() {
        let instance = AssignmentInstance::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let result = SolveResult::optimal(
            4.0,
            [(x(0, 0), 1.0), (x(1, 0), 1.0)].into_iter().collect(),
        );
        let err = instance.project(&result).unwrap_err();
        assert!(matches!(err, ProblemError::Validation(_)));
    }

    #[test]
    fn test_objective_of_sums_assigned_costs() {
        let instance = AssignmentInstance::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let result = SolveResult::optimal(
            5.0,
            [(x(0, 1), 1.0), (x(1, 0), 1.0)].into_iter().collect(),
        );
        let output = instance.project(&result).unwrap();
        assert_eq!(output.cost, 5.0);
        assert_eq!(instance.objective_of(&output), 5.0);
    }
}
