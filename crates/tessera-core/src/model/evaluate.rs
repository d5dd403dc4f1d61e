//! Evaluating key-addressed assignments against a model.

use std::collections::BTreeMap;

use tessera_expr::ComparisonSense;

use crate::key::VarKey;
use crate::model::Model;

/// A constraint not satisfied by an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub constraint: String,
    pub activity: f64,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.constraint,
            self.activity,
            self.sense.symbol(),
            self.rhs
        )
    }
}

impl Model {
    /// Dense value vector indexed by variable id; missing keys read as zero.
    pub fn dense_values(&self, values: &BTreeMap<VarKey, f64>) -> Vec<f64> {
        self.keys
            .iter()
            .map(|key| values.get(key).copied().unwrap_or(0.0))
            .collect()
    }

    /// Objective value of an assignment.
    pub fn evaluate_objective(&self, values: &BTreeMap<VarKey, f64>) -> f64 {
        self.objective.evaluate(&self.dense_values(values))
    }

    /// Constraints violated by an assignment beyond `tolerance`, in constraint order.
    pub fn constraint_violations(
        &self,
        values: &BTreeMap<VarKey, f64>,
        tolerance: f64,
    ) -> Vec<Violation> {
        let dense = self.dense_values(values);
        let violations: Vec<Violation> = self
            .constraints
            .iter()
            .filter_map(|row| {
                let activity = row.activity(&dense);
                if row.sense.is_satisfied(activity, row.rhs, tolerance) {
                    None
                } else {
                    Some(Violation {
                        constraint: row.name.clone(),
                        activity,
                        sense: row.sense,
                        rhs: row.rhs,
                    })
                }
            })
            .collect();

        if !violations.is_empty() {
            tracing::debug!(
                component = "model",
                operation = "constraint_violations",
                status = "violated",
                violations = violations.len(),
                "Assignment violates constraints"
            );
        }
        violations
    }
}
