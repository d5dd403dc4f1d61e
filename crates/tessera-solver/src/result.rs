//! Key-addressed solve results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tessera_core::{Model, VarKey};

use crate::status::SolveStatus;

/// Threshold above which a binary indicator counts as selected.
const SELECTION_THRESHOLD: f64 = 0.5;

/// An improving incumbent reported to [`SolverConfig::on_improved_solution`](crate::SolverConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct ImprovedSolution {
    pub objective: f64,
    pub values: BTreeMap<VarKey, f64>,
    pub elapsed_seconds: f64,
}

/// Outcome of a single solve call.
///
/// Values are addressed by [`VarKey`], never by solver-internal indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Objective of the reported solution; `None` when there is no solution.
    pub objective_value: Option<f64>,
    #[serde(with = "keyed_values")]
    pub values: BTreeMap<VarKey, f64>,
    pub time_limit_reached: bool,
    pub solve_time_seconds: f64,
}

impl SolveResult {
    /// A result carrying a solution.
    pub fn optimal(objective_value: f64, values: BTreeMap<VarKey, f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            values,
            time_limit_reached: false,
            solve_time_seconds: 0.0,
        }
    }

    /// A result without a solution.
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: BTreeMap::new(),
            time_limit_reached: false,
            solve_time_seconds: 0.0,
        }
    }

    pub fn with_time_limit_reached(mut self, reached: bool) -> Self {
        self.time_limit_reached = reached;
        self
    }

    pub fn with_solve_time(mut self, seconds: f64) -> Self {
        self.solve_time_seconds = seconds;
        self
    }

    /// Map a dense value vector (indexed by variable id) onto the model's keys.
    pub fn keyed_values(model: &Model, dense: &[f64]) -> BTreeMap<VarKey, f64> {
        model
            .variables()
            .map(|(id, key, _)| (key.clone(), dense.get(id.index()).copied().unwrap_or(0.0)))
            .collect()
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Value of a keyed variable.
    pub fn value(&self, key: &VarKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Whether a binary indicator is selected (value above 0.5).
    pub fn is_selected(&self, key: &VarKey) -> bool {
        self.value(key).is_some_and(|value| value > SELECTION_THRESHOLD)
    }

    /// Selected keys of one variable family, in key order.
    pub fn selected<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a VarKey> + 'a {
        self.values
            .iter()
            .filter(move |(key, value)| key.family() == family && **value > SELECTION_THRESHOLD)
            .map(|(key, _)| key)
    }
}

/// JSON object keys must be strings, so values are written as `[key, value]` pairs.
mod keyed_values {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};
    use tessera_core::VarKey;

    pub fn serialize<S: Serializer>(
        values: &BTreeMap<VarKey, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<VarKey, f64>, D::Error> {
        let pairs = Vec::<(VarKey, f64)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
