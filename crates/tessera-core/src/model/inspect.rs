//! Model inspection and snapshot methods.
//!
//! Snapshots are addressed by [`VarKey`] and constraint name rather than by
//! internal ids, so two models built from the same data in a different order
//! produce equal snapshots.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::key::VarKey;
use crate::types::{Bounds, Sense, VarKind};

use crate::model::Model;

/// View of a variable in a model snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableView {
    pub key: VarKey,
    pub kind: VarKind,
    pub bounds: Bounds,
}

/// View of a constraint in a model snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintView {
    pub name: String,
    pub sense: &'static str,
    pub rhs: f64,
    pub nnz: usize,
    /// Terms ordered by key; empty unless [`InspectOptions::include_terms`] is set.
    pub terms: Vec<(VarKey, f64)>,
}

/// View of the objective in a model snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveView {
    pub sense: Sense,
    pub terms: Vec<(VarKey, f64)>,
}

/// Metadata about a model snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotMetadata {
    pub variables: usize,
    pub constraints: usize,
    pub coefficients: usize,
}

/// A complete snapshot of a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSnapshot {
    pub variables: Vec<VariableView>,
    pub constraints: Vec<ConstraintView>,
    pub objective: Option<ObjectiveView>,
    pub metadata: SnapshotMetadata,
}

impl ModelSnapshot {
    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Options for inspecting a model.
#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub include_terms: bool,
    /// Restrict variables (and constraint terms) to these families.
    pub family_filter: Option<Vec<String>>,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            include_terms: true,
            family_filter: None,
        }
    }
}

impl Model {
    /// Inspect the model structure and return a key-addressed snapshot.
    pub fn inspect(&self, options: InspectOptions) -> ModelSnapshot {
        let InspectOptions {
            include_terms,
            family_filter,
        } = options;
        let families: Option<BTreeSet<String>> =
            family_filter.map(|names| names.into_iter().collect());
        let keep = |key: &VarKey| {
            families
                .as_ref()
                .is_none_or(|filter| filter.contains(key.family()))
        };

        let mut variables: Vec<VariableView> = self
            .variables()
            .filter(|(_, key, _)| keep(key))
            .map(|(_, key, var)| VariableView {
                key: key.clone(),
                kind: var.kind,
                bounds: var.bounds,
            })
            .collect();
        variables.sort_by(|a, b| a.key.cmp(&b.key));

        let keyed_terms = |terms: &[(tessera_expr::VariableId, f64)]| {
            let mut keyed: Vec<(VarKey, f64)> = terms
                .iter()
                .filter_map(|(var_id, coeff)| self.key_of(*var_id).map(|key| (key.clone(), *coeff)))
                .filter(|(key, _)| keep(key))
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            keyed
        };

        let mut constraints: Vec<ConstraintView> = self
            .constraints
            .iter()
            .map(|row| ConstraintView {
                name: row.name.clone(),
                sense: row.sense.as_str(),
                rhs: row.rhs,
                nnz: row.terms.len(),
                terms: if include_terms {
                    keyed_terms(&row.terms)
                } else {
                    Vec::new()
                },
            })
            .collect();
        constraints.sort_by(|a, b| a.name.cmp(&b.name));

        let objective = self.objective.sense.map(|sense| ObjectiveView {
            sense,
            terms: keyed_terms(&self.objective.terms),
        });

        ModelSnapshot {
            variables,
            constraints,
            objective,
            metadata: SnapshotMetadata {
                variables: self.num_variables(),
                constraints: self.num_constraints(),
                coefficients: self.num_coefficients(),
            },
        }
    }
}
