//! Model module for building keyed optimization models.
//!
//! This module provides the core [`Model`] type: a pure accumulation of index
//! sets, keyed decision variables, named linear constraints and a single
//! objective. It never solves.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for declaring index sets, variables, constraints and objectives
//! - [`storage`]: Lookup and column/row access
//! - [`evaluate`]: Evaluating assignments against the model
//! - [`inspect`]: Key-addressed snapshots for diagnostics and tests

mod builder;
mod error;
mod evaluate;
mod inspect;
mod storage;

use crate::key::{IndexSet, VarKey};
use crate::types::{Constraint, Objective, Variable};
use std::collections::BTreeMap;
use std::time::Instant;
use tessera_expr::{ConstraintId, VariableId};

pub use error::ModelError;
pub use evaluate::Violation;
pub use inspect::{
    ConstraintView, InspectOptions, ModelSnapshot, ObjectiveView, SnapshotMetadata, VariableView,
};

/// A builder for binary/integer linear models addressed by [`VarKey`].
///
/// Variables are stored densely by [`VariableId`]; the key index maps every
/// declared key to its id. Constraints are stored row-wise with normalized
/// terms.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) index_sets: BTreeMap<String, IndexSet>,
    pub(crate) families: BTreeMap<String, Vec<String>>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) keys: Vec<VarKey>,
    pub(crate) key_index: BTreeMap<VarKey, VariableId>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) constraint_index: BTreeMap<String, ConstraintId>,
    pub(crate) objective: Objective,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn resolve_key(&self, key: &VarKey) -> Result<VariableId, ModelError> {
        self.key_index
            .get(key)
            .copied()
            .ok_or_else(|| ModelError::UnknownVariable(key.clone()))
    }

    /// Merge duplicate variables and drop zero coefficients, ordered by id.
    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let started = Instant::now();
        let terms_in = terms.len();

        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in terms {
            if coeff == 0.0 {
                continue;
            }
            *merged.entry(var_id).or_insert(0.0) += coeff;
        }

        let normalized: Vec<(VariableId, f64)> = merged
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect();

        tracing::trace!(
            component = "model",
            operation = "lower_expr",
            status = "success",
            expr_terms_in = terms_in,
            expr_terms_out = normalized.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Lowered linear expression"
        );

        normalized
    }
}
