//! Storage access methods for the model.

use crate::key::{IndexSet, VarKey};
use crate::types::{Constraint, Variable};
use tessera_expr::{ConstraintId, VariableId};

use super::Model;
use super::error::ModelError;

impl Model {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get the number of coefficients in the model.
    pub fn num_coefficients(&self) -> usize {
        self.constraints.iter().map(|row| row.terms.len()).sum()
    }

    /// Whether the model has no variables and no constraints.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.constraints.is_empty()
    }

    /// Look up the id of a keyed variable.
    pub fn variable_id(&self, key: &VarKey) -> Option<VariableId> {
        self.key_index.get(key).copied()
    }

    /// Look up the key of a variable id.
    pub fn key_of(&self, id: VariableId) -> Option<&VarKey> {
        self.keys.get(id.index())
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// Look up a constraint id by name.
    pub fn constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_index.get(name).copied()
    }

    /// Iterate over variables in id order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &VarKey, &Variable)> {
        self.keys
            .iter()
            .zip(&self.variables)
            .enumerate()
            .map(|(idx, (key, var))| (VariableId::from_index(idx), key, var))
    }

    /// Iterate over constraints in id order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(idx, row)| (ConstraintId::from_index(idx), row))
    }

    /// Get the coefficient matrix in column-wise form.
    ///
    /// Returns one column per variable, each containing (constraint_id, coefficient)
    /// pairs in constraint order.
    pub fn columns(&self) -> Vec<Vec<(ConstraintId, f64)>> {
        let mut columns = vec![Vec::new(); self.num_variables()];
        for (constraint_id, row) in self.constraints() {
            for (var_id, coeff) in &row.terms {
                if let Some(column) = columns.get_mut(var_id.index()) {
                    column.push((constraint_id, *coeff));
                }
            }
        }
        columns
    }

    /// Get a declared index set.
    pub fn index_set(&self, name: &str) -> Option<&IndexSet> {
        self.index_sets.get(name)
    }

    /// Get the dimension names of a declared family.
    pub fn family_dims(&self, family: &str) -> Option<&[String]> {
        self.families.get(family).map(Vec::as_slice)
    }
}
