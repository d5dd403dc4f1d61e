//! Model builder methods for declaring index sets, variables, constraints, and objectives.

use std::collections::btree_map::Entry;

use crate::key::{IndexSet, VarKey};
use crate::types::{Bounds, Constraint, Objective, Sense, VarKind, Variable};
use tessera_expr::{ComparisonSense, ConstraintExpr, ConstraintId, Expr, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Declare a named index set.
    pub fn declare_index_set(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = i64>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        match self.index_sets.entry(name.clone()) {
            Entry::Occupied(_) => Err(ModelError::DuplicateIndexSet(name)),
            Entry::Vacant(slot) => {
                let set = slot.insert(IndexSet::new(name.clone(), members));
                tracing::debug!(
                    component = "model",
                    operation = "declare_index_set",
                    status = "success",
                    index_set = %name,
                    members = set.len(),
                    "Declared index set"
                );
                Ok(())
            }
        }
    }

    /// Declare a variable family whose key dimensions are declared index sets.
    pub fn declare_family(&mut self, name: impl Into<String>, dims: &[&str]) -> Result<(), ModelError> {
        let name = name.into();
        if self.families.contains_key(&name) {
            return Err(ModelError::DuplicateFamily(name));
        }
        for dim in dims {
            if !self.index_sets.contains_key(*dim) {
                return Err(ModelError::UnknownIndexSet((*dim).to_string()));
            }
        }
        self.families
            .insert(name.clone(), dims.iter().map(|dim| dim.to_string()).collect());
        tracing::debug!(
            component = "model",
            operation = "declare_family",
            status = "success",
            family = %name,
            dims = dims.len(),
            "Declared variable family"
        );
        Ok(())
    }

    /// Add a keyed variable to the model.
    ///
    /// Binary variables always get bounds `[0, 1]`.
    pub fn add_variable(
        &mut self,
        key: VarKey,
        kind: VarKind,
        bounds: Bounds,
    ) -> Result<VariableId, ModelError> {
        self.validate_key(&key)?;
        if self.key_index.contains_key(&key) {
            return Err(ModelError::DuplicateKey(key));
        }

        let bounds = if kind == VarKind::Binary {
            Bounds::binary()
        } else {
            bounds
        };
        if bounds.lower.is_nan() || bounds.upper.is_nan() || bounds.lower > bounds.upper {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }

        let id = VariableId::from_index(self.variables.len());
        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            key = %key,
            kind = kind.as_str(),
            lower = bounds.lower,
            upper = bounds.upper,
            "Added variable"
        );
        self.variables.push(Variable { kind, bounds });
        self.keys.push(key.clone());
        self.key_index.insert(key, id);
        Ok(id)
    }

    /// Add a binary variable.
    pub fn add_binary(&mut self, key: VarKey) -> Result<VariableId, ModelError> {
        self.add_variable(key, VarKind::Binary, Bounds::binary())
    }

    /// Add a named constraint over keyed terms.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: impl IntoIterator<Item = (VarKey, f64)>,
        sense: ComparisonSense,
        rhs: f64,
    ) -> Result<ConstraintId, ModelError> {
        let mut resolved = Vec::new();
        for (key, coeff) in terms {
            let var_id = self.resolve_key(&key)?;
            resolved.push((var_id, coeff));
        }
        self.push_constraint(name.into(), resolved, sense, rhs)
    }

    /// Add a named constraint from a comparison expression (e.g., `x + y <= 10`).
    ///
    /// A constant on the expression side is moved to the right-hand side.
    pub fn add_constraint_expr(
        &mut self,
        name: impl Into<String>,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        let (terms, constant) = expr.into_parts();
        for (var_id, _) in &terms {
            self.ensure_variable_exists(*var_id)?;
        }
        self.push_constraint(name.into(), terms, sense, rhs - constant)
    }

    fn push_constraint(
        &mut self,
        name: String,
        terms: Vec<(VariableId, f64)>,
        sense: ComparisonSense,
        rhs: f64,
    ) -> Result<ConstraintId, ModelError> {
        if self.constraint_index.contains_key(&name) {
            return Err(ModelError::DuplicateConstraintName(name));
        }
        if !rhs.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient: rhs });
        }
        if let Some((_, coeff)) = terms.iter().find(|(_, coeff)| !coeff.is_finite()) {
            return Err(ModelError::InvalidCoefficient {
                coefficient: *coeff,
            });
        }

        let terms = self.normalize_terms(terms);
        let id = ConstraintId::from_index(self.constraints.len());
        tracing::trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint = %name,
            sense = sense.as_str(),
            terms = terms.len(),
            rhs,
            "Added constraint"
        );
        self.constraint_index.insert(name.clone(), id);
        self.constraints.push(Constraint {
            name,
            terms,
            sense,
            rhs,
        });
        Ok(id)
    }

    /// Set the objective function over keyed terms, replacing any previous one.
    pub fn set_objective(
        &mut self,
        terms: impl IntoIterator<Item = (VarKey, f64)>,
        sense: Sense,
    ) -> Result<(), ModelError> {
        let mut resolved = Vec::new();
        for (key, coeff) in terms {
            resolved.push((self.resolve_key(&key)?, coeff));
        }
        self.install_objective(sense, resolved)
    }

    /// Minimize a linear expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn minimize(&mut self, expr: Expr) -> Result<(), ModelError> {
        if self.objective.is_set() {
            return Err(ModelError::MultipleObjectives);
        }
        self.install_objective(Sense::Minimize, expr.into_linear_terms())
    }

    /// Maximize a linear expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn maximize(&mut self, expr: Expr) -> Result<(), ModelError> {
        if self.objective.is_set() {
            return Err(ModelError::MultipleObjectives);
        }
        self.install_objective(Sense::Maximize, expr.into_linear_terms())
    }

    fn install_objective(
        &mut self,
        sense: Sense,
        terms: Vec<(VariableId, f64)>,
    ) -> Result<(), ModelError> {
        for (var_id, coeff) in &terms {
            self.ensure_variable_exists(*var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coeff,
                });
            }
        }

        let normalized = self.normalize_terms(terms);
        self.objective = Objective {
            sense: Some(sense),
            terms: normalized,
        };
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.terms.len(),
            "Set objective function"
        );
        Ok(())
    }

    fn validate_key(&self, key: &VarKey) -> Result<(), ModelError> {
        let dims = self
            .families
            .get(key.family())
            .ok_or_else(|| ModelError::UnknownFamily(key.family().to_string()))?;
        if dims.len() != key.arity() {
            return Err(ModelError::KeyArity {
                key: key.clone(),
                expected: dims.len(),
            });
        }
        for (dim, value) in dims.iter().zip(key.index()) {
            let in_domain = self
                .index_sets
                .get(dim)
                .is_some_and(|set| set.contains(*value));
            if !in_domain {
                return Err(ModelError::IndexOutOfDomain {
                    key: key.clone(),
                    index_set: dim.clone(),
                    value: *value,
                });
            }
        }
        Ok(())
    }
}
