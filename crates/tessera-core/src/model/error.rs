//! Model error types.

use crate::key::VarKey;
use tessera_expr::{ConstraintId, VariableId};

/// Errors that can occur while building a model.
///
/// All of these signal misuse of the builder and are surfaced immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A variable with this key already exists
    DuplicateKey(VarKey),
    /// No variable with this key was declared
    UnknownVariable(VarKey),
    /// Invalid variable ID
    InvalidVariableId(VariableId),
    /// Invalid constraint ID
    InvalidConstraintId(ConstraintId),
    /// A constraint with this name already exists
    DuplicateConstraintName(String),
    /// An index set with this name already exists
    DuplicateIndexSet(String),
    /// No index set with this name was declared
    UnknownIndexSet(String),
    /// A variable family with this name already exists
    DuplicateFamily(String),
    /// No variable family with this name was declared
    UnknownFamily(String),
    /// Key tuple length differs from the family's dimension count
    KeyArity {
        key: VarKey,
        expected: usize,
    },
    /// Key index is not a member of the family's index set
    IndexOutOfDomain {
        key: VarKey,
        index_set: String,
        value: i64,
    },
    /// Invalid variable bounds
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Non-finite coefficient or right-hand side
    InvalidCoefficient { coefficient: f64 },
    /// No objective set
    NoObjective,
    /// Objective already set
    MultipleObjectives,
    /// An element cannot conflict with itself
    SelfConflict { element: i64 },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::DuplicateKey(_) => "VARIABLE_DUPLICATE_KEY",
            ModelError::UnknownVariable(_) => "VARIABLE_UNKNOWN",
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::DuplicateConstraintName(_) => "CONSTRAINT_DUPLICATE_NAME",
            ModelError::DuplicateIndexSet(_) => "INDEX_SET_DUPLICATE",
            ModelError::UnknownIndexSet(_) => "INDEX_SET_UNKNOWN",
            ModelError::DuplicateFamily(_) => "FAMILY_DUPLICATE",
            ModelError::UnknownFamily(_) => "FAMILY_UNKNOWN",
            ModelError::KeyArity { .. } => "VARIABLE_KEY_ARITY",
            ModelError::IndexOutOfDomain { .. } => "VARIABLE_INDEX_OUT_OF_DOMAIN",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::NoObjective => "OBJECTIVE_MISSING",
            ModelError::MultipleObjectives => "OBJECTIVE_ALREADY_SET",
            ModelError::SelfConflict { .. } => "CONFLICT_SELF",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::DuplicateKey(key) => {
                write!(f, "[{}] Variable {} already exists", self.code(), key)
            }
            ModelError::UnknownVariable(key) => {
                write!(f, "[{}] Variable {} was never declared", self.code(), key)
            }
            ModelError::InvalidVariableId(id) => {
                write!(f, "[{}] Variable ID {} does not exist", self.code(), id)
            }
            ModelError::InvalidConstraintId(id) => {
                write!(f, "[{}] Constraint ID {} does not exist", self.code(), id)
            }
            ModelError::DuplicateConstraintName(name) => {
                write!(f, "[{}] Constraint '{}' already exists", self.code(), name)
            }
            ModelError::DuplicateIndexSet(name) => {
                write!(f, "[{}] Index set '{}' already exists", self.code(), name)
            }
            ModelError::UnknownIndexSet(name) => {
                write!(f, "[{}] Index set '{}' was never declared", self.code(), name)
            }
            ModelError::DuplicateFamily(name) => {
                write!(f, "[{}] Variable family '{}' already exists", self.code(), name)
            }
            ModelError::UnknownFamily(name) => write!(
                f,
                "[{}] Variable family '{}' was never declared",
                self.code(),
                name
            ),
            ModelError::KeyArity { key, expected } => write!(
                f,
                "[{}] Key {} has {} indices, family expects {}",
                self.code(),
                key,
                key.arity(),
                expected
            ),
            ModelError::IndexOutOfDomain {
                key,
                index_set,
                value,
            } => write!(
                f,
                "[{}] Key {}: {} is not a member of '{}'",
                self.code(),
                key,
                value,
                index_set
            ),
            ModelError::InvalidVariableBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidCoefficient { coefficient } => write!(
                f,
                "[{}] Coefficient must be finite (got {})",
                self.code(),
                coefficient
            ),
            ModelError::NoObjective => {
                write!(f, "[{}] Model has no objective defined", self.code())
            }
            ModelError::MultipleObjectives => write!(
                f,
                "[{}] Model already has an objective; use set_objective to replace",
                self.code()
            ),
            ModelError::SelfConflict { element } => write!(
                f,
                "[{}] Element {} cannot conflict with itself",
                self.code(),
                element
            ),
        }
    }
}

impl std::error::Error for ModelError {}
