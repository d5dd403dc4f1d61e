//! Problem-level error types.

use tessera_core::ModelError;
use tessera_solver::{AdapterError, SolveStatus};

/// Errors raised while building, solving or projecting a problem family.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// The model could not be built.
    Model(ModelError),
    /// The backend failed.
    Adapter(AdapterError),
    /// Following selected arcs from the source did not reach the sink.
    IncompletePath { at: i64, reason: String },
    /// A projected result violates one of the model's structural rules.
    Validation(String),
    /// An explicit bucket bound is below the structural lower bound.
    InsufficientBound { required: usize, available: usize },
    /// The instance data is inconsistent.
    InvalidInstance(String),
    /// The result carries no solution to project.
    NotSolved { status: SolveStatus },
}

impl ProblemError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ProblemError::Model(err) => err.code(),
            ProblemError::Adapter(err) => err.code(),
            ProblemError::IncompletePath { .. } => "PATH_INCOMPLETE",
            ProblemError::Validation(_) => "RESULT_VALIDATION",
            ProblemError::InsufficientBound { .. } => "BOUND_INSUFFICIENT",
            ProblemError::InvalidInstance(_) => "INSTANCE_INVALID",
            ProblemError::NotSolved { .. } => "RESULT_NOT_SOLVED",
        }
    }
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::Model(err) => write!(f, "{err}"),
            ProblemError::Adapter(err) => write!(f, "{err}"),
            ProblemError::IncompletePath { at, reason } => write!(
                f,
                "[{}] Path stops at node {}: {}",
                self.code(),
                at,
                reason
            ),
            ProblemError::Validation(msg) => {
                write!(f, "[{}] Projected result is invalid: {}", self.code(), msg)
            }
            ProblemError::InsufficientBound {
                required,
                available,
            } => write!(
                f,
                "[{}] Bound {} is below the lower bound {}",
                self.code(),
                available,
                required
            ),
            ProblemError::InvalidInstance(msg) => {
                write!(f, "[{}] Invalid instance: {}", self.code(), msg)
            }
            ProblemError::NotSolved { status } => {
                write!(f, "[{}] Result has status '{}'", self.code(), status)
            }
        }
    }
}

impl std::error::Error for ProblemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProblemError::Model(err) => Some(err),
            ProblemError::Adapter(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for ProblemError {
    fn from(err: ModelError) -> Self {
        ProblemError::Model(err)
    }
}

impl From<AdapterError> for ProblemError {
    fn from(err: AdapterError) -> Self {
        ProblemError::Adapter(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_code() {
        let err: ProblemError = ModelError::NoObjective.into();
        assert_eq!(err.code(), "OBJECTIVE_MISSING");
        assert!(err.to_string().starts_with("[OBJECTIVE_MISSING]"));

        let err: ProblemError = AdapterError::SolverUnavailable("milp".to_string()).into();
        assert_eq!(err.code(), "SOLVER_UNAVAILABLE");
    }

    #[test]
    fn test_not_solved_display() {
        let err = ProblemError::NotSolved {
            status: SolveStatus::Infeasible,
        };
        assert_eq!(
            err.to_string(),
            "[RESULT_NOT_SOLVED] Result has status 'infeasible'"
        );
    }
}
