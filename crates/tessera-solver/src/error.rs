//! Solver error types.

/// Error type for adapter operations.
///
/// Infeasibility and unboundedness are statuses, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// The requested backend is not available in this build or does not
    /// support the requested solver kind.
    SolverUnavailable(String),
    /// The model cannot be handed to the backend (no objective, unsupported
    /// variable domains, ...).
    MalformedModel(String),
    /// Internal solver error.
    Internal(String),
}

impl AdapterError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AdapterError::SolverUnavailable(_) => "SOLVER_UNAVAILABLE",
            AdapterError::MalformedModel(_) => "MODEL_MALFORMED",
            AdapterError::Internal(_) => "SOLVER_INTERNAL",
        }
    }
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::SolverUnavailable(msg) => {
                write!(f, "[{}] Solver unavailable: {}", self.code(), msg)
            }
            AdapterError::MalformedModel(msg) => {
                write!(f, "[{}] Malformed model: {}", self.code(), msg)
            }
            AdapterError::Internal(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for AdapterError {}

/// Error type for loading solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    InvalidEnv { name: String, value: String },
    /// A settings document cannot be parsed.
    InvalidSettings(String),
}

impl ConfigError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidEnv { .. } => "CONFIG_INVALID_ENV",
            ConfigError::InvalidSettings(_) => "CONFIG_INVALID_SETTINGS",
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidEnv { name, value } => write!(
                f,
                "[{}] Invalid value '{}' for {}",
                self.code(),
                value,
                name
            ),
            ConfigError::InvalidSettings(msg) => {
                write!(f, "[{}] Invalid solver settings: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unavailable() {
        let err = AdapterError::SolverUnavailable("cp".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("SOLVER_UNAVAILABLE"));
        assert!(msg.contains("cp"));
    }

    #[test]
    fn test_error_display_malformed() {
        let err = AdapterError::MalformedModel("model has no objective".to_string());
        assert_eq!(
            err.to_string(),
            "[MODEL_MALFORMED] Malformed model: model has no objective"
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            AdapterError::Internal(String::new()).code(),
            "SOLVER_INTERNAL"
        );
        assert_eq!(
            ConfigError::InvalidSettings(String::new()).code(),
            "CONFIG_INVALID_SETTINGS"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidEnv {
            name: "TESSERA_TIME_LIMIT".to_string(),
            value: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "[CONFIG_INVALID_ENV] Invalid value 'soon' for TESSERA_TIME_LIMIT"
        );
    }
}
