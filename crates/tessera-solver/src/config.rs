//! Solver configuration types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::result::ImprovedSolution;

const ENV_TIME_LIMIT: &str = "TESSERA_TIME_LIMIT";
const ENV_SOLVER: &str = "TESSERA_SOLVER";
const ENV_SOLVER_TRACE: &str = "TESSERA_SOLVER_TRACE";

/// Callback invoked synchronously on the solving thread for each improving solution.
pub type SolutionObserver = Arc<dyn Fn(&ImprovedSolution) + Send + Sync>;

/// Which family of backend should solve the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Mixed-integer linear programming (HiGHS).
    #[default]
    Milp,
    /// In-process constraint programming search.
    Cp,
}

impl SolverKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SolverKind::Milp => "milp",
            SolverKind::Cp => "cp",
        }
    }
}

impl std::str::FromStr for SolverKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "milp" | "mip" | "highs" => Ok(SolverKind::Milp),
            "cp" => Ok(SolverKind::Cp),
            other => Err(format!("unknown solver kind '{other}'")),
        }
    }
}

/// Configuration options for solver behavior.
///
/// This struct provides a unified way to configure solver parameters
/// across different solver backends. Every field is optional; `None` uses
/// the backend default.
#[derive(Clone, Default)]
pub struct SolverConfig {
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance. `None` uses solver default.
    pub mip_gap: Option<f64>,
    /// Number of threads to use. `None` uses solver default.
    pub threads: Option<u32>,
    /// Forward solver log output. `None` keeps the solver quiet.
    pub enable_trace: Option<bool>,
    /// Backend selection. `None` means [`SolverKind::Milp`].
    pub solver_kind: Option<SolverKind>,
    /// Observer for improving solutions.
    pub on_improved_solution: Option<SolutionObserver>,
}

impl std::fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverConfig")
            .field("time_limit", &self.time_limit)
            .field("mip_gap", &self.mip_gap)
            .field("threads", &self.threads)
            .field("enable_trace", &self.enable_trace)
            .field("solver_kind", &self.solver_kind)
            .field(
                "on_improved_solution",
                &self.on_improved_solution.as_ref().map(|_| "<observer>"),
            )
            .finish()
    }
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `TESSERA_TIME_LIMIT`, `TESSERA_SOLVER` and `TESSERA_SOLVER_TRACE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let invalid = |name: &str, value: &str| ConfigError::InvalidEnv {
            name: name.to_string(),
            value: value.to_string(),
        };

        let mut config = Self::new();
        if let Some(value) = lookup(ENV_TIME_LIMIT) {
            let seconds: f64 = value
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_TIME_LIMIT, &value))?;
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(invalid(ENV_TIME_LIMIT, &value));
            }
            config = config.with_time_limit(seconds);
        }
        if let Some(value) = lookup(ENV_SOLVER) {
            let kind: SolverKind = value.parse().map_err(|_| invalid(ENV_SOLVER, &value))?;
            config = config.with_solver_kind(kind);
        }
        if let Some(value) = lookup(ENV_SOLVER_TRACE) {
            let enabled = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(invalid(ENV_SOLVER_TRACE, &value)),
            };
            config = config.with_trace(enabled);
        }
        Ok(config)
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Enable or disable solver log output.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.enable_trace = Some(enabled);
        self
    }

    /// Select the backend family.
    pub fn with_solver_kind(mut self, kind: SolverKind) -> Self {
        self.solver_kind = Some(kind);
        self
    }

    /// Register an observer for improving solutions.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&ImprovedSolution) + Send + Sync + 'static,
    ) -> Self {
        self.on_improved_solution = Some(Arc::new(observer));
        self
    }

    /// The selected backend, defaulting to MILP.
    pub fn kind(&self) -> SolverKind {
        self.solver_kind.unwrap_or_default()
    }

    /// Whether solver output should be forwarded.
    pub fn trace_enabled(&self) -> bool {
        self.enable_trace.unwrap_or(false)
    }

    /// Invoke the observer, if any.
    pub fn notify(&self, solution: &ImprovedSolution) {
        if let Some(observer) = &self.on_improved_solution {
            observer(solution);
        }
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.threads.is_none()
            && self.enable_trace.is_none()
            && self.solver_kind.is_none()
            && self.on_improved_solution.is_none()
    }
}

/// Serializable subset of [`SolverConfig`], e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    pub time_limit: Option<f64>,
    pub mip_gap: Option<f64>,
    pub threads: Option<u32>,
    pub enable_trace: Option<bool>,
    pub solver: Option<SolverKind>,
}

impl SolverSettings {
    /// Parse settings from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::InvalidSettings(err.to_string()))
    }
}

impl From<SolverSettings> for SolverConfig {
    fn from(settings: SolverSettings) -> Self {
        SolverConfig {
            time_limit: settings.time_limit,
            mip_gap: settings.mip_gap,
            threads: settings.threads,
            enable_trace: settings.enable_trace,
            solver_kind: settings.solver,
            on_improved_solution: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_config_new_is_empty() {
        let config = SolverConfig::new();
        assert!(config.is_empty());
        assert_eq!(config.kind(), SolverKind::Milp);
        assert!(!config.trace_enabled());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_mip_gap(0.01)
            .with_threads(4)
            .with_trace(true)
            .with_solver_kind(SolverKind::Cp);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.mip_gap, Some(0.01));
        assert_eq!(config.threads, Some(4));
        assert!(config.trace_enabled());
        assert_eq!(config.kind(), SolverKind::Cp);
    }

    #[test]
    fn test_observer_is_invoked() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = SolverConfig::new().with_observer(move |solution: &ImprovedSolution| {
            sink.lock().unwrap().push(solution.objective);
        });
        assert!(!config.is_empty());

        config.notify(&ImprovedSolution {
            objective: 7.0,
            values: BTreeMap::new(),
            elapsed_seconds: 0.0,
        });
        assert_eq!(*seen.lock().unwrap(), vec![7.0]);
    }

    #[test]
    fn test_config_debug_hides_observer() {
        let config = SolverConfig::new()
            .with_time_limit(10.0)
            .with_observer(|_: &ImprovedSolution| {});
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("time_limit"));
        assert!(debug_str.contains("10.0"));
        assert!(debug_str.contains("<observer>"));
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = SolverConfig::from_lookup(lookup(&[
            ("TESSERA_TIME_LIMIT", "2.5"),
            ("TESSERA_SOLVER", "CP"),
            ("TESSERA_SOLVER_TRACE", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.time_limit, Some(2.5));
        assert_eq!(config.kind(), SolverKind::Cp);
        assert!(config.trace_enabled());
    }

    #[test]
    fn test_from_lookup_empty_environment() {
        let config = SolverConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = SolverConfig::from_lookup(lookup(&[("TESSERA_TIME_LIMIT", "-3")])).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_ENV");

        let err = SolverConfig::from_lookup(lookup(&[("TESSERA_SOLVER", "gurobi")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                name: "TESSERA_SOLVER".to_string(),
                value: "gurobi".to_string(),
            }
        );
    }

    #[test]
    fn test_settings_from_json() {
        let settings =
            SolverSettings::from_json(r#"{"time_limit": 30, "solver": "cp", "threads": 2}"#)
                .unwrap();
        let config = SolverConfig::from(settings);
        assert_eq!(config.time_limit, Some(30.0));
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.kind(), SolverKind::Cp);
        assert!(config.on_improved_solution.is_none());
    }

    #[test]
    fn test_settings_reject_unknown_fields() {
        let err = SolverSettings::from_json(r#"{"presolve": true}"#).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_SETTINGS");
    }
}
