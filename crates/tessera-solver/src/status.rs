//! Solver status types.

use serde::{Deserialize, Serialize};

/// Termination status of a solve, common to every backend.
///
/// Time-limit terminations are not a separate status; they are reported via
/// [`SolveResult::time_limit_reached`](crate::SolveResult::time_limit_reached).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    /// Optimal (or best found before the time limit) solution.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// The solver stopped without a usable solution.
    Error,
}

impl SolveStatus {
    /// Check if the status carries a solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    /// Check if the status indicates infeasibility.
    pub fn is_infeasible(self) -> bool {
        matches!(self, SolveStatus::Infeasible)
    }

    /// Check if the status indicates unboundedness.
    pub fn is_unbounded(self) -> bool {
        matches!(self, SolveStatus::Unbounded)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(SolveStatus::Optimal.is_optimal());
        assert!(!SolveStatus::Error.is_optimal());
        assert!(SolveStatus::Infeasible.is_infeasible());
        assert!(!SolveStatus::Optimal.is_infeasible());
        assert!(SolveStatus::Unbounded.is_unbounded());
        assert!(!SolveStatus::Infeasible.is_unbounded());
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(SolveStatus::Optimal.as_str(), "optimal");
        assert_eq!(SolveStatus::Infeasible.as_str(), "infeasible");
        assert_eq!(SolveStatus::Unbounded.as_str(), "unbounded");
        assert_eq!(SolveStatus::Error.as_str(), "error");
    }

    #[test]
    fn test_status_serde_matches_display() {
        let json = serde_json::to_string(&SolveStatus::Infeasible).unwrap();
        assert_eq!(json, "\"infeasible\"");
        assert_eq!(format!("{}", SolveStatus::Infeasible), "infeasible");
    }
}
