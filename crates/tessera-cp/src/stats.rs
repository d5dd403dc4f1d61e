use std::time::Duration;

/// Statistics collected during a branch and bound run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Total frames exhausted and popped.
    pub backtracks: u64,
    /// Pruned because a row could no longer be satisfied.
    pub prunings_infeasible: u64,
    /// Pruned because the optimistic objective could not beat the incumbent.
    pub prunings_bound: u64,
    /// Total improving solutions found.
    pub solutions_found: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Total time spent in the search.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} backtracks={} pruned_infeasible={} pruned_bound={} solutions={} max_depth={} time={:?}",
            self.nodes_explored,
            self.backtracks,
            self.prunings_infeasible,
            self.prunings_bound,
            self.solutions_found,
            self.max_depth,
            self.time_total
        )
    }
}
