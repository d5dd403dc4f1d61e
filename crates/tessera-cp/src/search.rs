//! The branch and bound session.

use std::time::{Duration, Instant};

use crate::state::{Domain, SearchState};
use crate::stats::SearchStatistics;

/// Nodes between two time-limit checks.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Required objective improvement over the incumbent.
const IMPROVEMENT_TOLERANCE: f64 = 1e-9;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TerminationReason {
    /// The tree was exhausted; the incumbent (if any) is optimal.
    Exhausted,
    /// The time limit stopped the search.
    TimeLimit,
}

/// Outcome of a search run. Objectives are in minimisation form.
#[derive(Debug, Clone)]
pub(crate) struct SearchOutcome {
    pub reason: TerminationReason,
    pub best: Option<(f64, Vec<i64>)>,
    pub statistics: SearchStatistics,
}

/// Branching state of one tree level.
#[derive(Debug, Clone, Copy)]
struct Frame {
    var: usize,
    next: Option<i64>,
    descending: bool,
    trail_mark: usize,
    objective_mark: f64,
}

impl Frame {
    fn new(var: usize, domain: Domain, cost: f64, trail_mark: usize, objective_mark: f64) -> Self {
        // cheapest value first; zero-cost variables start at their lower bound
        let descending = cost < 0.0;
        let next = Some(if descending { domain.upper } else { domain.lower });
        Self {
            var,
            next,
            descending,
            trail_mark,
            objective_mark,
        }
    }

    fn next_value(&mut self, domain: Domain) -> Option<i64> {
        let value = self.next?;
        self.next = if self.descending {
            (value > domain.lower).then(|| value - 1)
        } else {
            (value < domain.upper).then(|| value + 1)
        };
        Some(value)
    }
}

/// A single depth-first search over a [`SearchState`].
pub(crate) struct SearchSession<'a, F>
where
    F: FnMut(f64, &[i64], Duration),
{
    state: SearchState,
    costs: Vec<f64>,
    /// `optimistic_suffix[d]` is the least possible objective of variables `d..`.
    optimistic_suffix: Vec<f64>,
    time_limit: Option<Duration>,
    time_check_interval: u64,
    on_solution: &'a mut F,
    best: Option<(f64, Vec<i64>)>,
    statistics: SearchStatistics,
    start_time: Instant,
}

impl<'a, F> SearchSession<'a, F>
where
    F: FnMut(f64, &[i64], Duration),
{
    /// `costs` are objective coefficients in minimisation form.
    pub(crate) fn new(
        state: SearchState,
        costs: Vec<f64>,
        time_limit: Option<Duration>,
        on_solution: &'a mut F,
    ) -> Self {
        let mut optimistic_suffix = vec![0.0; costs.len() + 1];
        for var in (0..costs.len()).rev() {
            let domain = state.domain(var);
            let a = costs[var] * domain.lower as f64;
            let b = costs[var] * domain.upper as f64;
            optimistic_suffix[var] = optimistic_suffix[var + 1] + a.min(b);
        }
        Self {
            state,
            costs,
            optimistic_suffix,
            time_limit,
            time_check_interval: TIME_CHECK_INTERVAL,
            on_solution,
            best: None,
            statistics: SearchStatistics::default(),
            start_time: Instant::now(),
        }
    }

    #[cfg(test)]
    fn with_time_check_interval(mut self, nodes: u64) -> Self {
        self.time_check_interval = nodes.max(1);
        self
    }

    fn time_exceeded(&self) -> bool {
        self.time_limit
            .is_some_and(|limit| self.start_time.elapsed() >= limit)
    }

    fn can_improve(&self, bound: f64) -> bool {
        match &self.best {
            Some((incumbent, _)) => bound < incumbent - IMPROVEMENT_TOLERANCE,
            None => true,
        }
    }

    fn push_frame(&self, frames: &mut Vec<Frame>, var: usize, objective_mark: f64) {
        frames.push(Frame::new(
            var,
            self.state.domain(var),
            self.costs[var],
            self.state.trail_len(),
            objective_mark,
        ));
    }

    pub(crate) fn run(mut self) -> SearchOutcome {
        if let Some(row) = self.state.first_unsatisfiable_row() {
            tracing::debug!(
                component = "cp",
                operation = "search",
                status = "infeasible",
                row,
                "Row unsatisfiable before branching"
            );
            return self.finish(TerminationReason::Exhausted);
        }

        let num_vars = self.state.num_variables();
        if num_vars == 0 {
            self.record_solution(0.0);
            return self.finish(TerminationReason::Exhausted);
        }

        let mut frames: Vec<Frame> = Vec::with_capacity(num_vars);
        self.push_frame(&mut frames, 0, 0.0);

        let reason = loop {
            let Some(frame) = frames.last_mut() else {
                break TerminationReason::Exhausted;
            };

            if self.statistics.nodes_explored % self.time_check_interval == 0 && self.time_exceeded() {
                break TerminationReason::TimeLimit;
            }
            self.statistics.on_node_explored();

            self.state.undo_to(frame.trail_mark);
            let var = frame.var;
            let objective_mark = frame.objective_mark;
            let Some(value) = frame.next_value(self.state.domain(var)) else {
                frames.pop();
                self.statistics.on_backtrack();
                continue;
            };

            if !self.state.assign(var, value) {
                self.statistics.on_pruning_infeasible();
                continue;
            }

            let objective = objective_mark + self.costs[var] * value as f64;
            if !self.can_improve(objective + self.optimistic_suffix[var + 1]) {
                self.statistics.on_pruning_bound();
                continue;
            }

            if var + 1 == num_vars {
                self.record_solution(objective);
                continue;
            }

            self.statistics.on_depth(var + 1);
            self.push_frame(&mut frames, var + 1, objective);
        };

        self.finish(reason)
    }

    fn record_solution(&mut self, objective: f64) {
        self.statistics.on_solution_found();
        let values = self.state.values().to_vec();
        let elapsed = self.start_time.elapsed();
        tracing::trace!(
            component = "cp",
            operation = "search",
            status = "improved",
            objective,
            nodes = self.statistics.nodes_explored,
            "Found improving solution"
        );
        (self.on_solution)(objective, &values, elapsed);
        self.best = Some((objective, values));
    }

    fn finish(mut self, reason: TerminationReason) -> SearchOutcome {
        self.statistics.set_total_time(self.start_time.elapsed());
        SearchOutcome {
            reason,
            best: self.best,
            statistics: self.statistics,
        }
    }
}
