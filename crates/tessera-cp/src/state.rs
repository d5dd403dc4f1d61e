//! Row activity bounds with an undo trail.

/// Slack allowed when comparing row activities against their bounds.
pub(crate) const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Integer domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Domain {
    pub lower: i64,
    pub upper: i64,
}

impl Domain {
    /// Range of `coeff * v` over the domain.
    #[inline]
    fn contribution(self, coeff: f64) -> (f64, f64) {
        let a = coeff * self.lower as f64;
        let b = coeff * self.upper as f64;
        (a.min(b), a.max(b))
    }
}

/// Bounds on a row's activity given the current partial assignment.
#[derive(Debug, Clone, Copy)]
struct RowActivity {
    lower: f64,
    upper: f64,
    min: f64,
    max: f64,
}

impl RowActivity {
    #[inline]
    fn is_satisfiable(&self) -> bool {
        self.min <= self.upper + FEASIBILITY_TOLERANCE
            && self.max >= self.lower - FEASIBILITY_TOLERANCE
    }
}

/// A single row mutation recorded for backtracking.
#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    row: usize,
    old_min: f64,
    old_max: f64,
}

#[derive(Debug)]
pub(crate) struct SearchState {
    rows: Vec<RowActivity>,
    columns: Vec<Vec<(usize, f64)>>,
    domains: Vec<Domain>,
    trail: Vec<TrailEntry>,
    values: Vec<i64>,
}

impl SearchState {
    /// `rows` holds `(lower, upper)` per row; `columns` holds `(row, coeff)` per variable.
    pub(crate) fn new(
        rows: Vec<(f64, f64)>,
        columns: Vec<Vec<(usize, f64)>>,
        domains: Vec<Domain>,
    ) -> Self {
        let mut activities: Vec<RowActivity> = rows
            .into_iter()
            .map(|(lower, upper)| RowActivity {
                lower,
                upper,
                min: 0.0,
                max: 0.0,
            })
            .collect();
        for (column, domain) in columns.iter().zip(&domains) {
            for &(row, coeff) in column {
                let (lo, hi) = domain.contribution(coeff);
                if let Some(activity) = activities.get_mut(row) {
                    activity.min += lo;
                    activity.max += hi;
                }
            }
        }
        let values = domains.iter().map(|domain| domain.lower).collect();
        Self {
            rows: activities,
            columns,
            domains,
            trail: Vec::new(),
            values,
        }
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn domain(&self, var: usize) -> Domain {
        self.domains[var]
    }

    /// Index of the first row that no assignment can satisfy.
    pub(crate) fn first_unsatisfiable_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| !row.is_satisfiable())
    }

    #[inline]
    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Fix `var` to `value`, tightening every touched row.
    ///
    /// Returns `false` as soon as a touched row becomes unsatisfiable; the
    /// partial update stays on the trail and is reverted by [`Self::undo_to`].
    pub(crate) fn assign(&mut self, var: usize, value: i64) -> bool {
        let domain = self.domains[var];
        self.values[var] = value;
        for &(row, coeff) in &self.columns[var] {
            let activity = &mut self.rows[row];
            self.trail.push(TrailEntry {
                row,
                old_min: activity.min,
                old_max: activity.max,
            });
            let (lo, hi) = domain.contribution(coeff);
            let fixed = coeff * value as f64;
            activity.min += fixed - lo;
            activity.max += fixed - hi;
            if !activity.is_satisfiable() {
                return false;
            }
        }
        true
    }

    /// Revert row mutations back to a trail mark.
    pub(crate) fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(entry) = self.trail.pop() {
                let activity = &mut self.rows[entry.row];
                activity.min = entry.old_min;
                activity.max = entry.old_max;
            }
        }
    }

    pub(crate) fn values(&self) -> &[i64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> Domain {
        Domain { lower: 0, upper: 1 }
    }

    /// x0 + x1 == 1
    fn exact_one() -> SearchState {
        SearchState::new(
            vec![(1.0, 1.0)],
            vec![vec![(0, 1.0)], vec![(0, 1.0)]],
            vec![binary(), binary()],
        )
    }

    #[test]
    fn test_initial_rows_are_satisfiable() {
        let state = exact_one();
        assert_eq!(state.first_unsatisfiable_row(), None);
        assert_eq!(state.num_variables(), 2);
    }

    #[test]
    fn test_assign_detects_overcover() {
        let mut state = exact_one();
        assert!(state.assign(0, 1));
        let mark = state.trail_len();
        assert!(!state.assign(1, 1));
        state.undo_to(mark);
        assert!(state.assign(1, 0));
        assert_eq!(state.values(), &[1, 0]);
    }

    #[test]
    fn test_assign_detects_undercover() {
        let mut state = exact_one();
        assert!(state.assign(0, 0));
        assert!(!state.assign(1, 0));
    }

    #[test]
    fn test_undo_restores_initial_bounds() {
        let mut state = exact_one();
        assert!(state.assign(0, 0));
        state.undo_to(0);
        assert_eq!(state.trail_len(), 0);
        assert!(state.assign(0, 1));
        assert!(state.assign(1, 0));
    }

    #[test]
    fn test_negative_coefficients() {
        // x - y <= 0 with x fixed to 1 forces y = 1
        let mut state = SearchState::new(
            vec![(f64::NEG_INFINITY, 0.0)],
            vec![vec![(0, 1.0)], vec![(0, -1.0)]],
            vec![binary(), binary()],
        );
        assert!(state.assign(0, 1));
        let mark = state.trail_len();
        assert!(!state.assign(1, 0));
        state.undo_to(mark);
        assert!(state.assign(1, 1));
    }

    #[test]
    fn test_empty_row_outside_bounds() {
        let state = SearchState::new(vec![(1.0, 1.0)], Vec::new(), Vec::new());
        assert_eq!(state.first_unsatisfiable_row(), Some(0));
    }
}
