//! Thin layer over the `highs` crate.
//!
//! [`HighsProblem`] collects columns and rows; [`HighsProblem::solve`]
//! consumes it and hands back a [`HighsSolution`], so solution accessors
//! cannot be reached before a solve.
#![allow(unsafe_code)]

use highs::{Col, HighsModelStatus, RowProblem, Sense as HighsSense, SolvedModel};
use std::ffi::{CStr, CString};
use std::fmt;
use tessera_core::{Bounds, Sense};
use tracing::{debug, trace};

/// `kSolutionStatusFeasible` in HiGHS.
const SOLUTION_STATUS_FEASIBLE: highs_sys::HighsInt = 2;

/// Terminal status reported by HiGHS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Presolve could not tell infeasible from unbounded
    UnboundedOrInfeasible,
    /// May carry an incumbent
    ReachedTimeLimit,
    ReachedIterationLimit,
    Unknown,
}

impl From<HighsModelStatus> for HighsStatus {
    fn from(status: HighsModelStatus) -> Self {
        match status {
            HighsModelStatus::Optimal => HighsStatus::Optimal,
            HighsModelStatus::Infeasible => HighsStatus::Infeasible,
            HighsModelStatus::Unbounded => HighsStatus::Unbounded,
            HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
            HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
            HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
            _ => HighsStatus::Unknown,
        }
    }
}

/// A row referenced a column that was never added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOutOfRange {
    pub column: usize,
    pub num_columns: usize,
}

impl fmt::Display for ColumnOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column {} out of range ({} columns)",
            self.column, self.num_columns
        )
    }
}

impl std::error::Error for ColumnOutOfRange {}

/// Option values forwarded to HiGHS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
}

/// A row problem under construction.
pub struct HighsProblem {
    problem: RowProblem,
    columns: Vec<Col>,
    sense: Sense,
    verbose: bool,
    options: Vec<(&'static str, HighsOption)>,
}

impl HighsProblem {
    pub fn new(sense: Sense) -> Self {
        Self {
            problem: RowProblem::default(),
            columns: Vec::new(),
            sense,
            verbose: false,
            options: Vec::new(),
        }
    }

    /// Add a column and return its index.
    pub fn add_column(&mut self, bounds: Bounds, objective: f64, integer: bool) -> usize {
        let range = bounds.lower..=bounds.upper;
        let col = if integer {
            self.problem.add_integer_column(objective, range)
        } else {
            self.problem.add_column(objective, range)
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Add a row over `(column, coefficient)` terms and return its index.
    pub fn add_row(&mut self, bounds: Bounds, terms: &[(usize, f64)]) -> Result<usize, ColumnOutOfRange> {
        let num_columns = self.columns.len();
        let factors = terms
            .iter()
            .map(|&(column, coeff)| {
                self.columns
                    .get(column)
                    .map(|col| (*col, coeff))
                    .ok_or(ColumnOutOfRange {
                        column,
                        num_columns,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.problem.add_row(bounds.lower..=bounds.upper, factors);
        Ok(self.problem.num_rows().saturating_sub(1))
    }

    /// Forward HiGHS log output to the console.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_option(&mut self, name: &'static str, value: HighsOption) {
        self.options.push((name, value));
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.problem.num_rows()
    }

    pub fn solve(self) -> HighsSolution {
        debug!(
            component = "solver",
            operation = "solve",
            status = "start",
            num_cols = self.problem.num_cols(),
            num_rows = self.problem.num_rows(),
            sense = self.sense.as_str(),
            "Handing problem to HiGHS"
        );

        let sense = match self.sense {
            Sense::Minimize => HighsSense::Minimise,
            Sense::Maximize => HighsSense::Maximise,
        };
        let mut model = self.problem.optimise(sense);
        if self.verbose {
            model.set_option("output_flag", true);
            model.set_option("log_to_console", true);
        } else {
            model.make_quiet();
        }
        for (name, value) in self.options {
            match value {
                HighsOption::Bool(val) => model.set_option(name, val),
                HighsOption::Int(val) => model.set_option(name, val),
                HighsOption::Float(val) => model.set_option(name, val),
            }
        }

        let solved = model.solve();
        let status = HighsStatus::from(solved.status());
        trace!(
            component = "solver",
            operation = "solve",
            status = "success",
            highs_status = ?status,
            "HiGHS returned"
        );
        HighsSolution { solved, status }
    }
}

impl fmt::Debug for HighsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsProblem")
            .field("num_columns", &self.columns.len())
            .field("num_rows", &self.problem.num_rows())
            .field("sense", &self.sense)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

/// The outcome of one HiGHS run.
pub struct HighsSolution {
    solved: SolvedModel,
    status: HighsStatus,
}

impl HighsSolution {
    pub fn status(&self) -> HighsStatus {
        self.status
    }

    pub fn objective_value(&self) -> f64 {
        self.solved.objective_value()
    }

    /// Relative MIP gap; infinite for pure LPs.
    pub fn mip_gap(&self) -> f64 {
        self.solved.mip_gap()
    }

    /// Whether HiGHS holds a feasible primal point. Time-limited MIP solves
    /// report their incumbent this way.
    pub fn has_primal_solution(&self) -> bool {
        self.int_info("primal_solution_status") == Some(SOLUTION_STATUS_FEASIBLE)
    }

    /// Column values, indexed like the columns were added.
    pub fn column_values(&self) -> Vec<f64> {
        self.solved.get_solution().columns().to_vec()
    }

    fn int_info(&self, name: &str) -> Option<highs_sys::HighsInt> {
        let c_name = CString::new(name).ok()?;
        let mut value: highs_sys::HighsInt = 0;
        let status = unsafe {
            highs_sys::Highs_getIntInfoValue(self.solved.as_ptr(), c_name.as_ptr(), &raw mut value)
        };
        if status == highs_sys::STATUS_OK {
            Some(value)
        } else {
            debug!(
                component = "solver",
                operation = "solve_info",
                info = name,
                status_code = status,
                "HiGHS info value not available"
            );
            None
        }
    }
}

impl fmt::Debug for HighsSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsSolution")
            .field("status", &self.status)
            .field("objective_value", &self.objective_value())
            .finish_non_exhaustive()
    }
}

/// Return the HiGHS solver version string, if available.
pub fn highs_version() -> Option<String> {
    unsafe {
        let ptr = highs_sys::Highs_version();
        if ptr.is_null() {
            None
        } else {
            CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
        }
    }
}
