//! Reusable constraint families.
//!
//! Each template emits one family of named linear constraints into a
//! [`Model`](crate::Model). Rows are named `{name}[{indices}]`. Key functions
//! return `Option<VarKey>` so sparse variable families skip absent
//! combinations.

mod cover;
mod exclusion;
mod flow;
mod occupancy;

pub use cover::{demand_cover, exact_cover};
pub use exclusion::{capacity_coupling, mutual_exclusion};
pub use flow::{FlowNetwork, flow_conservation, unit_flow_endpoints};
pub use occupancy::{at_least_one_active, at_most_one};

use crate::key::join_indices;

/// An element index usable as a template row label.
pub trait IndexTuple: Copy {
    fn indices(&self) -> Vec<i64>;
}

impl IndexTuple for i64 {
    fn indices(&self) -> Vec<i64> {
        vec![*self]
    }
}

impl IndexTuple for (i64, i64) {
    fn indices(&self) -> Vec<i64> {
        vec![self.0, self.1]
    }
}

impl IndexTuple for (i64, i64, i64) {
    fn indices(&self) -> Vec<i64> {
        vec![self.0, self.1, self.2]
    }
}

pub(crate) fn row_name(name: &str, indices: &[i64]) -> String {
    format!("{name}[{}]", join_indices(indices))
}

pub(crate) fn log_template(template: &'static str, name: &str, rows: usize) {
    tracing::debug!(
        component = "templates",
        operation = template,
        status = "success",
        family = name,
        rows,
        "Emitted constraint family"
    );
}
