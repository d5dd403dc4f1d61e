use crate::conflict::ConflictSet;
use crate::key::VarKey;
use crate::model::{Model, ModelError};
use tessera_expr::{ComparisonSense, ConstraintId};

use super::{log_template, row_name};

/// For each conflict pair `(a, c)` and bucket `b`: `x[a,b] + x[c,b] <= 1`.
///
/// Pairs where either variable is absent are skipped.
pub fn mutual_exclusion(
    model: &mut Model,
    name: &str,
    conflicts: &ConflictSet,
    buckets: &[i64],
    key: impl Fn(i64, i64) -> Option<VarKey>,
) -> Result<Vec<ConstraintId>, ModelError> {
    let mut rows = Vec::new();
    for (a, c) in conflicts.iter() {
        for &bucket in buckets {
            let (Some(first), Some(second)) = (key(a, bucket), key(c, bucket)) else {
                continue;
            };
            rows.push(model.add_constraint(
                row_name(name, &[a, c, bucket]),
                [(first, 1.0), (second, 1.0)],
                ComparisonSense::LessEqual,
                1.0,
            )?);
        }
    }
    log_template("mutual_exclusion", name, rows.len());
    Ok(rows)
}

/// An element may only use an active bucket: `x[e,b] - y[b] <= 0`.
pub fn capacity_coupling(
    model: &mut Model,
    name: &str,
    elements: &[i64],
    buckets: &[i64],
    key: impl Fn(i64, i64) -> Option<VarKey>,
    active: impl Fn(i64) -> Option<VarKey>,
) -> Result<Vec<ConstraintId>, ModelError> {
    let mut rows = Vec::new();
    for &element in elements {
        for &bucket in buckets {
            let (Some(assign), Some(open)) = (key(element, bucket), active(bucket)) else {
                continue;
            };
            rows.push(model.add_constraint(
                row_name(name, &[element, bucket]),
                [(assign, 1.0), (open, -1.0)],
                ComparisonSense::LessEqual,
                0.0,
            )?);
        }
    }
    log_template("capacity_coupling", name, rows.len());
    Ok(rows)
}
