use crate::key::VarKey;
use crate::model::{Model, ModelError};
use tessera_expr::{ComparisonSense, ConstraintId};

use super::{log_template, row_name};

/// For each `(resource, slot)`, at most one of the indicators placing an entity there is set.
///
/// Pairs with no indicators emit no row.
pub fn at_most_one(
    model: &mut Model,
    name: &str,
    resources: &[i64],
    slots: &[i64],
    keys: impl Fn(i64, i64) -> Vec<VarKey>,
) -> Result<Vec<ConstraintId>, ModelError> {
    let mut rows = Vec::new();
    for &resource in resources {
        for &slot in slots {
            let indicators = keys(resource, slot);
            if indicators.is_empty() {
                continue;
            }
            rows.push(model.add_constraint(
                row_name(name, &[resource, slot]),
                indicators.into_iter().map(|var| (var, 1.0)),
                ComparisonSense::LessEqual,
                1.0,
            )?);
        }
    }
    log_template("at_most_one", name, rows.len());
    Ok(rows)
}

/// At least one bucket is active. Callers emit it only when there is at least one element.
pub fn at_least_one_active(
    model: &mut Model,
    name: &str,
    buckets: &[i64],
    active: impl Fn(i64) -> Option<VarKey>,
) -> Result<ConstraintId, ModelError> {
    let terms: Vec<(VarKey, f64)> = buckets
        .iter()
        .filter_map(|&bucket| active(bucket))
        .map(|var| (var, 1.0))
        .collect();
    let row = model.add_constraint(name, terms, ComparisonSense::GreaterEqual, 1.0)?;
    log_template("at_least_one_active", name, 1);
    Ok(row)
}
