use crate::key::VarKey;
use crate::model::{Model, ModelError};
use tessera_expr::{ComparisonSense, ConstraintId};

use super::{IndexTuple, log_template, row_name};

/// For each element, the sum of its variables over all buckets equals one.
pub fn exact_cover<E: IndexTuple>(
    model: &mut Model,
    name: &str,
    elements: &[E],
    buckets: &[i64],
    key: impl Fn(E, i64) -> Option<VarKey>,
) -> Result<Vec<ConstraintId>, ModelError> {
    let rows = cover_rows(model, name, elements, buckets, &key, |_| 1.0)?;
    log_template("exact_cover", name, rows.len());
    Ok(rows)
}

/// For each element, the sum of its variables over all buckets equals `demand(element)`.
pub fn demand_cover<E: IndexTuple>(
    model: &mut Model,
    name: &str,
    elements: &[E],
    buckets: &[i64],
    key: impl Fn(E, i64) -> Option<VarKey>,
    demand: impl Fn(E) -> f64,
) -> Result<Vec<ConstraintId>, ModelError> {
    let rows = cover_rows(model, name, elements, buckets, &key, demand)?;
    log_template("demand_cover", name, rows.len());
    Ok(rows)
}

fn cover_rows<E: IndexTuple>(
    model: &mut Model,
    name: &str,
    elements: &[E],
    buckets: &[i64],
    key: &impl Fn(E, i64) -> Option<VarKey>,
    rhs: impl Fn(E) -> f64,
) -> Result<Vec<ConstraintId>, ModelError> {
    elements
        .iter()
        .map(|&element| {
            let terms: Vec<(VarKey, f64)> = buckets
                .iter()
                .filter_map(|&bucket| key(element, bucket))
                .map(|var| (var, 1.0))
                .collect();
            model.add_constraint(
                row_name(name, &element.indices()),
                terms,
                ComparisonSense::Equal,
                rhs(element),
            )
        })
        .collect()
}
