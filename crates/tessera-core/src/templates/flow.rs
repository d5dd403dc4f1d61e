use crate::key::VarKey;
use crate::model::{Model, ModelError};
use tessera_expr::{ComparisonSense, ConstraintId};

use super::{log_template, row_name};

/// A directed network with a designated source and sink.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNetwork {
    pub nodes: Vec<i64>,
    pub arcs: Vec<(i64, i64)>,
    pub source: i64,
    pub sink: i64,
}

impl FlowNetwork {
    pub fn new(nodes: Vec<i64>, arcs: Vec<(i64, i64)>, source: i64, sink: i64) -> Self {
        Self {
            nodes,
            arcs,
            source,
            sink,
        }
    }

    /// Net outflow terms of `node`: `+1` for leaving arcs, `-1` for entering arcs.
    fn net_outflow(&self, node: i64, key: &impl Fn(i64, i64) -> Option<VarKey>) -> Vec<(VarKey, f64)> {
        let mut terms = Vec::new();
        for &(from, to) in &self.arcs {
            if from == to {
                continue;
            }
            let coeff = if from == node {
                1.0
            } else if to == node {
                -1.0
            } else {
                continue;
            };
            if let Some(var) = key(from, to) {
                terms.push((var, coeff));
            }
        }
        terms
    }
}

/// For every interior node, inflow equals outflow.
pub fn flow_conservation(
    model: &mut Model,
    name: &str,
    network: &FlowNetwork,
    key: impl Fn(i64, i64) -> Option<VarKey>,
) -> Result<Vec<ConstraintId>, ModelError> {
    let mut rows = Vec::new();
    for &node in &network.nodes {
        if node == network.source || node == network.sink {
            continue;
        }
        rows.push(model.add_constraint(
            row_name(name, &[node]),
            network.net_outflow(node, &key),
            ComparisonSense::Equal,
            0.0,
        )?);
    }
    log_template("flow_conservation", name, rows.len());
    Ok(rows)
}

/// One unit leaves the source and one unit reaches the sink.
pub fn unit_flow_endpoints(
    model: &mut Model,
    name: &str,
    network: &FlowNetwork,
    key: impl Fn(i64, i64) -> Option<VarKey>,
) -> Result<Vec<ConstraintId>, ModelError> {
    let source = model.add_constraint(
        row_name(name, &[network.source]),
        network.net_outflow(network.source, &key),
        ComparisonSense::Equal,
        1.0,
    )?;
    let inflow: Vec<(VarKey, f64)> = network
        .net_outflow(network.sink, &key)
        .into_iter()
        .map(|(var, coeff)| (var, -coeff))
        .collect();
    let sink = model.add_constraint(
        row_name(name, &[network.sink]),
        inflow,
        ComparisonSense::Equal,
        1.0,
    )?;
    log_template("unit_flow_endpoints", name, 2);
    Ok(vec![source, sink])
}
