//! Budgeted shortest path: the shortest source-to-sink route whose total
//! fuel stays within a budget.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tessera_core::templates::{FlowNetwork, flow_conservation, unit_flow_endpoints};
use tessera_core::{ComparisonSense, Model, Sense, VarKey};
use tessera_solver::SolveResult;

use crate::domain::PathResult;
use crate::error::ProblemError;
use crate::family::{ProblemFamily, VALIDATION_TOLERANCE, ensure_solved};

/// A directed connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: i64,
    pub to: i64,
    pub distance: f64,
    pub fuel: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInstance {
    pub nodes: Vec<i64>,
    pub arcs: Vec<Connection>,
    pub source: i64,
    pub sink: i64,
    pub budget: f64,
}

fn x(from: i64, to: i64) -> VarKey {
    VarKey::new("x", [from, to])
}

impl PathInstance {
    fn validate(&self) -> Result<(), ProblemError> {
        let nodes: BTreeSet<i64> = self.nodes.iter().copied().collect();
        if nodes.len() != self.nodes.len() {
            return Err(ProblemError::InvalidInstance(
                "node list contains duplicates".to_string(),
            ));
        }
        for endpoint in [self.source, self.sink] {
            if !nodes.contains(&endpoint) {
                return Err(ProblemError::InvalidInstance(format!(
                    "endpoint {endpoint} is not a node"
                )));
            }
        }
        if self.source == self.sink {
            return Err(ProblemError::InvalidInstance(
                "source and sink coincide".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for arc in &self.arcs {
            if !nodes.contains(&arc.from) || !nodes.contains(&arc.to) {
                return Err(ProblemError::InvalidInstance(format!(
                    "arc {} -> {} leaves the node set",
                    arc.from, arc.to
                )));
            }
            if arc.from == arc.to {
                return Err(ProblemError::InvalidInstance(format!(
                    "arc {} -> {} is a loop",
                    arc.from, arc.to
                )));
            }
            if !seen.insert((arc.from, arc.to)) {
                return Err(ProblemError::InvalidInstance(format!(
                    "arc {} -> {} is listed twice",
                    arc.from, arc.to
                )));
            }
        }
        Ok(())
    }

    fn network(&self) -> FlowNetwork {
        FlowNetwork::new(
            self.nodes.clone(),
            self.arcs.iter().map(|arc| (arc.from, arc.to)).collect(),
            self.source,
            self.sink,
        )
    }
}

impl ProblemFamily for PathInstance {
    type Output = PathResult;

    fn name(&self) -> &'static str {
        "budgeted_path"
    }

    fn build(&self) -> Result<Model, ProblemError> {
        self.validate()?;

        let mut model = Model::new();
        model.declare_index_set("nodes", self.nodes.iter().copied())?;
        model.declare_family("x", &["nodes", "nodes"])?;
        for arc in &self.arcs {
            model.add_binary(x(arc.from, arc.to))?;
        }

        model.add_constraint(
            "budget",
            self.arcs.iter().map(|arc| (x(arc.from, arc.to), arc.fuel)),
            ComparisonSense::LessEqual,
            self.budget,
        )?;

        let arcs: BTreeSet<(i64, i64)> =
            self.arcs.iter().map(|arc| (arc.from, arc.to)).collect();
        let key = |from: i64, to: i64| arcs.contains(&(from, to)).then(|| x(from, to));
        let network = self.network();
        unit_flow_endpoints(&mut model, "endpoint", &network, key)?;
        flow_conservation(&mut model, "flow", &network, key)?;

        model.set_objective(
            self.arcs.iter().map(|arc| (x(arc.from, arc.to), arc.distance)),
            Sense::Minimize,
        )?;
        Ok(model)
    }

    /// Follow the unique selected successor from the source until the sink.
    /// Remaining selected arcs must form balanced cycles; they are reported
    /// as `detached`.
    fn project(&self, result: &SolveResult) -> Result<PathResult, ProblemError> {
        ensure_solved(result)?;

        let selected: Vec<&Connection> = self
            .arcs
            .iter()
            .filter(|arc| result.is_selected(&x(arc.from, arc.to)))
            .collect();
        let mut successors: BTreeMap<i64, Vec<&Connection>> = BTreeMap::new();
        for &arc in &selected {
            successors.entry(arc.from).or_default().push(arc);
        }

        let step_limit = self.arcs.len() + 1;
        let mut nodes = vec![self.source];
        let mut used: Vec<&Connection> = Vec::new();
        let mut current = self.source;
        while current != self.sink {
            if used.len() >= step_limit {
                return Err(ProblemError::IncompletePath {
                    at: current,
                    reason: format!("no sink within {step_limit} steps"),
                });
            }
            let arc = match successors.get(&current).map(Vec::as_slice) {
                Some([arc]) => *arc,
                Some(many) if many.len() > 1 => {
                    return Err(ProblemError::IncompletePath {
                        at: current,
                        reason: format!("{} selected successors", many.len()),
                    });
                }
                _ => {
                    return Err(ProblemError::IncompletePath {
                        at: current,
                        reason: "no selected successor".to_string(),
                    });
                }
            };
            used.push(arc);
            current = arc.to;
            nodes.push(current);
        }

        let detached: Vec<&Connection> = selected
            .iter()
            .copied()
            .filter(|arc| !used.iter().any(|step| (step.from, step.to) == (arc.from, arc.to)))
            .collect();
        let mut balance: BTreeMap<i64, i64> = BTreeMap::new();
        for arc in &detached {
            *balance.entry(arc.from).or_insert(0) += 1;
            *balance.entry(arc.to).or_insert(0) -= 1;
        }
        if let Some((node, _)) = balance.iter().find(|&(_, net)| *net != 0) {
            return Err(ProblemError::Validation(format!(
                "selected arcs off the path are unbalanced at node {node}"
            )));
        }

        let distance: f64 = used.iter().map(|arc| arc.distance).sum();
        let fuel: f64 = used.iter().map(|arc| arc.fuel).sum();
        if fuel > self.budget + VALIDATION_TOLERANCE {
            return Err(ProblemError::Validation(format!(
                "fuel {fuel} exceeds budget {}",
                self.budget
            )));
        }

        Ok(PathResult {
            nodes,
            distance,
            fuel,
            budget: self.budget,
            detached: detached.iter().map(|arc| (arc.from, arc.to)).collect(),
        })
    }

    /// Route distance plus the distance of detached cycles, which the model
    /// objective also pays for.
    fn objective_of(&self, output: &PathResult) -> f64 {
        let distance_of = |from: i64, to: i64| {
            self.arcs
                .iter()
                .find(|arc| arc.from == from && arc.to == to)
                .map_or(0.0, |arc| arc.distance)
        };
        let route: f64 = output
            .nodes
            .windows(2)
            .map(|step| distance_of(step[0], step[1]))
            .sum();
        let detached: f64 = output
            .detached
            .iter()
            .map(|&(from, to)| distance_of(from, to))
            .sum();
        route + detached
    }
}
