//! Weighted set partitioning: choose subsets covering every product exactly
//! once at least total cost.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tessera_core::templates::exact_cover;
use tessera_core::{Model, Sense, VarKey};
use tessera_solver::SolveResult;

use crate::domain::SubsetSelection;
use crate::error::ProblemError;
use crate::family::{ProblemFamily, ensure_solved};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subset {
    pub cost: f64,
    pub elements: Vec<i64>,
}

impl Subset {
    pub fn new(cost: f64, elements: impl IntoIterator<Item = i64>) -> Self {
        Self {
            cost,
            elements: elements.into_iter().collect(),
        }
    }

    fn contains(&self, product: i64) -> bool {
        self.elements.contains(&product)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionInstance {
    pub products: Vec<i64>,
    pub subsets: Vec<Subset>,
}

fn x(subset: i64) -> VarKey {
    VarKey::new("x", [subset])
}

impl PartitionInstance {
    pub fn new(products: impl IntoIterator<Item = i64>, subsets: Vec<Subset>) -> Self {
        Self {
            products: products.into_iter().collect(),
            subsets,
        }
    }

    fn validate(&self) -> Result<(), ProblemError> {
        let mut products = BTreeSet::new();
        if let Some(duplicate) = self.products.iter().find(|&&p| !products.insert(p)) {
            return Err(ProblemError::InvalidInstance(format!(
                "product {duplicate} is listed twice"
            )));
        }
        for (index, subset) in self.subsets.iter().enumerate() {
            if let Some(unknown) = subset.elements.iter().find(|&&e| !products.contains(&e)) {
                return Err(ProblemError::InvalidInstance(format!(
                    "subset {index} contains unknown product {unknown}"
                )));
            }
        }
        Ok(())
    }

    fn subset(&self, index: i64) -> Option<&Subset> {
        usize::try_from(index).ok().and_then(|i| self.subsets.get(i))
    }
}

impl ProblemFamily for PartitionInstance {
    type Output = SubsetSelection;

    fn name(&self) -> &'static str {
        "set_partition"
    }

    /// Products no subset covers give a term-less cover row, so the model
    /// is infeasible rather than malformed.
    fn build(&self) -> Result<Model, ProblemError> {
        self.validate()?;
        let indices: Vec<i64> = (0..self.subsets.len() as i64).collect();

        let mut model = Model::new();
        model.declare_index_set("subsets", indices.iter().copied())?;
        model.declare_family("x", &["subsets"])?;
        for &index in &indices {
            model.add_binary(x(index))?;
        }

        exact_cover(&mut model, "product", &self.products, &indices, |product, index| {
            self.subset(index)
                .filter(|subset| subset.contains(product))
                .map(|_| x(index))
        })?;

        model.set_objective(
            self.subsets
                .iter()
                .zip(&indices)
                .map(|(subset, &index)| (x(index), subset.cost)),
            Sense::Minimize,
        )?;
        Ok(model)
    }

    fn project(&self, result: &SolveResult) -> Result<SubsetSelection, ProblemError> {
        ensure_solved(result)?;
        let chosen: Vec<usize> = (0..self.subsets.len())
            .filter(|&index| result.is_selected(&x(index as i64)))
            .collect();

        for &product in &self.products {
            let covering = chosen
                .iter()
                .filter(|&&index| self.subsets[index].contains(product))
                .count();
            if covering != 1 {
                return Err(ProblemError::Validation(format!(
                    "product {product} is covered {covering} times"
                )));
            }
        }

        let cost: f64 = chosen.iter().map(|&index| self.subsets[index].cost).sum();
        Ok(SubsetSelection { chosen, cost })
    }

    fn objective_of(&self, output: &SubsetSelection) -> f64 {
        output
            .chosen
            .iter()
            .filter_map(|&index| self.subsets.get(index))
            .map(|subset| subset.cost)
            .sum()
    }
}
