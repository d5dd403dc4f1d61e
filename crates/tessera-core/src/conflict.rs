//! Symmetric conflict relations between elements.

use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Element → set of adjacent elements.
pub type Adjacency = BTreeMap<i64, BTreeSet<i64>>;

/// Unordered pairs of elements that must not share a bucket.
///
/// Pairs are stored normalized as `(min, max)`, so `(a, b)` and `(b, a)` are
/// the same conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSet {
    pairs: BTreeSet<(i64, i64)>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a conflict set from pairs, rejecting self-conflicts.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, i64)>) -> Result<Self, ModelError> {
        let mut set = Self::new();
        for (a, b) in pairs {
            set.insert(a, b)?;
        }
        Ok(set)
    }

    /// Insert a conflict. Returns `false` when the pair was already present.
    pub fn insert(&mut self, a: i64, b: i64) -> Result<bool, ModelError> {
        if a == b {
            return Err(ModelError::SelfConflict { element: a });
        }
        Ok(self.pairs.insert((a.min(b), a.max(b))))
    }

    pub fn contains(&self, a: i64, b: i64) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Normalized pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.pairs.iter().copied()
    }

    /// Adjacency over `elements` plus every element that appears in a conflict.
    ///
    /// Isolated elements map to an empty neighbour set.
    pub fn adjacency(&self, elements: impl IntoIterator<Item = i64>) -> Adjacency {
        let mut adjacency: Adjacency = elements
            .into_iter()
            .map(|element| (element, BTreeSet::new()))
            .collect();
        for (a, b) in &self.pairs {
            adjacency.entry(*a).or_default().insert(*b);
            adjacency.entry(*b).or_default().insert(*a);
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_are_symmetric() {
        let mut set = ConflictSet::new();
        assert!(set.insert(2, 1).unwrap());
        assert!(!set.insert(1, 2).unwrap());
        assert!(set.contains(1, 2));
        assert!(set.contains(2, 1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn self_conflict_is_rejected() {
        let err = ConflictSet::from_pairs([(1, 2), (3, 3)]).unwrap_err();
        assert_eq!(err, ModelError::SelfConflict { element: 3 });
    }

    #[test]
    fn adjacency_keeps_isolated_elements() {
        let set = ConflictSet::from_pairs([(1, 2)]).unwrap();
        let adjacency = set.adjacency(1..=3);
        assert_eq!(adjacency.len(), 3);
        assert!(adjacency[&3].is_empty());
        assert!(adjacency[&1].contains(&2));
        assert!(adjacency[&2].contains(&1));
    }
}
