//! Structural bounds computed before an exact model is sized.
//!
//! The greedy coloring gives a feasible upper bound on the number of buckets
//! (rooms, colors) a conflict graph needs; the greedy clique gives a lower
//! bound. Exact models index their buckets by `0..estimate_bound(..)`.

use crate::conflict::Adjacency;
use std::collections::{BTreeMap, BTreeSet};

/// Greedy coloring in ascending element order.
///
/// Every element receives the smallest non-negative label not already used by
/// one of its neighbours. Neighbours that are not keys of `adjacency` are
/// ignored.
pub fn greedy_coloring(adjacency: &Adjacency) -> BTreeMap<i64, usize> {
    let mut labels: BTreeMap<i64, usize> = BTreeMap::new();
    for (element, neighbours) in adjacency {
        let taken: BTreeSet<usize> = neighbours
            .iter()
            .filter_map(|neighbour| labels.get(neighbour).copied())
            .collect();
        let label = (0..).find(|label| !taken.contains(label)).unwrap_or(0);
        labels.insert(*element, label);
    }

    tracing::trace!(
        component = "bound",
        operation = "greedy_coloring",
        status = "success",
        elements = adjacency.len(),
        "Colored conflict graph"
    );

    labels
}

/// Upper bound on the number of buckets needed so that no two adjacent
/// elements share one: `max(label) + 1` of the greedy coloring, 0 when empty.
pub fn estimate_bound(adjacency: &Adjacency) -> usize {
    let bound = greedy_coloring(adjacency)
        .values()
        .max()
        .map_or(0, |label| label + 1);

    tracing::debug!(
        component = "bound",
        operation = "estimate_bound",
        status = "success",
        elements = adjacency.len(),
        bound,
        "Estimated bucket bound"
    );

    bound
}

/// Size of the largest clique found by growing one clique per element over
/// its neighbours in ascending order. A lower bound on the chromatic number.
pub fn clique_lower_bound(adjacency: &Adjacency) -> usize {
    let mut best = 0;
    for (element, neighbours) in adjacency {
        let mut clique = vec![*element];
        for candidate in neighbours {
            let joins = clique.iter().all(|member| {
                adjacency
                    .get(candidate)
                    .is_some_and(|adjacent| adjacent.contains(member))
            });
            if joins {
                clique.push(*candidate);
            }
        }
        best = best.max(clique.len());
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictSet;
    use proptest::prelude::*;

    fn adjacency(elements: std::ops::RangeInclusive<i64>, pairs: &[(i64, i64)]) -> Adjacency {
        ConflictSet::from_pairs(pairs.iter().copied())
            .unwrap()
            .adjacency(elements)
    }

    #[test]
    fn empty_graph_needs_no_buckets() {
        assert_eq!(estimate_bound(&Adjacency::new()), 0);
        assert_eq!(clique_lower_bound(&Adjacency::new()), 0);
    }

    #[test]
    fn isolated_elements_share_one_bucket() {
        assert_eq!(estimate_bound(&adjacency(1..=4, &[])), 1);
    }

    #[test]
    fn triangle_needs_three() {
        let graph = adjacency(1..=3, &[(1, 2), (2, 3), (1, 3)]);
        assert_eq!(estimate_bound(&graph), 3);
        assert_eq!(clique_lower_bound(&graph), 3);
    }

    #[test]
    fn coloring_follows_ascending_order() {
        // Path 1-2-3-4 colors alternately.
        let graph = adjacency(1..=4, &[(1, 2), (2, 3), (3, 4)]);
        let labels = greedy_coloring(&graph);
        assert_eq!(labels.values().copied().collect::<Vec<_>>(), vec![0, 1, 0, 1]);
        assert_eq!(estimate_bound(&graph), 2);
    }

    #[test]
    fn greedy_can_exceed_clique_bound() {
        // The path 1-3-4-2 is bipartite, but ascending order colors 4 last
        // next to two differently labelled neighbours.
        let graph = adjacency(1..=4, &[(1, 3), (2, 4), (3, 4)]);
        assert_eq!(estimate_bound(&graph), 3);
        assert_eq!(clique_lower_bound(&graph), 2);
    }

    fn arbitrary_graph() -> impl Strategy<Value = (i64, Vec<(i64, i64)>)> {
        (1i64..12).prop_flat_map(|n| {
            let pairs = proptest::collection::vec((1..=n, 1..=n), 0..40)
                .prop_map(|pairs: Vec<(i64, i64)>| {
                    pairs
                        .into_iter()
                        .filter(|(a, b)| a != b)
                        .collect::<Vec<_>>()
                });
            (Just(n), pairs)
        })
    }

    proptest! {
        #[test]
        fn coloring_is_conflict_free((n, pairs) in arbitrary_graph()) {
            let conflicts = ConflictSet::from_pairs(pairs).unwrap();
            let graph = conflicts.adjacency(1..=n);
            let labels = greedy_coloring(&graph);
            let bound = estimate_bound(&graph);

            prop_assert_eq!(labels.len(), n as usize);
            for (a, b) in conflicts.iter() {
                prop_assert_ne!(labels[&a], labels[&b]);
            }
            prop_assert!(labels.values().all(|label| *label < bound));
            prop_assert!(bound >= clique_lower_bound(&graph));
        }
    }
}
