//! Composite keys for decision variables and the index sets they range over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Key of a decision variable: family name plus a tuple of domain indices.
///
/// `VarKey::new("x", [3, 1])` renders as `x[3,1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarKey {
    family: String,
    index: Vec<i64>,
}

impl VarKey {
    pub fn new(family: impl Into<String>, index: impl IntoIterator<Item = i64>) -> Self {
        Self {
            family: family.into(),
            index: index.into_iter().collect(),
        }
    }

    /// Key of a variable in a family without dimensions.
    pub fn scalar(family: impl Into<String>) -> Self {
        Self::new(family, [])
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn arity(&self) -> usize {
        self.index.len()
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        if self.index.is_empty() {
            return Ok(());
        }
        write!(f, "[")?;
        for (position, value) in self.index.iter().enumerate() {
            if position > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

/// A named, ordered set of integer members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSet {
    name: String,
    members: BTreeSet<i64>,
}

impl IndexSet {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = i64>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, member: i64) -> bool {
        self.members.contains(&member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.members.iter().copied()
    }
}

/// Render an index tuple the way constraint names embed it: `3,1`.
pub(crate) fn join_indices(indices: &[i64]) -> String {
    indices
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display() {
        assert_eq!(VarKey::new("x", [3, 1]).to_string(), "x[3,1]");
        assert_eq!(VarKey::scalar("z").to_string(), "z");
    }

    #[test]
    fn keys_order_by_family_then_index() {
        let mut keys = vec![
            VarKey::new("y", [0]),
            VarKey::new("x", [2, 0]),
            VarKey::new("x", [1, 5]),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["x[1,5]", "x[2,0]", "y[0]"]);
    }

    #[test]
    fn index_set_deduplicates_and_sorts() {
        let set = IndexSet::new("rooms", [3, 1, 3, 2]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(set.contains(2));
        assert!(!set.contains(7));
    }

    #[test]
    fn key_serializes_to_json() {
        let json = serde_json::to_string(&VarKey::new("x", [1, 2])).unwrap();
        assert_eq!(json, r#"{"family":"x","index":[1,2]}"#);
    }
}
