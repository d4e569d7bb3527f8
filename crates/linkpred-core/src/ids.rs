//! Per-type ID collections.
//!
//! Multi-relation graphs key node and edge IDs by type. Single-type graphs
//! use the same representation with one key, so every operation in this
//! crate handles both uniformly.

use crate::hetero::{EdgeType, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Node ID, local to its node type.
pub type NodeId = usize;

/// Edge ID, local to its edge type.
pub type EdgeId = usize;

/// Ordered mapping from a type key to a sequence of IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Ord"
))]
pub struct TypedIds<K: Ord>(#[serde(with = "crate::serde_pairs")] BTreeMap<K, Vec<usize>>);

/// Edge IDs per canonical edge type (seed batches, exclusion sets).
pub type TypedEdgeIds = TypedIds<EdgeType>;

/// Node IDs per node type (seed nodes, induced nodes).
pub type TypedNodeIds = TypedIds<NodeType>;

impl<K: Ord> Default for TypedIds<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Clone> TypedIds<K> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection with a single key.
    pub fn single(key: K, ids: Vec<usize>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key, ids);
        Self(map)
    }

    /// IDs for a key.
    pub fn get(&self, key: &K) -> Option<&[usize]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Replace the IDs for a key.
    pub fn insert(&mut self, key: K, ids: Vec<usize>) {
        self.0.insert(key, ids);
    }

    /// Remove a key, returning its IDs.
    pub fn remove(&mut self, key: &K) -> Option<Vec<usize>> {
        self.0.remove(key)
    }

    /// Append IDs to a key, creating it if needed.
    pub fn extend(&mut self, key: K, ids: impl IntoIterator<Item = usize>) {
        self.0.entry(key).or_default().extend(ids);
    }

    /// Iterate over `(key, ids)`.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[usize])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Keys present, in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.keys()
    }

    /// Total number of IDs across all keys.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// True when no key holds any ID.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Whether `id` is listed under `key`.
    pub fn contains(&self, key: &K, id: usize) -> bool {
        self.0.get(key).is_some_and(|ids| ids.contains(&id))
    }

    /// Remove duplicate IDs within each key, keeping first occurrences.
    pub fn dedup(&mut self) {
        for ids in self.0.values_mut() {
            let mut seen = HashSet::with_capacity(ids.len());
            ids.retain(|id| seen.insert(*id));
        }
    }

    /// Hash sets per key, for repeated membership tests.
    pub fn to_sets(&self) -> BTreeMap<K, HashSet<usize>> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().copied().collect()))
            .collect()
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<K, Vec<usize>> {
        self.0
    }
}

impl<K: Ord> FromIterator<(K, Vec<usize>)> for TypedIds<K> {
    fn from_iter<I: IntoIterator<Item = (K, Vec<usize>)>>(iter: I) -> Self {
        let mut map: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for (k, ids) in iter {
            map.entry(k).or_default().extend(ids);
        }
        Self(map)
    }
}
