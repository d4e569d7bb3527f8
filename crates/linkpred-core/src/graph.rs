//! Directed multigraph with integer node and edge IDs.
//!
//! Nodes are counted per [`NodeType`]; edges live in one COO [`EdgeStore`]
//! per canonical [`EdgeType`]. Edge IDs are contiguous within their type
//! (`0..num_edges(etype)`), and parallel edges are allowed.
//!
//! # Example
//!
//! ```rust
//! use linkpred_core::{EdgeType, Graph};
//!
//! let g = Graph::homogeneous(4, [(0, 1), (1, 2), (2, 3), (0, 1)]).unwrap();
//! let etype = EdgeType::homogeneous();
//!
//! assert_eq!(g.num_edges(&etype), 4);
//! assert_eq!(g.edge_ids(&etype, 0, 1), vec![0, 3]);
//! assert_eq!(g.in_degree(&etype.dst_type, 1), 2);
//! ```

use crate::hetero::{EdgeKey, EdgeType, NodeType};
use crate::ids::{EdgeId, NodeId, TypedEdgeIds, TypedNodeIds};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

/// Where a graph's (and derived results') data is placed.
///
/// Storage in this crate is always host memory; the tag travels with
/// graphs and exclusion sets so callers moving data to an accelerator
/// know where results are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Cpu,
    Accelerator(u32),
}

/// Plain COO form used for (de)serialization.
#[derive(Clone, Serialize, Deserialize)]
struct CooEdges {
    src: Vec<NodeId>,
    dst: Vec<NodeId>,
}

/// Edge storage for one edge type (COO format).
///
/// Keeps a `(src, dst) -> edge IDs` index for pair lookups and a
/// `dst -> edge IDs` index for in-degree and in-edge queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CooEdges", into = "CooEdges")]
pub struct EdgeStore {
    src: Vec<NodeId>,
    dst: Vec<NodeId>,
    pair_index: HashMap<(NodeId, NodeId), SmallVec<[EdgeId; 1]>>,
    in_index: HashMap<NodeId, Vec<EdgeId>>,
}

impl From<CooEdges> for EdgeStore {
    fn from(coo: CooEdges) -> Self {
        Self::from_edges(coo.src, coo.dst)
    }
}

impl From<EdgeStore> for CooEdges {
    fn from(store: EdgeStore) -> Self {
        Self {
            src: store.src,
            dst: store.dst,
        }
    }
}

impl PartialEq for EdgeStore {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.dst == other.dst
    }
}

impl EdgeStore {
    /// Create an empty edge store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from edge index vectors.
    pub fn from_edges(src: Vec<NodeId>, dst: Vec<NodeId>) -> Self {
        debug_assert_eq!(src.len(), dst.len());
        let mut store = Self {
            src,
            dst,
            pair_index: HashMap::new(),
            in_index: HashMap::new(),
        };
        store.rebuild_index();
        store
    }

    fn rebuild_index(&mut self) {
        self.pair_index.clear();
        self.in_index.clear();
        for (eid, (&u, &v)) in self.src.iter().zip(self.dst.iter()).enumerate() {
            self.pair_index.entry((u, v)).or_default().push(eid);
            self.in_index.entry(v).or_default().push(eid);
        }
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// Add an edge, returning its ID.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) -> EdgeId {
        let eid = self.src.len();
        self.src.push(src);
        self.dst.push(dst);
        self.pair_index.entry((src, dst)).or_default().push(eid);
        self.in_index.entry(dst).or_default().push(eid);
        eid
    }

    /// Iterate over (src, dst) pairs in edge ID order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    /// Endpoints of an edge.
    pub fn endpoints(&self, eid: EdgeId) -> Option<(NodeId, NodeId)> {
        Some((*self.src.get(eid)?, *self.dst.get(eid)?))
    }

    /// IDs of all edges `src -> dst`.
    pub fn edge_ids(&self, src: NodeId, dst: NodeId) -> &[EdgeId] {
        self.pair_index
            .get(&(src, dst))
            .map_or(&[][..], |ids| ids.as_slice())
    }

    /// IDs of all edges ending at `dst`.
    pub fn in_edges(&self, dst: NodeId) -> &[EdgeId] {
        self.in_index.get(&dst).map_or(&[][..], Vec::as_slice)
    }

    /// Keep edges for which `keep(eid)` holds, renumbering survivors in order.
    fn retain(&mut self, mut keep: impl FnMut(EdgeId) -> bool) {
        let kept: Vec<EdgeId> = (0..self.num_edges()).filter(|&e| keep(e)).collect();
        self.src = kept.iter().map(|&e| self.src[e]).collect();
        self.dst = kept.iter().map(|&e| self.dst[e]).collect();
        self.rebuild_index();
    }
}

/// A directed multigraph, possibly heterogeneous.
///
/// `Clone` is a full deep copy, O(nodes + edges). The leakage filter
/// clones once before training; nothing on the per-batch path does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Node count per type.
    num_nodes: BTreeMap<NodeType, usize>,
    /// Edges by type.
    #[serde(with = "crate::serde_pairs")]
    edge_stores: BTreeMap<EdgeType, EdgeStore>,
    /// Original node IDs, set by compaction.
    induced_nodes: Option<TypedNodeIds>,
    /// Original edge IDs, set by edge subgraphs and edge removal.
    induced_edges: Option<TypedEdgeIds>,
    #[serde(default)]
    device: Device,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-type graph with `num_nodes` nodes.
    pub fn homogeneous(
        num_nodes: usize,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self> {
        let etype = EdgeType::homogeneous();
        let mut g = Self::new();
        g.add_nodes(etype.src_type.clone(), num_nodes);
        g.add_edge_type(&etype);
        g.add_edges(&etype, edges)?;
        Ok(g)
    }

    /// Same node counts, edge types and device, with no edges.
    pub fn empty_like(&self) -> Self {
        Self {
            num_nodes: self.num_nodes.clone(),
            edge_stores: self
                .edge_stores
                .keys()
                .map(|etype| (etype.clone(), EdgeStore::new()))
                .collect(),
            induced_nodes: None,
            induced_edges: None,
            device: self.device,
        }
    }

    /// Add `n` nodes of a type, returning the first new ID.
    pub fn add_nodes(&mut self, node_type: impl Into<NodeType>, n: usize) -> NodeId {
        let count = self.num_nodes.entry(node_type.into()).or_insert(0);
        let first = *count;
        *count += n;
        first
    }

    /// Register an edge type (and its node types) with no edges.
    pub fn add_edge_type(&mut self, edge_type: &EdgeType) {
        self.num_nodes.entry(edge_type.src_type.clone()).or_insert(0);
        self.num_nodes.entry(edge_type.dst_type.clone()).or_insert(0);
        self.edge_stores.entry(edge_type.clone()).or_default();
    }

    /// Add an edge of the given type. Both endpoints must already exist.
    ///
    /// A new edge has no parent, so the type's entry in
    /// [`Self::induced_edges`] is dropped.
    pub fn add_edge(&mut self, edge_type: &EdgeType, src: NodeId, dst: NodeId) -> Result<EdgeId> {
        self.check_node(&edge_type.src_type, src)?;
        self.check_node(&edge_type.dst_type, dst)?;
        if let Some(induced) = self.induced_edges.as_mut() {
            induced.remove(edge_type);
            if induced.keys().next().is_none() {
                self.induced_edges = None;
            }
        }
        Ok(self
            .edge_stores
            .entry(edge_type.clone())
            .or_default()
            .add_edge(src, dst))
    }

    /// Add several edges of one type.
    pub fn add_edges(
        &mut self,
        edge_type: &EdgeType,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Vec<EdgeId>> {
        edges
            .into_iter()
            .map(|(u, v)| self.add_edge(edge_type, u, v))
            .collect()
    }

    /// Number of nodes of a type (0 if unknown).
    pub fn num_nodes(&self, node_type: &NodeType) -> usize {
        self.num_nodes.get(node_type).copied().unwrap_or(0)
    }

    /// Number of edges of a type (0 if unknown).
    pub fn num_edges(&self, edge_type: &EdgeType) -> usize {
        self.edge_stores.get(edge_type).map_or(0, EdgeStore::num_edges)
    }

    /// Total number of edges across all types.
    pub fn total_edges(&self) -> usize {
        self.edge_stores.values().map(EdgeStore::num_edges).sum()
    }

    /// All node types, in order.
    pub fn node_types(&self) -> impl Iterator<Item = &NodeType> {
        self.num_nodes.keys()
    }

    /// All edge types, in order.
    pub fn edge_types(&self) -> impl Iterator<Item = &EdgeType> {
        self.edge_stores.keys()
    }

    /// Edge store for a type.
    pub fn edge_store(&self, edge_type: &EdgeType) -> Option<&EdgeStore> {
        self.edge_stores.get(edge_type)
    }

    fn store(&self, edge_type: &EdgeType) -> Result<&EdgeStore> {
        self.edge_stores
            .get(edge_type)
            .ok_or_else(|| Error::UnknownEdgeType(edge_type.to_string()))
    }

    pub(crate) fn check_node(&self, node_type: &NodeType, node: NodeId) -> Result<()> {
        let num_nodes = self
            .num_nodes
            .get(node_type)
            .copied()
            .ok_or_else(|| Error::UnknownNodeType(node_type.to_string()))?;
        if node >= num_nodes {
            return Err(Error::NodeOutOfRange {
                node_type: node_type.to_string(),
                node,
                num_nodes,
            });
        }
        Ok(())
    }

    /// The graph's only edge type.
    ///
    /// Fails when the graph has no edge types or more than one.
    pub fn default_etype(&self) -> Result<&EdgeType> {
        let mut types = self.edge_stores.keys();
        match (types.next(), types.next()) {
            (Some(etype), None) => Ok(etype),
            (None, _) => Err(Error::UnknownEdgeType("graph has no edge types".into())),
            (Some(_), Some(_)) => Err(Error::AmbiguousEdgeType(format!(
                "graph has {} edge types, specify one",
                self.edge_stores.len()
            ))),
        }
    }

    /// Resolve an edge key to its canonical edge type.
    pub fn to_canonical_etype(&self, key: &EdgeKey) -> Result<EdgeType> {
        match key {
            EdgeKey::Canonical(etype) => {
                self.store(etype)?;
                Ok(etype.clone())
            }
            EdgeKey::Relation(relation) => {
                let mut matches = self.edge_stores.keys().filter(|t| &t.relation == relation);
                match (matches.next(), matches.next()) {
                    (Some(etype), None) => Ok(etype.clone()),
                    (None, _) => Err(Error::UnknownEdgeType(relation.clone())),
                    (Some(_), Some(_)) => Err(Error::AmbiguousEdgeType(relation.clone())),
                }
            }
        }
    }

    /// Whether at least one edge `src -> dst` of the type exists.
    pub fn has_edge_between(&self, edge_type: &EdgeType, src: NodeId, dst: NodeId) -> bool {
        self.edge_stores
            .get(edge_type)
            .is_some_and(|store| !store.edge_ids(src, dst).is_empty())
    }

    /// [`Self::has_edge_between`] for each pair.
    pub fn has_edges_between(&self, edge_type: &EdgeType, pairs: &[(NodeId, NodeId)]) -> Vec<bool> {
        pairs
            .iter()
            .map(|&(u, v)| self.has_edge_between(edge_type, u, v))
            .collect()
    }

    /// IDs of all edges `src -> dst` of the type (empty if none).
    pub fn edge_ids(&self, edge_type: &EdgeType, src: NodeId, dst: NodeId) -> Vec<EdgeId> {
        self.edge_stores
            .get(edge_type)
            .map(|store| store.edge_ids(src, dst).to_vec())
            .unwrap_or_default()
    }

    /// Endpoints of the given edges, as parallel source and destination vectors.
    pub fn find_edges(
        &self,
        edge_type: &EdgeType,
        eids: &[EdgeId],
    ) -> Result<(Vec<NodeId>, Vec<NodeId>)> {
        let store = self.store(edge_type)?;
        let mut src = Vec::with_capacity(eids.len());
        let mut dst = Vec::with_capacity(eids.len());
        for &eid in eids {
            let (u, v) = store.endpoints(eid).ok_or_else(|| Error::EdgeOutOfRange {
                edge_type: edge_type.to_string(),
                edge: eid,
                num_edges: store.num_edges(),
            })?;
            src.push(u);
            dst.push(v);
        }
        Ok((src, dst))
    }

    /// IDs of the edges of one type that end at `dst`.
    pub fn in_edges(&self, edge_type: &EdgeType, dst: NodeId) -> &[EdgeId] {
        self.edge_stores
            .get(edge_type)
            .map_or(&[][..], |store| store.in_edges(dst))
    }

    /// Number of edges, of any type, whose destination is `(node_type, node)`.
    pub fn in_degree(&self, node_type: &NodeType, node: NodeId) -> usize {
        self.edge_stores
            .iter()
            .filter(|(etype, _)| &etype.dst_type == node_type)
            .map(|(_, store)| store.in_edges(node).len())
            .sum()
    }

    /// [`Self::in_degree`] for each node.
    pub fn in_degrees(&self, node_type: &NodeType, nodes: &[NodeId]) -> Vec<usize> {
        nodes.iter().map(|&v| self.in_degree(node_type, v)).collect()
    }

    /// Remove a batch of edges of one type.
    ///
    /// Duplicate IDs are removed once. Surviving edges are renumbered in
    /// order, and their previous IDs are recorded in [`Self::induced_edges`].
    /// Fails without modifying the graph if any ID is out of range.
    /// Returns the number of edges removed.
    pub fn remove_edges(&mut self, edge_type: &EdgeType, eids: &[EdgeId]) -> Result<usize> {
        let num_edges = self.store(edge_type)?.num_edges();
        let mut removed = vec![false; num_edges];
        for &eid in eids {
            let slot = removed.get_mut(eid).ok_or_else(|| Error::EdgeOutOfRange {
                edge_type: edge_type.to_string(),
                edge: eid,
                num_edges,
            })?;
            *slot = true;
        }
        let count = removed.iter().filter(|&&r| r).count();
        if count == 0 {
            return Ok(0);
        }

        let kept: Vec<EdgeId> = (0..num_edges).filter(|&e| !removed[e]).collect();
        let parents = match self.induced_edges.as_ref().and_then(|m| m.get(edge_type)) {
            Some(previous) => kept
                .iter()
                .map(|&e| {
                    previous.get(e).copied().ok_or_else(|| Error::MissingParentEdge {
                        edge_type: edge_type.to_string(),
                        edge: e,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => kept,
        };

        let Some(store) = self.edge_stores.get_mut(edge_type) else {
            return Err(Error::UnknownEdgeType(edge_type.to_string()));
        };
        store.retain(|eid| !removed[eid]);
        self.induced_edges
            .get_or_insert_with(TypedEdgeIds::new)
            .insert(edge_type.clone(), parents);
        Ok(count)
    }

    /// Subgraph on exactly the given edges, keeping node IDs unchanged.
    ///
    /// All node and edge types of `self` are kept. Edge `i` of a type in the
    /// result is the `i`-th listed edge; [`Self::induced_edges`] holds the
    /// listed IDs.
    pub fn edge_subgraph(&self, eids: &TypedEdgeIds) -> Result<Self> {
        let mut sub = self.empty_like();
        for (etype, ids) in eids.iter() {
            let (src, dst) = self.find_edges(etype, ids)?;
            sub.edge_stores
                .insert(etype.clone(), EdgeStore::from_edges(src, dst));
        }
        let mut induced = TypedEdgeIds::new();
        for etype in self.edge_stores.keys() {
            induced.insert(etype.clone(), eids.get(etype).unwrap_or_default().to_vec());
        }
        sub.induced_edges = Some(induced);
        Ok(sub)
    }

    /// Original node IDs per type, if this graph was produced by compaction.
    pub fn induced_nodes(&self) -> Option<&TypedNodeIds> {
        self.induced_nodes.as_ref()
    }

    /// Original edge IDs per type, if this graph was derived from another.
    ///
    /// Edge types absent from the map have no recorded parents: either they
    /// were never derived, or edges were added after the last derivation.
    pub fn induced_edges(&self) -> Option<&TypedEdgeIds> {
        self.induced_edges.as_ref()
    }

    pub(crate) fn set_induced_nodes(&mut self, nodes: Option<TypedNodeIds>) {
        self.induced_nodes = nodes;
    }

    pub(crate) fn set_induced_edges(&mut self, edges: Option<TypedEdgeIds>) {
        self.induced_edges = edges;
    }

    pub(crate) fn from_parts(
        num_nodes: BTreeMap<NodeType, usize>,
        edge_stores: BTreeMap<EdgeType, EdgeStore>,
        device: Device,
    ) -> Self {
        Self {
            num_nodes,
            edge_stores,
            induced_nodes: None,
            induced_edges: None,
            device,
        }
    }

    /// Data placement tag.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Same graph tagged with another placement.
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        Graph::homogeneous(4, [(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn test_homogeneous_basic() {
        let g = path_graph();
        let etype = EdgeType::homogeneous();

        assert_eq!(g.num_nodes(&NodeType::default()), 4);
        assert_eq!(g.num_edges(&etype), 3);
        assert_eq!(g.default_etype().unwrap(), &etype);
        assert!(g.has_edge_between(&etype, 1, 2));
        assert!(!g.has_edge_between(&etype, 2, 1));
    }

    #[test]
    fn test_add_edge_rejects_missing_node() {
        let mut g = path_graph();
        let err = g.add_edge(&EdgeType::homogeneous(), 0, 9).unwrap_err();
        assert!(matches!(err, Error::NodeOutOfRange { node: 9, .. }));
    }

    #[test]
    fn test_parallel_edges_and_in_degree() {
        let g = Graph::homogeneous(3, [(0, 1), (2, 1), (0, 1)]).unwrap();
        let etype = EdgeType::homogeneous();

        assert_eq!(g.edge_ids(&etype, 0, 1), vec![0, 2]);
        assert_eq!(g.in_degrees(&NodeType::default(), &[0, 1, 2]), vec![0, 3, 0]);
    }

    #[test]
    fn test_in_degree_sums_edge_types() {
        let mut g = Graph::new();
        g.add_nodes("user", 2);
        g.add_nodes("item", 1);
        let follows = EdgeType::new("user", "follows", "user");
        let rev_buys = EdgeType::new("item", "rev_buys", "user");
        g.add_edge(&follows, 0, 1).unwrap();
        g.add_edge(&rev_buys, 0, 1).unwrap();

        assert_eq!(g.in_degree(&NodeType::new("user"), 1), 2);
        assert_eq!(g.in_degree(&NodeType::new("item"), 0), 0);
    }

    #[test]
    fn test_find_edges_out_of_range() {
        let g = path_graph();
        let etype = EdgeType::homogeneous();

        let (src, dst) = g.find_edges(&etype, &[2, 0]).unwrap();
        assert_eq!(src, vec![2, 0]);
        assert_eq!(dst, vec![3, 1]);

        let err = g.find_edges(&etype, &[3]).unwrap_err();
        assert!(matches!(err, Error::EdgeOutOfRange { edge: 3, num_edges: 3, .. }));
    }

    #[test]
    fn test_remove_edges_renumbers_and_records_parents() {
        let mut g = path_graph();
        let etype = EdgeType::homogeneous();

        let removed = g.remove_edges(&etype, &[1, 1]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(g.num_edges(&etype), 2);
        assert!(!g.has_edge_between(&etype, 1, 2));
        assert_eq!(g.edge_ids(&etype, 2, 3), vec![1]);
        assert_eq!(g.induced_edges().unwrap().get(&etype), Some(&[0, 2][..]));

        // Second removal composes with the first mapping
        g.remove_edges(&etype, &[0]).unwrap();
        assert_eq!(g.induced_edges().unwrap().get(&etype), Some(&[2][..]));
    }

    #[test]
    fn test_add_after_removal_drops_parent_mapping() {
        let mut g = Graph::homogeneous(3, [(0, 1), (1, 2)]).unwrap();
        let etype = EdgeType::homogeneous();

        g.remove_edges(&etype, &[0]).unwrap();
        assert_eq!(g.induced_edges().unwrap().get(&etype), Some(&[1][..]));

        // New edge has no parent; the next removal must not read past the mapping
        g.add_edge(&etype, 2, 0).unwrap();
        assert!(g.induced_edges().is_none());

        assert_eq!(g.remove_edges(&etype, &[0]).unwrap(), 1);
        assert!(g.has_edge_between(&etype, 2, 0));
        assert!(!g.has_edge_between(&etype, 1, 2));
        assert_eq!(g.induced_edges().unwrap().get(&etype), Some(&[1][..]));
    }

    #[test]
    fn test_add_to_other_type_keeps_mapping() {
        let a = EdgeType::new("n", "a", "n");
        let b = EdgeType::new("n", "b", "n");
        let mut g = Graph::new();
        g.add_nodes("n", 3);
        g.add_edges(&a, [(0, 1), (1, 2)]).unwrap();
        g.add_edge_type(&b);

        let mut sub = g.edge_subgraph(&TypedEdgeIds::single(a.clone(), vec![1])).unwrap();
        sub.add_edge(&b, 0, 2).unwrap();

        let induced = sub.induced_edges().unwrap();
        assert_eq!(induced.get(&a), Some(&[1][..]));
        assert_eq!(induced.get(&b), None);
        assert_eq!(sub.remove_edges(&b, &[0]).unwrap(), 1);
    }

    #[test]
    fn test_remove_edges_out_of_range_leaves_graph() {
        let mut g = path_graph();
        let before = g.clone();

        assert!(g.remove_edges(&EdgeType::homogeneous(), &[0, 7]).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn test_canonical_etype_resolution() {
        let mut g = Graph::new();
        g.add_nodes("user", 1);
        g.add_nodes("item", 1);
        g.add_edge_type(&EdgeType::new("user", "buys", "item"));
        g.add_edge_type(&EdgeType::new("item", "rev_buys", "user"));
        g.add_edge_type(&EdgeType::new("user", "likes", "item"));
        g.add_edge_type(&EdgeType::new("item", "likes", "item"));

        let buys = g.to_canonical_etype(&EdgeKey::from("buys")).unwrap();
        assert_eq!(buys, EdgeType::new("user", "buys", "item"));

        assert!(matches!(
            g.to_canonical_etype(&EdgeKey::from("likes")),
            Err(Error::AmbiguousEdgeType(_))
        ));
        assert!(matches!(
            g.to_canonical_etype(&EdgeKey::from("sells")),
            Err(Error::UnknownEdgeType(_))
        ));
        assert!(matches!(g.default_etype(), Err(Error::AmbiguousEdgeType(_))));
    }

    #[test]
    fn test_edge_subgraph_keeps_nodes() {
        let g = path_graph();
        let etype = EdgeType::homogeneous();

        let sub = g
            .edge_subgraph(&TypedEdgeIds::single(etype.clone(), vec![2, 0]))
            .unwrap();
        assert_eq!(sub.num_nodes(&NodeType::default()), 4);
        assert_eq!(sub.num_edges(&etype), 2);
        assert!(sub.has_edge_between(&etype, 2, 3));
        assert!(!sub.has_edge_between(&etype, 1, 2));
        assert_eq!(sub.induced_edges().unwrap().get(&etype), Some(&[2, 0][..]));
    }

    #[test]
    fn test_json_roundtrip_rebuilds_index() {
        let g = path_graph().to_device(Device::Accelerator(1));
        let json = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();

        assert_eq!(back, g);
        assert_eq!(back.device(), Device::Accelerator(1));
        assert_eq!(back.edge_ids(&EdgeType::homogeneous(), 1, 2), vec![1]);
    }
}
