//! Inference graphs free of validation/test leakage.
//!
//! Link-prediction benchmarks hold out node pairs for validation and test.
//! If the graph used for message passing at inference still contains those
//! edges, the model can read the answer off its input. [`LeakageFilter`]
//! returns a copy of the graph with every held-out pair removed in both
//! directions; [`leakage_report`] measures how much of a split a graph
//! still contains.
//!
//! # Example
//!
//! ```rust
//! use linkpred_core::split::{build_inference_graph, leakage_report};
//! use linkpred_core::{EdgeType, Graph};
//!
//! let g = Graph::homogeneous(4, [(0, 1), (1, 0), (1, 2), (2, 3)]).unwrap();
//! let valid = [(2, 3)];
//! let test = [(0, 1)];
//!
//! let inference = build_inference_graph(&g, &valid, &test, false).unwrap();
//! let etype = EdgeType::homogeneous();
//! assert!(!inference.has_edge_between(&etype, 0, 1));
//! assert!(!inference.has_edge_between(&etype, 1, 0));
//! assert!(!inference.has_edge_between(&etype, 2, 3));
//! assert!(inference.has_edge_between(&etype, 1, 2));
//! assert_eq!(g.num_edges(&etype), 4); // input untouched
//! ```

use crate::ids::{EdgeId, NodeId};
use crate::{EdgeType, Graph, Result, SamplerConfig};
use serde::{Deserialize, Serialize};

/// A `(source, destination)` node pair.
pub type NodePair = (NodeId, NodeId);

/// Node pairs reserved for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSplit {
    /// Validation pairs.
    pub valid: Vec<NodePair>,
    /// Test pairs.
    pub test: Vec<NodePair>,
}

impl EdgeSplit {
    pub fn new(valid: Vec<NodePair>, test: Vec<NodePair>) -> Self {
        Self { valid, test }
    }
}

/// How much of a split a graph contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakageReport {
    /// Validation pairs with an edge in either direction.
    pub valid_present: usize,
    /// Number of validation pairs.
    pub valid_total: usize,
    /// Test pairs with an edge in either direction.
    pub test_present: usize,
    /// Number of test pairs.
    pub test_total: usize,
}

impl LeakageReport {
    /// Fraction of validation pairs present (0 for an empty split).
    pub fn valid_ratio(&self) -> f64 {
        ratio(self.valid_present, self.valid_total)
    }

    /// Fraction of test pairs present (0 for an empty split).
    pub fn test_ratio(&self) -> f64 {
        ratio(self.test_present, self.test_total)
    }

    /// No test pair is reachable through the graph.
    pub fn is_clean(&self) -> bool {
        self.test_present == 0
    }
}

fn ratio(present: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        present as f64 / total as f64
    }
}

/// Whether `u -> v` or `v -> u` exists.
fn connected(g: &Graph, edge_type: &EdgeType, (u, v): NodePair) -> bool {
    g.has_edge_between(edge_type, u, v) || g.has_edge_between(edge_type, v, u)
}

/// Count split pairs present in `g` (either direction) for one edge type.
pub fn leakage_report(g: &Graph, edge_type: &EdgeType, split: &EdgeSplit) -> LeakageReport {
    let count = |pairs: &[NodePair]| pairs.iter().filter(|&&p| connected(g, edge_type, p)).count();
    LeakageReport {
        valid_present: count(&split.valid),
        valid_total: split.valid.len(),
        test_present: count(&split.test),
        test_total: split.test.len(),
    }
}

/// Removes held-out pairs from a copy of a graph.
#[derive(Debug, Clone, Default)]
pub struct LeakageFilter {
    edge_type: Option<EdgeType>,
    valid_as_input: bool,
}

impl LeakageFilter {
    /// Filter over the graph's only edge type, removing validation edges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `valid_as_input` from a config.
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new().with_valid_as_input(config.valid_as_input)
    }

    /// Filter a specific edge type of a heterogeneous graph.
    pub fn with_edge_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = Some(edge_type);
        self
    }

    /// Keep validation edges as message-passing input.
    ///
    /// Validation pairs without an edge are not added; they are only
    /// counted and reported in a warning.
    pub fn with_valid_as_input(mut self, valid_as_input: bool) -> Self {
        self.valid_as_input = valid_as_input;
        self
    }

    /// Copy `g` and remove every test pair, and unless validation edges are
    /// kept as input every validation pair, in both directions.
    ///
    /// Pairs without an edge are skipped. `g` is not modified; the copy
    /// costs O(nodes + edges).
    ///
    /// # Errors
    /// `NodeOutOfRange` if a pair names a node outside the graph, and edge
    /// type errors if the graph does not have exactly the configured type.
    pub fn apply(&self, g: &Graph, split: &EdgeSplit) -> Result<Graph> {
        let edge_type = match &self.edge_type {
            Some(etype) => g.to_canonical_etype(&etype.into())?,
            None => g.default_etype()?.clone(),
        };

        let before = leakage_report(g, &edge_type, split);
        log::debug!(
            "before filtering: {:.4} of validation and {:.4} of test pairs present",
            before.valid_ratio(),
            before.test_ratio()
        );

        let mut marked: Vec<EdgeId> = Vec::new();
        if self.valid_as_input {
            for &pair in &split.valid {
                check_pair(g, &edge_type, pair)?;
            }
            let missing = before.valid_total - before.valid_present;
            if missing > 0 {
                log::warn!(
                    "{} validation pairs have no edge and are not added to the inference graph",
                    missing
                );
            }
        } else {
            mark_pairs(g, &edge_type, &split.valid, &mut marked)?;
        }
        mark_pairs(g, &edge_type, &split.test, &mut marked)?;

        let mut inference = g.clone();
        let removed = inference.remove_edges(&edge_type, &marked)?;

        log::info!(
            "inference graph: removed {} of {} edges of type {}",
            removed,
            g.num_edges(&edge_type),
            edge_type
        );
        Ok(inference)
    }
}

fn check_pair(g: &Graph, edge_type: &EdgeType, (u, v): NodePair) -> Result<()> {
    g.check_node(&edge_type.src_type, u)?;
    g.check_node(&edge_type.dst_type, v)
}

fn mark_pairs(
    g: &Graph,
    edge_type: &EdgeType,
    pairs: &[NodePair],
    marked: &mut Vec<EdgeId>,
) -> Result<()> {
    for &(u, v) in pairs {
        check_pair(g, edge_type, (u, v))?;
        marked.extend(g.edge_ids(edge_type, u, v));
        marked.extend(g.edge_ids(edge_type, v, u));
    }
    Ok(())
}

/// Inference graph for a single-type graph.
///
/// Shorthand for [`LeakageFilter`] with `valid_as_input` set.
pub fn build_inference_graph(
    g: &Graph,
    valid_edges: &[NodePair],
    test_edges: &[NodePair],
    valid_as_input: bool,
) -> Result<Graph> {
    let split = EdgeSplit::new(valid_edges.to_vec(), test_edges.to_vec());
    LeakageFilter::new()
        .with_valid_as_input(valid_as_input)
        .apply(g, &split)
}
