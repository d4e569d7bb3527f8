//! Degree scores for seed edges.
//!
//! # Intuition
//!
//! When a positive training edge is removed from the message-passing graph,
//! the effect on its endpoints depends on how many other edges they
//! receive. For a node with hundreds of in-edges, dropping one barely moves
//! its aggregated representation; for a node with two, it removes half of
//! the signal.
//!
//! The *degree score* of an edge `u -> v` is
//!
//! ```text
//! score(u -> v) = min(in_degree(u), in_degree(v))
//! ```
//!
//! and an edge is *low-degree* when its score is strictly below a threshold.
//! In-degree counts edges of every type that end at the node.

use crate::ids::{EdgeId, TypedEdgeIds};
use crate::{EdgeType, Graph, Result};

/// Degree score of each edge: the smaller of its endpoints' in-degrees.
///
/// # Example
///
/// ```rust
/// use linkpred_core::algo::degree::degree_scores;
/// use linkpred_core::{EdgeType, Graph};
///
/// // in-degrees: 0 -> 0, 1 -> 1, 2 -> 2
/// let g = Graph::homogeneous(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
/// let scores = degree_scores(&g, &EdgeType::homogeneous(), &[0, 1, 2]).unwrap();
/// assert_eq!(scores, vec![0, 1, 0]);
/// ```
pub fn degree_scores(g: &Graph, edge_type: &EdgeType, eids: &[EdgeId]) -> Result<Vec<usize>> {
    let (src, dst) = g.find_edges(edge_type, eids)?;
    let head = g.in_degrees(&edge_type.src_type, &src);
    let tail = g.in_degrees(&edge_type.dst_type, &dst);
    Ok(head.into_iter().zip(tail).map(|(h, t)| h.min(t)).collect())
}

/// Seed edges whose degree score is strictly below `threshold`.
///
/// Order within each edge type is preserved. Every edge type of `seeds`
/// appears in the result, possibly with no IDs.
pub fn restrict_by_degree(
    g: &Graph,
    seeds: &TypedEdgeIds,
    threshold: usize,
) -> Result<TypedEdgeIds> {
    let mut restricted = TypedEdgeIds::new();
    for (etype, eids) in seeds.iter() {
        let scores = degree_scores(g, etype, eids)?;
        let low: Vec<EdgeId> = eids
            .iter()
            .zip(scores)
            .filter(|&(_, score)| score < threshold)
            .map(|(&eid, _)| eid)
            .collect();
        restricted.insert(etype.clone(), low);
    }
    Ok(restricted)
}
