//! Which edges to hide from message passing for a training batch.
//!
//! Link-prediction training samples a batch of positive (seed) edges and
//! asks the model to score them from a neighborhood that must not contain
//! those same edges, or the answer leaks into the input.
//!
//! [`ExcludeMode`] picks the rule; [`find_exclude_eids`] applies it only to
//! seed edges whose [degree score](super::degree) is below a threshold, so
//! edges between well-connected nodes stay in the message-passing graph.
//!
//! | Mode | Excluded |
//! |------|----------|
//! | `None` | nothing |
//! | `SelfEdges` | the seed edges |
//! | `ReverseById` | seed edges + their reverse IDs in the same edge type |
//! | `ReverseByType` | seed edges + the same IDs in the reverse edge type |
//! | `Custom` | whatever the function returns |

use super::degree::restrict_by_degree;
use crate::ids::{EdgeId, TypedEdgeIds};
use crate::{Device, EdgeType, Error, Graph, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// User-supplied exclusion rule: maps candidate edges to edges to exclude.
pub type ExcludeFn = dyn Fn(&TypedEdgeIds) -> TypedEdgeIds + Send + Sync;

/// Exclusion rule applied to the low-degree seed edges of a batch.
#[derive(Clone, Default)]
pub enum ExcludeMode {
    /// Exclude nothing.
    #[default]
    None,
    /// Exclude the seed edges themselves.
    SelfEdges,
    /// Exclude seed edges and their reverses of the same edge type.
    ///
    /// `map[etype][e]` is the ID of the reverse of edge `e`.
    ReverseById(BTreeMap<EdgeType, Vec<EdgeId>>),
    /// Exclude seed edges and the edges with the same ID in the reverse type.
    ReverseByType(BTreeMap<EdgeType, EdgeType>),
    /// Exclude whatever the function returns for the candidate edges.
    Custom(Arc<ExcludeFn>),
}

impl fmt::Debug for ExcludeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::SelfEdges => write!(f, "SelfEdges"),
            Self::ReverseById(map) => f.debug_tuple("ReverseById").field(map).finish(),
            Self::ReverseByType(map) => f.debug_tuple("ReverseByType").field(map).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl ExcludeMode {
    /// Wrap a closure as a custom rule.
    pub fn custom(f: impl Fn(&TypedEdgeIds) -> TypedEdgeIds + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Reverse-by-ID rule for one edge type.
    pub fn reverse_by_id(edge_type: EdgeType, reverse_eids: Vec<EdgeId>) -> Self {
        Self::ReverseById([(edge_type, reverse_eids)].into_iter().collect())
    }

    /// Reverse-by-ID rule for an undirected graph stored as `E` forward edges
    /// followed by their `E` reverses, so edge `i` and `i + E` are mates.
    pub fn reverse_halves(edge_type: EdgeType, num_edges: usize) -> Self {
        let half = num_edges / 2;
        let reverse = (half..num_edges).chain(0..half).collect();
        Self::reverse_by_id(edge_type, reverse)
    }

    /// Reverse-by-type rule that pairs every edge type with
    /// [`EdgeType::reverse`] in both directions.
    pub fn reverse_types<'a>(edge_types: impl IntoIterator<Item = &'a EdgeType>) -> Self {
        let mut map = BTreeMap::new();
        for etype in edge_types {
            map.insert(etype.clone(), etype.reverse());
            map.insert(etype.reverse(), etype.clone());
        }
        Self::ReverseByType(map)
    }
}

/// Edge IDs excluded from message passing for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeSet {
    /// Excluded IDs per edge type, without duplicates.
    pub eids: TypedEdgeIds,
    /// Placement of the IDs.
    pub device: Device,
}

impl ExcludeSet {
    /// Whether edge `eid` of `edge_type` is excluded.
    pub fn contains(&self, edge_type: &EdgeType, eid: EdgeId) -> bool {
        self.eids.contains(edge_type, eid)
    }

    /// Total number of excluded IDs.
    pub fn len(&self) -> usize {
        self.eids.len()
    }

    /// True when nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.eids.is_empty()
    }
}

/// Apply an exclusion rule to candidate edges.
///
/// Returns `None` for [`ExcludeMode::None`]. Reverse modes fail when a
/// candidate's edge type has no mapping, or a mapped ID does not exist.
pub fn resolve_exclusion(
    g: &Graph,
    mode: &ExcludeMode,
    candidates: &TypedEdgeIds,
) -> Result<Option<TypedEdgeIds>> {
    let mut excluded = match mode {
        ExcludeMode::None => return Ok(None),
        ExcludeMode::SelfEdges => candidates.clone(),
        ExcludeMode::Custom(f) => f(candidates),
        ExcludeMode::ReverseById(map) => {
            let mut out = candidates.clone();
            for (etype, eids) in candidates.iter() {
                if eids.is_empty() {
                    continue;
                }
                let reverse = map
                    .get(etype)
                    .ok_or_else(|| Error::MissingReverseMapping(etype.to_string()))?;
                let num_edges = g.num_edges(etype);
                let mut mates = Vec::with_capacity(eids.len());
                for &eid in eids {
                    let mate = reverse
                        .get(eid)
                        .copied()
                        .filter(|&m| m < num_edges)
                        .ok_or_else(|| Error::EdgeOutOfRange {
                            edge_type: etype.to_string(),
                            edge: reverse.get(eid).copied().unwrap_or(eid),
                            num_edges,
                        })?;
                    mates.push(mate);
                }
                out.extend(etype.clone(), mates);
            }
            out
        }
        ExcludeMode::ReverseByType(map) => {
            let mut out = candidates.clone();
            for (etype, eids) in candidates.iter() {
                if eids.is_empty() {
                    continue;
                }
                let reverse = map
                    .get(etype)
                    .ok_or_else(|| Error::MissingReverseMapping(etype.to_string()))?;
                let num_edges = g.num_edges(reverse);
                if let Some(&bad) = eids.iter().find(|&&e| e >= num_edges) {
                    return Err(Error::EdgeOutOfRange {
                        edge_type: reverse.to_string(),
                        edge: bad,
                        num_edges,
                    });
                }
                out.extend(reverse.clone(), eids.iter().copied());
            }
            out
        }
    };
    excluded.dedup();
    Ok(Some(excluded))
}

/// Edges to exclude from message passing for a batch of seed edges.
///
/// Only seed edges whose degree score is strictly below `degree_threshold`
/// are handed to the exclusion rule; the result therefore never contains
/// an edge between two nodes that both have in-degree `>= degree_threshold`
/// (beyond what a custom rule adds). A threshold of `0` excludes nothing.
///
/// The result is placed on `output_device` if given, otherwise on the
/// graph's device.
///
/// # Example
///
/// ```rust
/// use linkpred_core::algo::exclude::{find_exclude_eids, ExcludeMode};
/// use linkpred_core::{EdgeType, Graph, TypedEdgeIds};
///
/// // Node 3 receives three edges; the rest receive at most one.
/// let g = Graph::homogeneous(4, [(0, 3), (1, 3), (2, 3), (3, 0)]).unwrap();
/// let etype = EdgeType::homogeneous();
/// let seeds = TypedEdgeIds::single(etype.clone(), vec![0, 1, 3]);
///
/// let set = find_exclude_eids(&g, &seeds, &ExcludeMode::SelfEdges, 1, None)
///     .unwrap()
///     .unwrap();
/// // Edge 1 (1 -> 3) has score min(0, 3) = 0; edges 0 and 3 score 1.
/// assert_eq!(set.eids.get(&etype), Some(&[1][..]));
/// ```
pub fn find_exclude_eids(
    g: &Graph,
    seed_edges: &TypedEdgeIds,
    mode: &ExcludeMode,
    degree_threshold: usize,
    output_device: Option<Device>,
) -> Result<Option<ExcludeSet>> {
    let restricted = restrict_by_degree(g, seed_edges, degree_threshold)?;
    let excluded = resolve_exclusion(g, mode, &restricted)?;

    log::debug!(
        "exclusion: {} seed edges, {} below degree {}, {} excluded",
        seed_edges.len(),
        restricted.len(),
        degree_threshold,
        excluded.as_ref().map_or(0, TypedEdgeIds::len)
    );

    Ok(excluded.map(|eids| ExcludeSet {
        eids,
        device: output_device.unwrap_or_else(|| g.device()),
    }))
}
