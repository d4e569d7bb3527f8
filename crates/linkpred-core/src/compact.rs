//! Graph compaction.
//!
//! Compaction relabels a set of graphs onto a shared, minimal node ID space:
//! for every node type, the nodes touched by at least one edge in any of
//! the graphs are numbered `0..k` in ascending order of their original ID.
//! Each compacted graph records the original IDs in
//! [`Graph::induced_nodes`].

use crate::hetero::{EdgeType, NodeType};
use crate::ids::{NodeId, TypedNodeIds};
use crate::{EdgeStore, Error, Graph, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Compact graphs that share node and edge types onto one node ID space.
///
/// Edge IDs are reassigned, so the results carry no induced edge IDs.
///
/// # Example
///
/// ```rust
/// use linkpred_core::compact::compact_graphs;
/// use linkpred_core::{EdgeType, Graph, NodeType};
///
/// let pos = Graph::homogeneous(10, [(3, 7)]).unwrap();
/// let neg = Graph::homogeneous(10, [(3, 9)]).unwrap();
///
/// let compacted = compact_graphs(&[pos, neg]).unwrap();
/// let nodes = compacted[0].induced_nodes().unwrap();
/// assert_eq!(nodes.get(&NodeType::default()), Some(&[3, 7, 9][..]));
/// assert!(compacted[1].has_edge_between(&EdgeType::homogeneous(), 0, 2));
/// ```
pub fn compact_graphs(graphs: &[Graph]) -> Result<Vec<Graph>> {
    let Some(first) = graphs.first() else {
        return Ok(Vec::new());
    };
    let node_types: Vec<&NodeType> = first.node_types().collect();
    let edge_types: Vec<&EdgeType> = first.edge_types().collect();
    for (i, g) in graphs.iter().enumerate().skip(1) {
        if g.node_types().collect::<Vec<_>>() != node_types
            || g.edge_types().collect::<Vec<_>>() != edge_types
        {
            return Err(Error::IncompatibleGraphs(format!(
                "graph {} does not share node and edge types with graph 0",
                i
            )));
        }
    }

    let mut touched: BTreeMap<NodeType, BTreeSet<NodeId>> = node_types
        .iter()
        .map(|&ntype| (ntype.clone(), BTreeSet::new()))
        .collect();
    for g in graphs {
        for etype in g.edge_types() {
            let Some(store) = g.edge_store(etype) else {
                continue;
            };
            for (u, v) in store.iter() {
                touched.entry(etype.src_type.clone()).or_default().insert(u);
                touched.entry(etype.dst_type.clone()).or_default().insert(v);
            }
        }
    }

    let induced: TypedNodeIds = touched
        .iter()
        .map(|(ntype, nodes)| (ntype.clone(), nodes.iter().copied().collect()))
        .collect();
    let relabel: BTreeMap<&NodeType, HashMap<NodeId, NodeId>> = touched
        .iter()
        .map(|(ntype, nodes)| {
            let map = nodes
                .iter()
                .enumerate()
                .map(|(new_id, &old_id)| (old_id, new_id))
                .collect();
            (ntype, map)
        })
        .collect();
    let num_nodes: BTreeMap<NodeType, usize> = touched
        .iter()
        .map(|(ntype, nodes)| (ntype.clone(), nodes.len()))
        .collect();

    let mut out = Vec::with_capacity(graphs.len());
    for g in graphs {
        let mut stores = BTreeMap::new();
        for etype in g.edge_types() {
            let src_map = &relabel[&etype.src_type];
            let dst_map = &relabel[&etype.dst_type];
            let (src, dst): (Vec<NodeId>, Vec<NodeId>) = g
                .edge_store(etype)
                .map(|store| {
                    store
                        .iter()
                        .map(|(u, v)| (src_map[&u], dst_map[&v]))
                        .unzip()
                })
                .unwrap_or_default();
            stores.insert(etype.clone(), EdgeStore::from_edges(src, dst));
        }
        let mut compacted = Graph::from_parts(num_nodes.clone(), stores, g.device());
        compacted.set_induced_nodes(Some(induced.clone()));
        out.push(compacted);
    }

    log::debug!(
        "compacted {} graphs onto {} nodes",
        graphs.len(),
        num_nodes.values().sum::<usize>()
    );
    Ok(out)
}
