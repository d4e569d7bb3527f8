//! Error types for linkpred-core.

use thiserror::Error;

/// Error type for graph, split and sampling operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Node ID outside `0..num_nodes` for its node type.
    #[error("node {node} out of range for node type '{node_type}' ({num_nodes} nodes)")]
    NodeOutOfRange {
        node_type: String,
        node: usize,
        num_nodes: usize,
    },

    /// Edge ID outside `0..num_edges` for its edge type.
    #[error("edge {edge} out of range for edge type {edge_type} ({num_edges} edges)")]
    EdgeOutOfRange {
        edge_type: String,
        edge: usize,
        num_edges: usize,
    },

    /// A derived graph's parent mapping has no entry for an edge.
    #[error("edge {edge} of type {edge_type} has no recorded parent")]
    MissingParentEdge { edge_type: String, edge: usize },

    /// Edge type not present in the graph.
    #[error("unknown edge type: {0}")]
    UnknownEdgeType(String),

    /// Relation name matches several canonical edge types, or the graph
    /// has several edge types where exactly one was expected.
    #[error("ambiguous edge type: {0}")]
    AmbiguousEdgeType(String),

    /// Node type not present in the graph.
    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    /// A reverse-edge exclusion was requested for an edge type with no mapping.
    #[error("no reverse mapping for edge type {0}")]
    MissingReverseMapping(String),

    /// Graphs passed to a joint operation do not share a schema.
    #[error("incompatible graphs: {0}")]
    IncompatibleGraphs(String),

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for linkpred operations.
pub type Result<T> = std::result::Result<T, Error>;
