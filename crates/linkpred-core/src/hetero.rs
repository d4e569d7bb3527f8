//! Node and edge type keys for heterogeneous graphs.
//!
//! Edge types are identified by their *canonical* form, the
//! `(src_type, relation, dst_type)` triple also used by PyG and DGL.
//! Callers may name an edge type by relation alone ([`EdgeKey::Relation`]);
//! [`crate::Graph::to_canonical_etype`] resolves it against a graph.
//!
//! A homogeneous graph is simply a graph with a single edge type,
//! [`EdgeType::homogeneous`].
//!
//! # Example
//!
//! ```rust
//! use linkpred_core::hetero::{EdgeType, NodeType};
//!
//! let cites = EdgeType::new("paper", "cites", "paper");
//! assert_eq!(cites.src_type, NodeType::new("paper"));
//! assert_eq!(cites.reverse().relation, "rev_cites");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node type identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeType(pub String);

impl NodeType {
    /// Node type name used by homogeneous graphs.
    pub const DEFAULT: &'static str = "_N";

    /// Create a new node type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeType {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for NodeType {
    fn from(s: S) -> Self {
        Self(s.into())
    }
}

/// A canonical edge type, represented as (src_type, relation, dst_type).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeType {
    /// Source node type.
    pub src_type: NodeType,
    /// Relation name.
    pub relation: String,
    /// Destination node type.
    pub dst_type: NodeType,
}

impl EdgeType {
    /// Relation name used by homogeneous graphs.
    pub const DEFAULT_RELATION: &'static str = "_E";

    /// Create a new edge type.
    pub fn new(
        src_type: impl Into<NodeType>,
        relation: impl Into<String>,
        dst_type: impl Into<NodeType>,
    ) -> Self {
        Self {
            src_type: src_type.into(),
            relation: relation.into(),
            dst_type: dst_type.into(),
        }
    }

    /// The single edge type of a homogeneous graph: `(_N, _E, _N)`.
    pub fn homogeneous() -> Self {
        Self::new(NodeType::default(), Self::DEFAULT_RELATION, NodeType::default())
    }

    /// Get the reverse edge type (for undirected edges).
    pub fn reverse(&self) -> Self {
        Self {
            src_type: self.dst_type.clone(),
            relation: format!("rev_{}", self.relation),
            dst_type: self.src_type.clone(),
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.src_type, self.relation, self.dst_type)
    }
}

/// How a caller names an edge type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKey {
    /// Relation name only; must be unique within the graph.
    Relation(String),
    /// Full canonical triple.
    Canonical(EdgeType),
}

impl From<EdgeType> for EdgeKey {
    fn from(etype: EdgeType) -> Self {
        Self::Canonical(etype)
    }
}

impl From<&EdgeType> for EdgeKey {
    fn from(etype: &EdgeType) -> Self {
        Self::Canonical(etype.clone())
    }
}

impl From<&str> for EdgeKey {
    fn from(relation: &str) -> Self {
        Self::Relation(relation.to_string())
    }
}

impl From<String> for EdgeKey {
    fn from(relation: String) -> Self {
        Self::Relation(relation)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation(r) => write!(f, "{}", r),
            Self::Canonical(etype) => write!(f, "{}", etype),
        }
    }
}
