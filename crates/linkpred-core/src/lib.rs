// Allow minor clippy style warnings at crate level
// These are mostly style preferences, not bugs
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

//! Leakage-safe graphs for link-prediction training.
//!
//! Link prediction trains a model to score node pairs from a message-passing
//! neighborhood. Two things can leak the answer into that neighborhood:
//!
//! - **Held-out edges at inference.** Validation and test pairs that are
//!   still edges of the inference graph. [`split::LeakageFilter`] builds a
//!   copy of the graph with them removed in both directions.
//! - **Positive edges during training.** The seed edges of a batch.
//!   [`EdgePredictionSampler`] hides them from the sampled blocks, but only
//!   when an endpoint has low in-degree; edges between well-connected nodes
//!   stay, since one edge more or less barely moves a large neighborhood.
//!
//! # Core Types
//!
//! - [`Graph`] - Directed multigraph with per-type integer node and edge IDs
//! - [`TypedEdgeIds`] / [`TypedNodeIds`] - IDs keyed by edge or node type
//! - [`ExcludeMode`] - None / self / reverse-by-ID / reverse-by-type / custom
//! - [`EdgePredictionSampler`] - Builds a [`MiniBatch`] from seed edges
//! - [`SamplerConfig`] - Degree threshold, fanouts, negatives, placement
//!
//! # Algorithms
//!
//! - [`algo::degree`] - Degree scores, `min(in_degree(u), in_degree(v))`
//! - [`algo::exclude`] - Degree-restricted exclusion sets
//! - [`algo::sampling`] - Reference neighbor and uniform negative samplers
//! - [`compact`] - Shared minimal node ID space for pair graphs
//!
//! # Example
//!
//! ```rust
//! use linkpred_core::algo::sampling::{NeighborSampler, UniformNegativeSampler};
//! use linkpred_core::split::LeakageFilter;
//! use linkpred_core::{EdgePredictionSampler, EdgeSplit, ExcludeMode, Graph, SeedEdges};
//!
//! let g = Graph::homogeneous(5, [(0, 1), (1, 2), (2, 3), (3, 4), (1, 3)]).unwrap();
//!
//! // Once, before training: an inference graph without the test pair
//! let split = EdgeSplit::new(vec![], vec![(3, 4)]);
//! let inference_graph = LeakageFilter::new().apply(&g, &split).unwrap();
//! assert_eq!(inference_graph.total_edges(), 4);
//!
//! // Per batch: exclude low-degree positives from message passing
//! let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![5, 5]))
//!     .with_exclude(ExcludeMode::SelfEdges)
//!     .with_negative_sampler(UniformNegativeSampler::new(1))
//!     .with_degree_threshold(2);
//! let batch = sampler.sample(&g, &SeedEdges::from(vec![0, 4]), 42).unwrap();
//! assert!(batch.neg_graph.is_some());
//! ```

pub mod algo;
pub mod compact;
pub mod config;
mod error;
mod graph;
pub mod hetero;
mod ids;
pub mod sampler;
mod serde_pairs;
pub mod split;

pub use algo::exclude::{find_exclude_eids, ExcludeMode, ExcludeSet};
pub use config::SamplerConfig;
pub use error::{Error, Result};
pub use graph::{Device, EdgeStore, Graph};
pub use hetero::{EdgeKey, EdgeType, NodeType};
pub use ids::{EdgeId, NodeId, TypedEdgeIds, TypedIds, TypedNodeIds};
pub use sampler::{EdgePredictionSampler, MiniBatch, SeedEdges};
pub use split::{build_inference_graph, EdgeSplit, LeakageFilter, LeakageReport};
