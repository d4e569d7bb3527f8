//! Algorithms behind edge-prediction batching.
//!
//! This module contains degree scoring, exclusion resolution and the
//! reference samplers.

/// Degree scores and low-degree restriction.
pub mod degree;

/// Exclusion rules for positive edges.
pub mod exclude;

/// Neighbor and negative sampling.
pub mod sampling;
