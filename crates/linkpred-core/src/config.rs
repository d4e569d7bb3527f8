//! Configuration for the leakage filter and the edge-prediction sampler.
//!
//! The exclusion rule is not part of [`SamplerConfig`]: custom rules are
//! closures, so [`crate::ExcludeMode`] is passed to
//! [`crate::EdgePredictionSampler::with_exclude`] directly.

use crate::{Device, Error, Result};
use serde::{Deserialize, Serialize};

/// Options for building inference graphs and sampling training batches.
///
/// # Example
///
/// ```
/// use linkpred_core::SamplerConfig;
///
/// let config = SamplerConfig::from_json_str(r#"{ "degree_threshold": 4 }"#).unwrap();
/// assert_eq!(config.degree_threshold, 4);
/// assert!(!config.valid_as_input);
/// assert_eq!(config.fanouts, vec![10, 10]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Seed edges are excluded only if the smaller endpoint in-degree is
    /// strictly below this. Default: 10
    pub degree_threshold: usize,

    /// Keep validation edges in the inference graph. Default: false
    pub valid_as_input: bool,

    /// Edge label names fetched onto the pair graph by the feature assigner.
    /// Default: none
    pub prefetch_labels: Vec<String>,

    /// Placement for exclusion sets. Default: the graph's placement
    pub output_device: Option<Device>,

    /// Neighbors sampled per hop, seed side first; read by
    /// [`crate::algo::sampling::NeighborSampler::from_config`]. Default: [10, 10]
    pub fanouts: Vec<usize>,

    /// Uniform negatives per seed edge; `None` disables negative sampling.
    /// Default: None
    pub negatives_per_edge: Option<usize>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            degree_threshold: 10,
            valid_as_input: false,
            prefetch_labels: Vec::new(),
            output_device: None,
            fanouts: vec![10, 10],
            negatives_per_edge: None,
        }
    }
}

impl SamplerConfig {
    pub fn with_degree_threshold(mut self, threshold: usize) -> Self {
        self.degree_threshold = threshold;
        self
    }

    pub fn with_valid_as_input(mut self, valid_as_input: bool) -> Self {
        self.valid_as_input = valid_as_input;
        self
    }

    pub fn with_prefetch_labels(mut self, labels: Vec<String>) -> Self {
        self.prefetch_labels = labels;
        self
    }

    pub fn with_output_device(mut self, device: Device) -> Self {
        self.output_device = Some(device);
        self
    }

    pub fn with_fanouts(mut self, fanouts: Vec<usize>) -> Self {
        self.fanouts = fanouts;
        self
    }

    pub fn with_negatives_per_edge(mut self, k: usize) -> Self {
        self.negatives_per_edge = Some(k);
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// `Error::InvalidConfig` for empty fanouts or zero negatives per edge.
    pub fn validate(&self) -> Result<()> {
        if self.fanouts.is_empty() {
            return Err(Error::InvalidConfig("fanouts must not be empty".into()));
        }
        if self.negatives_per_edge == Some(0) {
            return Err(Error::InvalidConfig(
                "negatives_per_edge must be at least 1; use null to disable".into(),
            ));
        }
        Ok(())
    }

    /// Parse from JSON, filling unspecified fields with defaults, and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
