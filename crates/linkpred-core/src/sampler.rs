//! Edge-prediction mini-batch sampling with degree-aware exclusion.
//!
//! [`EdgePredictionSampler`] turns a batch of seed (positive) edges into
//! everything a link-prediction model needs for one step:
//!
//! 1. a *pair graph* holding the seed edges, compacted to the nodes they touch;
//! 2. optionally a *negative graph* of corrupted pairs on the same node space;
//! 3. message-passing [`Block`]s sampled around those nodes, with low-degree
//!    seed edges (and their reverses, per [`ExcludeMode`]) hidden.
//!
//! Neighbor sampling, negative sampling and feature fetching are injected
//! through [`BlockSampler`], [`NegativeSampler`] and [`FeatureAssigner`].

use crate::algo::exclude::{find_exclude_eids, ExcludeMode, ExcludeSet};
use crate::algo::sampling::{Block, BlockSample, UniformNegativeSampler};
use crate::compact::compact_graphs;
use crate::hetero::{EdgeKey, EdgeType};
use crate::ids::{EdgeId, NodeId, TypedEdgeIds, TypedNodeIds};
use crate::{Device, Error, Graph, Result, SamplerConfig};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::collections::BTreeMap;

/// Node pairs per edge type.
pub type TypedPairs = BTreeMap<EdgeType, Vec<(NodeId, NodeId)>>;

/// Samples message-passing blocks around a set of seed nodes.
pub trait BlockSampler: Send + Sync {
    /// Sample blocks whose last layer produces `seed_nodes`, never using an
    /// edge listed in `exclude`.
    fn sample(
        &self,
        g: &Graph,
        seed_nodes: &TypedNodeIds,
        exclude: Option<&ExcludeSet>,
        seed: u64,
    ) -> Result<BlockSample>;
}

/// Produces negative node pairs for a batch of seed edges.
pub trait NegativeSampler: Send + Sync {
    /// Negative `(src, dst)` pairs per edge type of `seed_edges`.
    fn sample(&self, g: &Graph, seed_edges: &TypedEdgeIds, seed: u64) -> Result<TypedPairs>;
}

/// Attaches lazily fetched node and edge features to a finished batch.
pub trait FeatureAssigner: Send + Sync {
    /// Attach features; `prefetch_labels` names the edge labels to fetch for
    /// the pair graph.
    fn assign(&self, batch: &mut MiniBatch, prefetch_labels: &[String]) -> Result<()>;
}

/// Feature assigner that attaches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeatures;

impl FeatureAssigner for NoFeatures {
    fn assign(&self, _batch: &mut MiniBatch, _prefetch_labels: &[String]) -> Result<()> {
        Ok(())
    }
}

/// Seed edges of one batch, as given by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEdges {
    /// Edge IDs of a single-type graph.
    Homogeneous(Vec<EdgeId>),
    /// Edge IDs per edge type, keyed by relation name or canonical type.
    Typed(Vec<(EdgeKey, Vec<EdgeId>)>),
}

impl From<Vec<EdgeId>> for SeedEdges {
    fn from(eids: Vec<EdgeId>) -> Self {
        Self::Homogeneous(eids)
    }
}

impl SeedEdges {
    /// Key every edge type by its canonical form.
    ///
    /// Homogeneous seeds use the graph's only edge type; keys naming the
    /// same canonical type are merged.
    pub fn normalize(&self, g: &Graph) -> Result<TypedEdgeIds> {
        match self {
            Self::Homogeneous(eids) => Ok(TypedEdgeIds::single(
                g.default_etype()?.clone(),
                eids.clone(),
            )),
            Self::Typed(entries) => entries
                .iter()
                .map(|(key, eids)| Ok((g.to_canonical_etype(key)?, eids.clone())))
                .collect(),
        }
    }
}

/// Everything one training step consumes.
#[derive(Debug, Clone)]
pub struct MiniBatch {
    /// Nodes whose input features the first block reads.
    pub input_nodes: TypedNodeIds,
    /// Compacted graph of the seed edges. Its induced nodes are the seed
    /// nodes; its induced edges are the seed edge IDs.
    pub pair_graph: Graph,
    /// Compacted negative pairs, present iff a negative sampler is configured.
    pub neg_graph: Option<Graph>,
    /// Message-passing blocks, input layer first.
    pub blocks: Vec<Block>,
    /// Edges hidden from `blocks`; `None` when the exclusion mode is `None`.
    pub exclude: Option<ExcludeSet>,
}

impl MiniBatch {
    /// Original IDs of the nodes the pair graph refers to.
    pub fn seed_nodes(&self) -> Option<&TypedNodeIds> {
        self.pair_graph.induced_nodes()
    }
}

/// Edge-prediction sampler that only excludes low-degree seed edges.
///
/// # Example
///
/// ```rust
/// use linkpred_core::algo::sampling::NeighborSampler;
/// use linkpred_core::{EdgePredictionSampler, ExcludeMode, Graph, SeedEdges};
///
/// let g = Graph::homogeneous(4, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
/// let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![5]))
///     .with_exclude(ExcludeMode::SelfEdges)
///     .with_degree_threshold(2);
///
/// let batch = sampler.sample(&g, &SeedEdges::from(vec![0, 2]), 42).unwrap();
/// // every node has in-degree 1 < 2, so both seed edges are hidden
/// assert_eq!(batch.exclude.unwrap().len(), 2);
/// assert!(batch.neg_graph.is_none());
/// ```
pub struct EdgePredictionSampler<S> {
    sampler: S,
    exclude: ExcludeMode,
    negative_sampler: Option<Box<dyn NegativeSampler>>,
    features: Box<dyn FeatureAssigner>,
    prefetch_labels: Vec<String>,
    degree_threshold: usize,
    output_device: Option<Device>,
}

impl<S: BlockSampler> EdgePredictionSampler<S> {
    /// Wrap a block sampler. Defaults: no exclusion, no negatives,
    /// degree threshold 10.
    pub fn new(sampler: S) -> Self {
        let defaults = SamplerConfig::default();
        Self {
            sampler,
            exclude: ExcludeMode::None,
            negative_sampler: None,
            features: Box::new(NoFeatures),
            prefetch_labels: defaults.prefetch_labels,
            degree_threshold: defaults.degree_threshold,
            output_device: defaults.output_device,
        }
    }

    /// Apply a validated config. `negatives_per_edge` installs a
    /// [`UniformNegativeSampler`]. `fanouts` belongs to the block sampler;
    /// see [`crate::algo::sampling::NeighborSampler::from_config`].
    pub fn from_config(sampler: S, config: &SamplerConfig) -> Result<Self> {
        config.validate()?;
        let mut this = Self::new(sampler)
            .with_degree_threshold(config.degree_threshold)
            .with_prefetch_labels(config.prefetch_labels.clone());
        this.output_device = config.output_device;
        if let Some(k) = config.negatives_per_edge {
            this = this.with_negative_sampler(UniformNegativeSampler::new(k));
        }
        Ok(this)
    }

    pub fn with_exclude(mut self, exclude: ExcludeMode) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_negative_sampler(mut self, negative_sampler: impl NegativeSampler + 'static) -> Self {
        self.negative_sampler = Some(Box::new(negative_sampler));
        self
    }

    pub fn with_feature_assigner(mut self, features: impl FeatureAssigner + 'static) -> Self {
        self.features = Box::new(features);
        self
    }

    pub fn with_prefetch_labels(mut self, labels: Vec<String>) -> Self {
        self.prefetch_labels = labels;
        self
    }

    pub fn with_degree_threshold(mut self, threshold: usize) -> Self {
        self.degree_threshold = threshold;
        self
    }

    pub fn with_output_device(mut self, device: Device) -> Self {
        self.output_device = Some(device);
        self
    }

    /// The wrapped block sampler.
    pub fn block_sampler(&self) -> &S {
        &self.sampler
    }

    /// Exclusion rule in use.
    pub fn exclude_mode(&self) -> &ExcludeMode {
        &self.exclude
    }

    pub fn degree_threshold(&self) -> usize {
        self.degree_threshold
    }

    /// Build one mini-batch from seed edges of `g`.
    ///
    /// `seed` drives all randomness; equal inputs give equal batches.
    pub fn sample(&self, g: &Graph, seed_edges: &SeedEdges, seed: u64) -> Result<MiniBatch> {
        let seed_edges = seed_edges.normalize(g)?;
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let neg_seed = rng.next_u64();
        let block_seed = rng.next_u64();

        let pair_graph = g.edge_subgraph(&seed_edges)?;
        let eids = pair_graph.induced_edges().cloned();

        let (mut pair_graph, neg_graph) = match &self.negative_sampler {
            Some(negative_sampler) => {
                let neg_graph = build_neg_graph(g, negative_sampler.as_ref(), &seed_edges, neg_seed)?;
                let mut compacted = compact_graphs(&[pair_graph, neg_graph])?.into_iter();
                match (compacted.next(), compacted.next()) {
                    (Some(pos), Some(neg)) => (pos, Some(neg)),
                    _ => {
                        return Err(Error::IncompatibleGraphs(
                            "compaction returned fewer graphs than given".into(),
                        ))
                    }
                }
            }
            None => {
                let pos = compact_graphs(std::slice::from_ref(&pair_graph))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        Error::IncompatibleGraphs("compaction returned no graph".into())
                    })?;
                (pos, None)
            }
        };

        pair_graph.set_induced_edges(eids);
        let (pair_graph, neg_graph) = match self.output_device {
            Some(device) => (
                pair_graph.to_device(device),
                neg_graph.map(|neg| neg.to_device(device)),
            ),
            None => (pair_graph, neg_graph),
        };
        let seed_nodes = pair_graph.induced_nodes().cloned().unwrap_or_default();

        let exclude = find_exclude_eids(
            g,
            &seed_edges,
            &self.exclude,
            self.degree_threshold,
            self.output_device,
        )?;

        let BlockSample {
            input_nodes,
            blocks,
            ..
        } = self
            .sampler
            .sample(g, &seed_nodes, exclude.as_ref(), block_seed)?;

        let mut batch = MiniBatch {
            input_nodes,
            pair_graph,
            neg_graph,
            blocks,
            exclude,
        };
        self.features.assign(&mut batch, &self.prefetch_labels)?;
        Ok(batch)
    }
}

/// Negative pairs as a graph over the same node universe as `g`.
fn build_neg_graph(
    g: &Graph,
    negative_sampler: &dyn NegativeSampler,
    seed_edges: &TypedEdgeIds,
    seed: u64,
) -> Result<Graph> {
    let pairs = negative_sampler.sample(g, seed_edges, seed)?;
    let mut neg_graph = g.empty_like();
    for (etype, pairs) in pairs {
        neg_graph.add_edges(&etype, pairs)?;
    }
    Ok(neg_graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::sampling::NeighborSampler;
    use crate::NodeType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn square() -> Graph {
        // 0 -> 1 -> 2 -> 3 -> 0, plus 0 -> 2
        Graph::homogeneous(6, [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap()
    }

    #[test]
    fn test_pair_graph_compacted_with_eids() {
        let g = square();
        let etype = EdgeType::homogeneous();
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![2]));

        let batch = sampler.sample(&g, &SeedEdges::from(vec![4, 2]), 0).unwrap();

        assert_eq!(
            batch.seed_nodes().unwrap().get(&NodeType::default()),
            Some(&[0, 2, 3][..])
        );
        assert_eq!(batch.pair_graph.num_nodes(&NodeType::default()), 3);
        assert_eq!(
            batch.pair_graph.induced_edges().unwrap().get(&etype),
            Some(&[4, 2][..])
        );
        // (0, 2) -> (0, 1); (2, 3) -> (1, 2)
        assert_eq!(batch.pair_graph.edge_ids(&etype, 0, 1), vec![0]);
        assert_eq!(batch.pair_graph.edge_ids(&etype, 1, 2), vec![1]);
        assert!(batch.exclude.is_none());
        assert!(batch.neg_graph.is_none());
    }

    #[test]
    fn test_negative_graph_shares_node_space() {
        let g = square();
        let etype = EdgeType::homogeneous();
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![2]))
            .with_negative_sampler(UniformNegativeSampler::new(2));

        let batch = sampler.sample(&g, &SeedEdges::from(vec![0, 1]), 3).unwrap();
        let neg = batch.neg_graph.as_ref().unwrap();

        assert_eq!(neg.num_edges(&etype), 4);
        assert_eq!(neg.induced_nodes(), batch.pair_graph.induced_nodes());
        assert_eq!(
            neg.num_nodes(&NodeType::default()),
            batch.pair_graph.num_nodes(&NodeType::default())
        );
    }

    #[test]
    fn test_high_degree_seed_not_excluded() {
        let g = square();
        let etype = EdgeType::homogeneous();
        // in-degrees: 0 -> 1, 1 -> 1, 2 -> 2, 3 -> 1
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![5]))
            .with_exclude(ExcludeMode::SelfEdges)
            .with_degree_threshold(2);

        let batch = sampler
            .sample(&g, &SeedEdges::from(vec![0, 1, 2, 3, 4]), 1)
            .unwrap();
        let exclude = batch.exclude.unwrap();

        // Every edge has an endpoint with in-degree 1
        assert_eq!(exclude.eids.get(&etype), Some(&[0, 1, 2, 3, 4][..]));

        let strict = EdgePredictionSampler::new(NeighborSampler::new(vec![5]))
            .with_exclude(ExcludeMode::SelfEdges)
            .with_degree_threshold(1);
        let batch = strict
            .sample(&g, &SeedEdges::from(vec![0, 1, 2, 3, 4]), 1)
            .unwrap();
        assert!(batch.exclude.unwrap().is_empty());
    }

    #[test]
    fn test_blocks_never_use_excluded_edges() {
        let g = square();
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![10, 10]))
            .with_exclude(ExcludeMode::SelfEdges)
            .with_degree_threshold(10);

        let batch = sampler.sample(&g, &SeedEdges::from(vec![1, 3]), 7).unwrap();
        let exclude = batch.exclude.as_ref().unwrap();

        for block in &batch.blocks {
            for (etype, eids) in block.edge_ids.iter() {
                assert!(eids.iter().all(|&e| !exclude.contains(etype, e)));
            }
        }
    }

    #[test]
    fn test_typed_seeds_by_relation() {
        let buys = EdgeType::new("user", "buys", "item");
        let mut g = Graph::new();
        g.add_nodes("user", 3);
        g.add_nodes("item", 3);
        g.add_edges(&buys, [(0, 0), (1, 1), (2, 2)]).unwrap();
        g.add_edges(&buys.reverse(), [(0, 0), (1, 1), (2, 2)]).unwrap();

        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![2]))
            .with_exclude(ExcludeMode::reverse_types([&buys]));
        let seeds = SeedEdges::Typed(vec![(EdgeKey::from("buys"), vec![1])]);

        let batch = sampler.sample(&g, &seeds, 0).unwrap();
        let exclude = batch.exclude.unwrap();
        assert!(exclude.contains(&buys, 1));
        assert!(exclude.contains(&buys.reverse(), 1));
        assert_eq!(exclude.len(), 2);
    }

    #[test]
    fn test_homogeneous_seeds_need_single_type() {
        let mut g = Graph::new();
        g.add_nodes("a", 1);
        g.add_edge_type(&EdgeType::new("a", "x", "a"));
        g.add_edge_type(&EdgeType::new("a", "y", "a"));

        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![1]));
        assert!(matches!(
            sampler.sample(&g, &SeedEdges::from(vec![0]), 0),
            Err(Error::AmbiguousEdgeType(_))
        ));
    }

    struct CountingFeatures(Arc<AtomicUsize>);

    impl FeatureAssigner for CountingFeatures {
        fn assign(&self, batch: &mut MiniBatch, prefetch_labels: &[String]) -> Result<()> {
            assert_eq!(prefetch_labels, ["label".to_string()]);
            assert!(batch.seed_nodes().is_some());
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_feature_assigner_called_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![1]))
            .with_prefetch_labels(vec!["label".into()])
            .with_feature_assigner(CountingFeatures(Arc::clone(&calls)));

        sampler.sample(&square(), &SeedEdges::from(vec![0]), 0).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config() {
        let config = SamplerConfig::default()
            .with_degree_threshold(3)
            .with_negatives_per_edge(1)
            .with_output_device(Device::Accelerator(2));
        let sampler = EdgePredictionSampler::from_config(NeighborSampler::new(vec![1]), &config)
            .unwrap()
            .with_exclude(ExcludeMode::SelfEdges);

        assert_eq!(sampler.degree_threshold(), 3);
        let batch = sampler.sample(&square(), &SeedEdges::from(vec![0]), 0).unwrap();
        assert_eq!(batch.pair_graph.device(), Device::Accelerator(2));
        assert_eq!(batch.neg_graph.unwrap().device(), Device::Accelerator(2));
        assert_eq!(batch.exclude.unwrap().device, Device::Accelerator(2));
    }

    #[test]
    fn test_graphs_keep_source_device_without_override() {
        let g = square().to_device(Device::Accelerator(1));
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![1]))
            .with_negative_sampler(UniformNegativeSampler::new(1));

        let batch = sampler.sample(&g, &SeedEdges::from(vec![0]), 0).unwrap();
        assert_eq!(batch.pair_graph.device(), Device::Accelerator(1));
        assert_eq!(batch.neg_graph.unwrap().device(), Device::Accelerator(1));
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let g = square();
        let sampler = EdgePredictionSampler::new(NeighborSampler::new(vec![1, 1]))
            .with_negative_sampler(UniformNegativeSampler::new(3));
        let seeds = SeedEdges::from(vec![0, 2, 4]);

        let a = sampler.sample(&g, &seeds, 11).unwrap();
        let b = sampler.sample(&g, &seeds, 11).unwrap();
        assert_eq!(a.blocks, b.blocks);
        assert_eq!(a.neg_graph, b.neg_graph);
        assert_eq!(a.input_nodes, b.input_nodes);
    }
}
