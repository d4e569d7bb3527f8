//! Reference samplers for edge-prediction mini-batches.
//!
//! # Key Types
//!
//! - [`NeighborSampler`] - Multi-hop in-neighbor sampler producing [`Block`]s
//! - [`UniformNegativeSampler`] - Corrupts seed edges with uniform random destinations
//! - [`sample_in_edges`] - Sample up to k in-edges for each node (single hop)
//!
//! Both samplers are deterministic given the `seed` passed to them, and hold
//! no mutable state, so one instance can serve concurrent callers.

use crate::ids::{EdgeId, NodeId, TypedEdgeIds, TypedNodeIds};
use crate::sampler::{BlockSampler, NegativeSampler, TypedPairs};
use crate::{EdgeType, ExcludeSet, Graph, NodeType, Result, SamplerConfig};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sample up to `k` in-edges of one edge type for each node.
///
/// Edge IDs in `exclude` (IDs of `edge_type`) are never sampled.
///
/// # Returns
/// Map of node ID -> sampled edge IDs. Nodes with no eligible in-edges
/// get an empty list.
///
/// # Complexity
/// O(sum of in-degree over `nodes`)
pub fn sample_in_edges<R: Rng>(
    g: &Graph,
    edge_type: &EdgeType,
    nodes: &[NodeId],
    k: usize,
    exclude: Option<&HashSet<EdgeId>>,
    rng: &mut R,
) -> HashMap<NodeId, Vec<EdgeId>> {
    let mut result = HashMap::with_capacity(nodes.len());

    for &node in nodes {
        let eligible: Vec<EdgeId> = g
            .in_edges(edge_type, node)
            .iter()
            .copied()
            .filter(|eid| !exclude.is_some_and(|ex| ex.contains(eid)))
            .collect();

        let sampled = if eligible.len() <= k {
            eligible
        } else {
            eligible.choose_multiple(rng, k).copied().collect()
        };
        result.insert(node, sampled);
    }

    result
}

/// One message-passing layer of a mini-batch.
///
/// Destination nodes are a prefix of the source nodes of the same type, so
/// a model can read destination features from the first rows of its input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Source nodes per type (original graph IDs).
    pub src_nodes: TypedNodeIds,
    /// Destination nodes per type (original graph IDs).
    pub dst_nodes: TypedNodeIds,
    /// Edges per type as `(src_local, dst_local)` positions into the node lists.
    pub edges: BTreeMap<EdgeType, Vec<(usize, usize)>>,
    /// Original edge IDs, parallel to `edges`.
    pub edge_ids: TypedEdgeIds,
}

impl Block {
    /// Total number of sampled edges.
    pub fn num_edges(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Result of block sampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockSample {
    /// Nodes whose features feed the first block.
    pub input_nodes: TypedNodeIds,
    /// Nodes whose representations the last block produces.
    pub output_nodes: TypedNodeIds,
    /// Blocks, input layer first.
    pub blocks: Vec<Block>,
}

/// Multi-hop in-neighbor sampler for GraphSAGE-style mini-batch training.
///
/// At each hop, every frontier node keeps up to `fanout` of its incoming
/// edges (over all edge types ending at its node type), chosen uniformly.
///
/// # Example
///
/// ```rust
/// use linkpred_core::algo::sampling::NeighborSampler;
/// use linkpred_core::sampler::BlockSampler;
/// use linkpred_core::{Graph, NodeType, TypedNodeIds};
///
/// let g = Graph::homogeneous(4, [(1, 0), (2, 0), (3, 1)]).unwrap();
/// let seeds = TypedNodeIds::single(NodeType::default(), vec![0]);
///
/// // 2 neighbors at the first hop, 1 at the second
/// let sampler = NeighborSampler::new(vec![2, 1]);
/// let sample = sampler.sample(&g, &seeds, None, 42).unwrap();
///
/// assert_eq!(sample.blocks.len(), 2);
/// assert_eq!(sample.output_nodes, seeds);
/// ```
#[derive(Debug, Clone)]
pub struct NeighborSampler {
    /// Number of in-edges to sample at each hop.
    /// fanouts[0] = in-edges of the seed nodes, fanouts[1] = 2-hop, etc.
    fanouts: Vec<usize>,
}

impl NeighborSampler {
    /// Create a new sampler.
    pub fn new(fanouts: Vec<usize>) -> Self {
        Self { fanouts }
    }

    /// Sampler using `config.fanouts`.
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.fanouts.clone())
    }

    /// Fanout per hop, seed side first.
    pub fn fanouts(&self) -> &[usize] {
        &self.fanouts
    }
}

/// Ordered node list with position lookup, per node type.
#[derive(Default)]
struct LocalNodes {
    nodes: BTreeMap<NodeType, Vec<NodeId>>,
    index: HashMap<NodeType, HashMap<NodeId, usize>>,
}

impl LocalNodes {
    fn from_ids(ids: &TypedNodeIds) -> Self {
        let mut local = Self::default();
        for (ntype, nodes) in ids.iter() {
            local.nodes.entry(ntype.clone()).or_default();
            for &node in nodes {
                local.get_or_insert(ntype, node);
            }
        }
        local
    }

    fn get_or_insert(&mut self, ntype: &NodeType, node: NodeId) -> usize {
        let index = self.index.entry(ntype.clone()).or_default();
        if let Some(&pos) = index.get(&node) {
            return pos;
        }
        let list = self.nodes.entry(ntype.clone()).or_default();
        let pos = list.len();
        list.push(node);
        index.insert(node, pos);
        pos
    }

    fn into_ids(self) -> TypedNodeIds {
        self.nodes.into_iter().collect()
    }
}

impl BlockSampler for NeighborSampler {
    fn sample(
        &self,
        g: &Graph,
        seed_nodes: &TypedNodeIds,
        exclude: Option<&ExcludeSet>,
        seed: u64,
    ) -> Result<BlockSample> {
        for (ntype, nodes) in seed_nodes.iter() {
            for &node in nodes {
                g.check_node(ntype, node)?;
            }
        }

        let excluded = exclude.map(|ex| ex.eids.to_sets());
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let output_nodes = LocalNodes::from_ids(seed_nodes).into_ids();
        let mut frontier = output_nodes.clone();
        let mut blocks = Vec::with_capacity(self.fanouts.len());

        for &fanout in &self.fanouts {
            let mut src = LocalNodes::from_ids(&frontier);
            let mut edges: BTreeMap<EdgeType, Vec<(usize, usize)>> = BTreeMap::new();
            let mut edge_ids = TypedEdgeIds::new();

            for etype in g.edge_types() {
                let Some(dst_nodes) = frontier.get(&etype.dst_type) else {
                    continue;
                };
                let skip = excluded.as_ref().and_then(|sets| sets.get(etype));
                let sampled = sample_in_edges(g, etype, dst_nodes, fanout, skip, &mut rng);

                let mut layer_edges = Vec::new();
                let mut layer_ids = Vec::new();
                for (dst_pos, dst) in dst_nodes.iter().enumerate() {
                    let Some(eids) = sampled.get(dst) else {
                        continue;
                    };
                    let (sources, _) = g.find_edges(etype, eids)?;
                    for (&eid, u) in eids.iter().zip(sources) {
                        let src_pos = src.get_or_insert(&etype.src_type, u);
                        layer_edges.push((src_pos, dst_pos));
                        layer_ids.push(eid);
                    }
                }
                edges.insert(etype.clone(), layer_edges);
                edge_ids.insert(etype.clone(), layer_ids);
            }

            let src_nodes = src.into_ids();
            blocks.push(Block {
                src_nodes: src_nodes.clone(),
                dst_nodes: frontier,
                edges,
                edge_ids,
            });
            frontier = src_nodes;
        }

        blocks.reverse();
        log::debug!(
            "sampled {} blocks: {} input nodes for {} output nodes",
            blocks.len(),
            frontier.len(),
            output_nodes.len()
        );

        Ok(BlockSample {
            input_nodes: frontier,
            output_nodes,
            blocks,
        })
    }
}

/// Negative sampler that pairs each seed edge's source with `k` uniformly
/// drawn nodes of the destination type.
///
/// Draws are with replacement and may hit existing edges, as in the usual
/// uniform corruption scheme.
#[derive(Debug, Clone, Copy)]
pub struct UniformNegativeSampler {
    k: usize,
}

impl UniformNegativeSampler {
    /// Create a sampler drawing `k` negatives per seed edge.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Negatives per seed edge.
    pub fn k(&self) -> usize {
        self.k
    }
}

impl NegativeSampler for UniformNegativeSampler {
    fn sample(&self, g: &Graph, seed_edges: &TypedEdgeIds, seed: u64) -> Result<TypedPairs> {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let mut pairs = TypedPairs::new();

        for (etype, eids) in seed_edges.iter() {
            let (src, _) = g.find_edges(etype, eids)?;
            let num_dst = g.num_nodes(&etype.dst_type);
            let negatives = pairs.entry(etype.clone()).or_default();
            if num_dst == 0 {
                continue;
            }
            for u in src {
                for _ in 0..self.k {
                    negatives.push((u, rng.gen_range(0..num_dst)));
                }
            }
        }

        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Device;

    fn fan_in() -> Graph {
        // 1, 2, 3 -> 0; 4 -> 1
        Graph::homogeneous(5, [(1, 0), (2, 0), (3, 0), (4, 1)]).unwrap()
    }

    fn seeds(nodes: Vec<NodeId>) -> TypedNodeIds {
        TypedNodeIds::single(NodeType::default(), nodes)
    }

    #[test]
    fn test_sample_in_edges_caps_at_k() {
        let g = fan_in();
        let mut rng = XorShiftRng::seed_from_u64(42);
        let result = sample_in_edges(&g, &EdgeType::homogeneous(), &[0, 1, 4], 2, None, &mut rng);

        assert_eq!(result[&0].len(), 2);
        assert!(result[&0].iter().all(|e| [0, 1, 2].contains(e)));
        assert_eq!(result[&1], vec![3]);
        assert!(result[&4].is_empty());
    }

    #[test]
    fn test_sample_in_edges_skips_excluded() {
        let g = fan_in();
        let etype = EdgeType::homogeneous();
        let exclude: HashSet<EdgeId> = [0, 2].into_iter().collect();
        let mut rng = XorShiftRng::seed_from_u64(7);
        let result = sample_in_edges(&g, &etype, &[0], 10, Some(&exclude), &mut rng);

        assert_eq!(result[&0], vec![1]);
    }

    #[test]
    fn test_neighbor_sampler_single_hop() {
        let g = fan_in();
        let sampler = NeighborSampler::new(vec![10]);
        let sample = sampler.sample(&g, &seeds(vec![0]), None, 42).unwrap();

        assert_eq!(sample.blocks.len(), 1);
        let block = &sample.blocks[0];
        assert_eq!(block.num_edges(), 3);
        // Destination nodes lead the source list
        assert_eq!(block.src_nodes.get(&NodeType::default()).unwrap()[0], 0);
        assert_eq!(sample.input_nodes.len(), 4);
    }

    #[test]
    fn test_neighbor_sampler_multi_hop_order() {
        let g = fan_in();
        let sampler = NeighborSampler::new(vec![3, 3]);
        let sample = sampler.sample(&g, &seeds(vec![0]), None, 42).unwrap();

        assert_eq!(sample.blocks.len(), 2);
        // Last block produces the seeds; first block consumes the inputs.
        assert_eq!(sample.blocks[1].dst_nodes, seeds(vec![0]));
        assert_eq!(sample.blocks[0].src_nodes, sample.input_nodes);
        assert_eq!(sample.blocks[0].dst_nodes, sample.blocks[1].src_nodes);
        // Node 4 is only reachable at the second hop
        assert!(sample.input_nodes.contains(&NodeType::default(), 4));
    }

    #[test]
    fn test_neighbor_sampler_respects_exclusion() {
        let g = fan_in();
        let etype = EdgeType::homogeneous();
        let exclude = ExcludeSet {
            eids: TypedEdgeIds::single(etype.clone(), vec![0, 1, 2]),
            device: Device::Cpu,
        };
        let sampler = NeighborSampler::new(vec![10]);
        let sample = sampler
            .sample(&g, &seeds(vec![0]), Some(&exclude), 1)
            .unwrap();

        assert_eq!(sample.blocks[0].num_edges(), 0);
        assert_eq!(sample.input_nodes, seeds(vec![0]));
    }

    #[test]
    fn test_neighbor_sampler_exclusion_is_per_type() {
        let a = EdgeType::new("n", "a", "n");
        let b = EdgeType::new("n", "b", "n");
        let mut g = Graph::new();
        g.add_nodes("n", 3);
        g.add_edges(&a, [(1, 0), (2, 0)]).unwrap();
        g.add_edges(&b, [(1, 0), (2, 0)]).unwrap();
        // Same IDs, but only listed under `a`
        let exclude = ExcludeSet {
            eids: TypedEdgeIds::single(a.clone(), vec![0, 1]),
            device: Device::Cpu,
        };
        let seeds = TypedNodeIds::single(NodeType::new("n"), vec![0]);

        let sample = NeighborSampler::new(vec![10])
            .sample(&g, &seeds, Some(&exclude), 3)
            .unwrap();
        let block = &sample.blocks[0];
        assert_eq!(block.edges[&a].len(), 0);
        assert_eq!(block.edges[&b].len(), 2);
    }

    #[test]
    fn test_hub_with_large_exclusion() {
        let n = 5_000;
        let g = Graph::homogeneous(n, (1..n).map(|u| (u, 0))).unwrap();
        let etype = EdgeType::homogeneous();
        let exclude = ExcludeSet {
            eids: TypedEdgeIds::single(etype.clone(), (0..n - 2).collect()),
            device: Device::Cpu,
        };

        let sample = NeighborSampler::new(vec![n])
            .sample(&g, &seeds(vec![0]), Some(&exclude), 0)
            .unwrap();
        assert_eq!(sample.blocks[0].edge_ids.get(&etype), Some(&[n - 2][..]));
    }

    #[test]
    fn test_neighbor_sampler_from_config() {
        let config = SamplerConfig::default().with_fanouts(vec![3, 2, 1]);
        let sampler = NeighborSampler::from_config(&config);
        assert_eq!(sampler.fanouts(), &[3, 2, 1]);

        let sample = sampler.sample(&fan_in(), &seeds(vec![0]), None, 0).unwrap();
        assert_eq!(sample.blocks.len(), 3);
    }

    #[test]
    fn test_neighbor_sampler_rejects_unknown_node() {
        let g = fan_in();
        let sampler = NeighborSampler::new(vec![1]);
        assert!(sampler.sample(&g, &seeds(vec![9]), None, 0).is_err());
    }

    #[test]
    fn test_uniform_negatives_keep_source() {
        let g = fan_in();
        let etype = EdgeType::homogeneous();
        let sampler = UniformNegativeSampler::new(3);
        let pairs = sampler
            .sample(&g, &TypedEdgeIds::single(etype.clone(), vec![0, 3]), 9)
            .unwrap();

        let negs = &pairs[&etype];
        assert_eq!(negs.len(), 6);
        assert!(negs[..3].iter().all(|&(u, v)| u == 1 && v < 5));
        assert!(negs[3..].iter().all(|&(u, v)| u == 4 && v < 5));
    }

    #[test]
    fn test_uniform_negatives_deterministic() {
        let g = fan_in();
        let seeds = TypedEdgeIds::single(EdgeType::homogeneous(), vec![0, 1, 2]);
        let sampler = UniformNegativeSampler::new(2);

        assert_eq!(
            sampler.sample(&g, &seeds, 5).unwrap(),
            sampler.sample(&g, &seeds, 5).unwrap()
        );
    }
}
