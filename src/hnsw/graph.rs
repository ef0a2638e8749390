//! HNSW graph structure and configuration.
//!
//! [`HnswConfig`] defines tuning parameters (M, ef_construction, layer cap,
//! RNG seed). [`HnswGraph`] holds the multi-layer adjacency structure over the
//! vector store's identifiers; vector payloads live in the store, never here.

use crate::config;
use crate::error::{IndexError, Result};
use crate::hnsw::distance::DistanceMetric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration parameters for an HNSW graph.
///
/// Controls the trade-off between build speed, search speed, recall, and
/// memory usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Number of bidirectional links per node (except layer 0, which uses `m_max0`).
    pub m: usize,
    /// Maximum links per node at layer 0 (typically `2 * m`).
    pub m_max0: usize,
    /// Candidate list size during index construction.
    pub ef_construction: usize,
    /// Maximum number of layers in the graph.
    pub max_layers: usize,
    /// Seed for the layer-assignment RNG. `None` draws from OS entropy;
    /// a fixed seed makes graph construction fully deterministic for a
    /// given insertion order.
    pub seed: Option<u64>,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: config::HNSW_DEFAULT_M,
            m_max0: config::HNSW_DEFAULT_M * 2,
            ef_construction: config::HNSW_DEFAULT_EF_CONSTRUCTION,
            max_layers: config::HNSW_DEFAULT_MAX_LAYERS,
            seed: None,
        }
    }
}

impl HnswConfig {
    /// Checks parameter ranges before any graph is built from this config.
    pub fn validate(&self) -> Result<()> {
        if self.m < config::HNSW_MIN_M {
            return Err(IndexError::InvalidArgument(format!(
                "M must be >= {}, got {}",
                config::HNSW_MIN_M,
                self.m
            )));
        }
        if self.m_max0 < self.m {
            return Err(IndexError::InvalidArgument(format!(
                "m_max0 ({}) must be >= M ({})",
                self.m_max0, self.m
            )));
        }
        if self.ef_construction == 0 {
            return Err(IndexError::InvalidArgument(
                "ef_construction must be >= 1".to_string(),
            ));
        }
        if self.max_layers == 0 {
            return Err(IndexError::InvalidArgument(
                "max_layers must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Multi-layer proximity graph over vector-store identifiers.
///
/// Adjacency is stored as `neighbors[node][layer] -> Vec<u32>`; the per-node
/// `levels` array records each node's top layer. The graph has two conceptual
/// states: empty (`entry_point == None`) and populated — the only transition
/// happens on the first insert and there is no way back (no delete).
#[derive(Debug, Serialize, Deserialize)]
pub struct HnswGraph {
    pub config: HnswConfig,
    pub metric: DistanceMetric,
    /// `[node_id][layer] -> neighbor ids`, ordered closest-first after pruning.
    pub neighbors: Vec<Vec<Vec<u32>>>,
    /// Top layer of each node.
    pub levels: Vec<u8>,
    pub entry_point: Option<u32>,
    pub max_layer: usize,
    /// Layer-assignment random source. Not serialized: a loaded graph
    /// re-seeds from entropy, so only cross-run level determinism of
    /// post-load inserts is lost.
    #[serde(skip, default = "entropy_rng")]
    rng: StdRng,
}

impl HnswGraph {
    /// Creates an empty graph for the given metric and configuration.
    ///
    /// The caller is expected to have run [`HnswConfig::validate`] first.
    pub fn new(metric: DistanceMetric, config: HnswConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            metric,
            neighbors: Vec::new(),
            levels: Vec::new(),
            entry_point: None,
            max_layer: 0,
            rng,
        }
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if no node has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Draws a layer for a new node from the standard HNSW exponential
    /// distribution with scale `1/ln(M)`, capped at `max_layers - 1`.
    pub(crate) fn random_level(&mut self) -> usize {
        let ml = 1.0 / (self.config.m as f64).ln();
        let r: f64 = self.rng.gen();
        let level = (-r.ln() * ml).floor() as usize;
        level.min(self.config.max_layers - 1)
    }

    /// Maximum adjacency-list length at the given layer.
    #[inline]
    pub(crate) fn max_degree(&self, layer: usize) -> usize {
        if layer == 0 {
            self.config.m_max0
        } else {
            self.config.m
        }
    }

    /// Releases excess adjacency capacity after a bulk build.
    ///
    /// Purely a memory hint; search results are unaffected.
    pub fn optimize(&mut self) {
        for node in &mut self.neighbors {
            for layer in node.iter_mut() {
                layer.shrink_to_fit();
            }
            node.shrink_to_fit();
        }
        self.neighbors.shrink_to_fit();
        self.levels.shrink_to_fit();
        tracing::debug!(nodes = self.len(), "compacted adjacency lists");
    }

    /// Validates structural invariants, primarily after deserialization.
    ///
    /// Checks array lengths against `node_count`, entry point existence and
    /// placement, per-layer degree bounds, and that every adjacency entry
    /// refers to an existing node at a layer it occupies.
    pub fn check_consistency(&self, node_count: usize) -> std::result::Result<(), String> {
        if self.levels.len() != node_count {
            return Err(format!(
                "levels length {} != node count {}",
                self.levels.len(),
                node_count
            ));
        }
        if self.neighbors.len() != node_count {
            return Err(format!(
                "neighbors length {} != node count {}",
                self.neighbors.len(),
                node_count
            ));
        }

        match self.entry_point {
            None => {
                if node_count != 0 {
                    return Err("populated graph has no entry point".to_string());
                }
            }
            Some(ep) => {
                if ep as usize >= node_count {
                    return Err(format!("entry point {ep} out of bounds"));
                }
                if self.levels[ep as usize] as usize != self.max_layer {
                    return Err(format!(
                        "entry point level {} != max layer {}",
                        self.levels[ep as usize], self.max_layer
                    ));
                }
            }
        }

        for (id, layers) in self.neighbors.iter().enumerate() {
            let level = self.levels[id] as usize;
            if layers.len() != level + 1 {
                return Err(format!(
                    "node {id} has {} layer lists but level {level}",
                    layers.len()
                ));
            }
            for (layer, list) in layers.iter().enumerate() {
                if list.len() > self.max_degree(layer) {
                    return Err(format!(
                        "node {id} exceeds degree bound at layer {layer}: {} > {}",
                        list.len(),
                        self.max_degree(layer)
                    ));
                }
                for &nb in list {
                    if nb as usize >= node_count {
                        return Err(format!("node {id} links to missing node {nb}"));
                    }
                    if (self.levels[nb as usize] as usize) < layer {
                        return Err(format!(
                            "node {id} links to {nb} at layer {layer}, above its level"
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_valid() {
        assert!(HnswConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_small_m() {
        let config = HnswConfig {
            m: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IndexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_ef_construction() {
        let config = HnswConfig {
            ef_construction: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_random_level_within_cap() {
        let config = HnswConfig {
            seed: Some(7),
            ..Default::default()
        };
        let max_layers = config.max_layers;
        let mut graph = HnswGraph::new(DistanceMetric::L2, config);
        for _ in 0..10_000 {
            assert!(graph.random_level() < max_layers);
        }
    }

    #[test]
    fn test_random_level_mostly_zero() {
        // With M=16 roughly 1 - 1/16 of draws land on layer 0.
        let config = HnswConfig {
            seed: Some(42),
            ..Default::default()
        };
        let mut graph = HnswGraph::new(DistanceMetric::L2, config);
        let zeros = (0..10_000).filter(|_| graph.random_level() == 0).count();
        assert!(zeros > 8_500, "only {zeros}/10000 draws hit layer 0");
    }

    #[test]
    fn test_seeded_levels_reproducible() {
        let make = || {
            let config = HnswConfig {
                seed: Some(99),
                ..Default::default()
            };
            let mut g = HnswGraph::new(DistanceMetric::Cosine, config);
            (0..100).map(|_| g.random_level()).collect::<Vec<_>>()
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn test_empty_graph_consistency() {
        let graph = HnswGraph::new(DistanceMetric::L2, HnswConfig::default());
        assert!(graph.check_consistency(0).is_ok());
        assert!(graph.check_consistency(1).is_err());
    }
}
