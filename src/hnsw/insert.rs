//! HNSW insertion algorithm.
//!
//! Inserts a node into the graph with bidirectional connections and heuristic
//! neighbor pruning (Algorithm 4 from the HNSW paper). The vector must already
//! be in the store under the same ID, so all validation happens before this
//! runs and a rejected vector never touches the graph.

use crate::hnsw::distance::DistanceMetric;
use crate::hnsw::graph::HnswGraph;
use crate::hnsw::search::search_layer;
use crate::hnsw::visited::VisitedSet;
use crate::store::VectorStore;

impl HnswGraph {
    /// Inserts the node `internal_id` into the graph.
    ///
    /// `internal_id` must equal the current node count and its vector must
    /// already be stored. Duplicate vectors are permitted and become distinct
    /// nodes; no identity deduplication is performed.
    pub fn insert(&mut self, internal_id: u32, store: &VectorStore) {
        debug_assert_eq!(internal_id as usize, self.len());
        let level = self.random_level();

        // First node becomes the entry point and insertion stops.
        let Some(entry_point) = self.entry_point else {
            self.neighbors.push(vec![Vec::new(); level + 1]);
            self.levels.push(level as u8);
            self.entry_point = Some(internal_id);
            self.max_layer = level;
            return;
        };

        let query = store.vector(internal_id);
        let mut visited = VisitedSet::new(self.len());

        // Phase 1: greedy ef=1 descent from the top layer down to level + 1.
        let mut current_ep = entry_point;
        for layer in (level + 1..=self.max_layer).rev() {
            let results = search_layer(
                self,
                store,
                query,
                std::slice::from_ref(&current_ep),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, nearest)) = results.first() {
                current_ep = nearest;
            }
        }

        // Phase 2: beam-search each layer from min(level, max_layer) down to 0
        // and pick the new node's neighbors with the diversity heuristic.
        let top = level.min(self.max_layer);
        let mut node_neighbors: Vec<Vec<u32>> = vec![Vec::new(); level + 1];
        let mut layer_eps: Vec<u32> = vec![current_ep];
        for layer in (0..=top).rev() {
            let candidates = search_layer(
                self,
                store,
                query,
                &layer_eps,
                self.config.ef_construction,
                layer,
                &mut visited,
            );

            let m_max = self.max_degree(layer);
            let selected = select_neighbors_heuristic(self.metric, store, &candidates, m_max);
            node_neighbors[layer] = selected.iter().map(|&(_, id)| id).collect();

            // The full candidate set seeds the next (lower) layer.
            layer_eps.clear();
            layer_eps.extend(candidates.iter().map(|&(_, id)| id));
            if layer_eps.is_empty() {
                layer_eps.push(entry_point);
            }
        }

        self.neighbors.push(node_neighbors);
        self.levels.push(level as u8);

        // Phase 3: add the reverse edges; re-prune any neighbor whose list
        // now exceeds its degree bound, with the same heuristic.
        for layer in 0..=top {
            let m_max = self.max_degree(layer);
            let my_neighbors: Vec<u32> = self.neighbors[internal_id as usize][layer].clone();
            for &neighbor_id in &my_neighbors {
                let nid = neighbor_id as usize;
                debug_assert!(layer < self.neighbors[nid].len());
                self.neighbors[nid][layer].push(internal_id);

                if self.neighbors[nid][layer].len() > m_max {
                    let base = store.vector(neighbor_id);
                    let candidates: Vec<(f32, u32)> = self.neighbors[nid][layer]
                        .iter()
                        .map(|&cid| (self.metric.distance(base, store.vector(cid)), cid))
                        .collect();
                    let pruned = select_neighbors_heuristic(self.metric, store, &candidates, m_max);
                    self.neighbors[nid][layer] = pruned.iter().map(|&(_, id)| id).collect();
                }
            }
        }

        // A node above the current top layer becomes the new entry point.
        if level > self.max_layer {
            self.max_layer = level;
            self.entry_point = Some(internal_id);
        }
    }
}

/// Heuristic neighbor selection (Algorithm 4 from the HNSW paper).
///
/// Prefers diverse neighbors: a candidate is selected only if it is at least
/// as close to the base node as to every already-selected neighbor. This
/// avoids redundant clusters of near-identical neighbors and preserves
/// navigability better than naive k-closest selection. If the heuristic
/// leaves slots unfilled, the closest unused candidates are backfilled.
///
/// `candidates` holds `(distance_to_base, id)` pairs; the returned list is
/// sorted ascending by that distance.
pub(crate) fn select_neighbors_heuristic(
    metric: DistanceMetric,
    store: &VectorStore,
    candidates: &[(f32, u32)],
    m: usize,
) -> Vec<(f32, u32)> {
    let mut sorted = candidates.to_vec();
    sorted.sort_unstable_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    let mut selected: Vec<(f32, u32)> = Vec::with_capacity(m);
    for &(dist_to_base, cid) in &sorted {
        if selected.len() >= m {
            break;
        }
        let cand_vec = store.vector(cid);
        let is_diverse = selected.iter().all(|&(_, sid)| {
            dist_to_base <= metric.distance(cand_vec, store.vector(sid))
        });
        if is_diverse {
            selected.push((dist_to_base, cid));
        }
    }

    if selected.len() < m {
        for &(dist, cid) in &sorted {
            if selected.len() >= m {
                break;
            }
            if !selected.iter().any(|&(_, sid)| sid == cid) {
                selected.push((dist, cid));
            }
        }
    }

    selected
}
