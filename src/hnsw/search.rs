//! HNSW search: single-layer beam search and multi-layer KNN.
//!
//! Queries never mutate graph state, so any number of threads may search the
//! same graph concurrently once the build phase has finished. The visited set
//! is pooled per thread to avoid a large allocation on every query.

use crate::hnsw::graph::HnswGraph;
use crate::hnsw::visited::VisitedSet;
use crate::store::VectorStore;
use ordered_float::OrderedFloat;
use std::cell::RefCell;
use std::collections::BinaryHeap;

thread_local! {
    /// Per-thread VisitedSet pool, reused across all queries on the thread.
    static SEARCH_VISITED: RefCell<VisitedSet> = RefCell::new(VisitedSet::default());
}

/// A frontier entry: (negative distance, id). `BinaryHeap` is a max-heap, so
/// negating the distance pops the closest candidate first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    neg_distance: OrderedFloat<f32>,
    id: u32,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.neg_distance.cmp(&other.neg_distance)
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A result entry: (distance, id). Max-heap by distance so the worst result
/// sits at the top and is cheap to evict.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResultEntry {
    distance: OrderedFloat<f32>,
    id: u32,
}

impl Ord for ResultEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance.cmp(&other.distance)
    }
}

impl PartialOrd for ResultEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Beam search over a single layer.
///
/// Maintains a frontier of unexpanded candidates and a bounded result heap of
/// size `ef`; repeatedly expands the closest frontier member's neighbors until
/// the closest remaining candidate cannot improve the results. Returns up to
/// `ef` `(distance, id)` pairs sorted ascending by distance.
pub(crate) fn search_layer(
    graph: &HnswGraph,
    store: &VectorStore,
    query: &[f32],
    entry_points: &[u32],
    ef: usize,
    layer: usize,
    visited: &mut VisitedSet,
) -> Vec<(f32, u32)> {
    visited.clear();
    let mut candidates: BinaryHeap<Candidate> = BinaryHeap::with_capacity(ef * 2);
    let mut results: BinaryHeap<ResultEntry> = BinaryHeap::with_capacity(ef + 1);
    // Cached worst distance avoids a heap peek per neighbor in the hot loop.
    let mut worst_dist = f32::MAX;

    for &ep in entry_points {
        if visited.insert(ep) {
            let dist = graph.metric.distance(query, store.vector(ep));
            candidates.push(Candidate {
                neg_distance: OrderedFloat(-dist),
                id: ep,
            });
            results.push(ResultEntry {
                distance: OrderedFloat(dist),
                id: ep,
            });
            if results.len() >= ef {
                worst_dist = results.peek().map_or(f32::MAX, |r| r.distance.0);
            }
        }
    }

    while let Some(candidate) = candidates.pop() {
        let c_dist = -candidate.neg_distance.0;
        if results.len() >= ef && c_dist > worst_dist {
            break;
        }

        let node = candidate.id as usize;
        if layer >= graph.neighbors[node].len() {
            continue;
        }

        for &neighbor_id in &graph.neighbors[node][layer] {
            if !visited.insert(neighbor_id) {
                continue;
            }

            let dist = graph.metric.distance(query, store.vector(neighbor_id));
            if results.len() < ef || dist < worst_dist {
                candidates.push(Candidate {
                    neg_distance: OrderedFloat(-dist),
                    id: neighbor_id,
                });
                results.push(ResultEntry {
                    distance: OrderedFloat(dist),
                    id: neighbor_id,
                });
                if results.len() > ef {
                    results.pop();
                }
                worst_dist = results.peek().map_or(f32::MAX, |r| r.distance.0);
            }
        }
    }

    results
        .into_sorted_vec()
        .into_iter()
        .map(|r| (r.distance.0, r.id))
        .collect()
}

/// Multi-layer KNN search through the HNSW graph.
///
/// Greedy single-best descent from the entry point down to layer 1, then a
/// beam search with breadth `max(ef, k)` at layer 0. Returns at most `k`
/// `(distance, id)` pairs, ascending by distance with ties broken by
/// ascending id for determinism. An empty graph yields an empty result.
///
/// The caller validates `k`, `ef`, and the query dimension.
pub fn knn_search(
    graph: &HnswGraph,
    store: &VectorStore,
    query: &[f32],
    k: usize,
    ef: usize,
) -> Vec<(f32, u32)> {
    let Some(entry_point) = graph.entry_point else {
        return Vec::new();
    };

    SEARCH_VISITED.with(|cell| {
        let mut visited = cell.borrow_mut();
        visited.ensure_capacity(graph.len());

        let mut current_ep = entry_point;
        for layer in (1..=graph.max_layer).rev() {
            let results = search_layer(
                graph,
                store,
                query,
                std::slice::from_ref(&current_ep),
                1,
                layer,
                &mut *visited,
            );
            if let Some(&(_, nearest)) = results.first() {
                current_ep = nearest;
            }
        }

        let mut results = search_layer(
            graph,
            store,
            query,
            std::slice::from_ref(&current_ep),
            ef.max(k),
            0,
            &mut *visited,
        );

        results.sort_unstable_by(|a, b| {
            OrderedFloat(a.0).cmp(&OrderedFloat(b.0)).then(a.1.cmp(&b.1))
        });
        results.truncate(k);
        results
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hnsw::distance::DistanceMetric;
    use crate::hnsw::graph::HnswConfig;

    fn build(vectors: &[Vec<f32>], metric: DistanceMetric) -> (HnswGraph, VectorStore) {
        let config = HnswConfig {
            seed: Some(7),
            ..Default::default()
        };
        let mut store = VectorStore::new();
        let mut graph = HnswGraph::new(metric, config);
        for v in vectors {
            let id = store.append(v).unwrap();
            graph.insert(id, &store);
        }
        (graph, store)
    }

    fn ring_vectors(n: usize) -> Vec<Vec<f32>> {
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32 * std::f32::consts::TAU;
                vec![t.cos(), t.sin(), (i as f32 * 0.01).sin()]
            })
            .collect()
    }

    #[test]
    fn test_empty_graph_returns_empty() {
        let store = VectorStore::new();
        let graph = HnswGraph::new(DistanceMetric::L2, HnswConfig::default());
        assert!(knn_search(&graph, &store, &[1.0, 2.0], 5, 10).is_empty());
    }

    #[test]
    fn test_self_query_returns_own_id() {
        let vectors = ring_vectors(200);
        let (graph, store) = build(&vectors, DistanceMetric::L2);
        for id in [0usize, 17, 99, 199] {
            let hits = knn_search(&graph, &store, &vectors[id], 1, 64);
            assert_eq!(hits[0].1 as usize, id, "self-query missed vector {id}");
            assert!(hits[0].0 < 1e-6);
        }
    }

    #[test]
    fn test_returns_k_sorted_unique_results() {
        let vectors = ring_vectors(150);
        let (graph, store) = build(&vectors, DistanceMetric::Cosine);
        let hits = knn_search(&graph, &store, &[1.0, 0.0, 0.0], 10, 50);
        assert_eq!(hits.len(), 10);
        for pair in hits.windows(2) {
            assert!(pair[0].0 <= pair[1].0, "results not ascending");
            assert_ne!(pair[0].1, pair[1].1);
        }
        let mut ids: Vec<u32> = hits.iter().map(|h| h.1).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10, "duplicate ids in results");
    }

    #[test]
    fn test_k_larger_than_population() {
        let vectors = ring_vectors(5);
        let (graph, store) = build(&vectors, DistanceMetric::L2);
        let hits = knn_search(&graph, &store, &[0.0, 0.0, 0.0], 20, 20);
        assert_eq!(hits.len(), 5);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        // Three identical vectors: all at distance 0 from the query.
        let vectors = vec![vec![2.0, 2.0]; 3];
        let (graph, store) = build(&vectors, DistanceMetric::L2);
        let hits = knn_search(&graph, &store, &[2.0, 2.0], 3, 16);
        let ids: Vec<u32> = hits.iter().map(|h| h.1).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_single_node_graph() {
        let (graph, store) = build(&[vec![1.0, 1.0]], DistanceMetric::L2);
        let hits = knn_search(&graph, &store, &[0.0, 0.0], 3, 8);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, 0);
    }

    #[test]
    fn test_search_layer_respects_ef_bound() {
        let vectors = ring_vectors(100);
        let (graph, store) = build(&vectors, DistanceMetric::L2);
        let mut visited = VisitedSet::new(graph.len());
        let eps = [graph.entry_point.unwrap()];
        let results = search_layer(&graph, &store, &vectors[0], &eps, 7, 0, &mut visited);
        assert!(results.len() <= 7);
    }
}
