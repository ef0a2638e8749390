//! Hierarchical Navigable Small World (HNSW) approximate nearest neighbor index.
//!
//! This module implements the HNSW algorithm for fast approximate nearest
//! neighbor search over the [`crate::store::VectorStore`]'s identifiers.
//! Insertion builds a multi-layer proximity graph with bidirectional links and
//! heuristic diversity pruning; search descends the layers greedily and runs a
//! bounded beam search at layer 0.
//!
//! The graph does not own vector payloads. Every graph operation takes the
//! store by reference, keeping insertion, pruning, and search independent of
//! how vectors are laid out in memory.

/// Distance metrics: L2, inner product, and cosine.
pub mod distance;
/// HNSW graph structure, configuration, and layer assignment.
pub mod graph;
/// HNSW insertion algorithm with bidirectional connections and heuristic pruning.
pub mod insert;
/// Chunked-accumulator f32 distance kernels (auto-vectorization friendly).
pub mod kernels;
/// HNSW search: single-layer beam search and multi-layer KNN.
pub mod search;
/// Epoch-based visited set for efficient graph traversal.
pub mod visited;

pub use distance::DistanceMetric;
pub use graph::{HnswConfig, HnswGraph};
pub use search::knn_search;
