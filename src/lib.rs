//! # smallworld
//!
//! Embeddable in-process approximate nearest neighbor index built on the
//! Hierarchical Navigable Small World (HNSW) graph algorithm.
//!
//! The crate is synchronous and allocation-owned — suitable for embedding
//! directly in a benchmark harness, a service, or another language binding.
//! Build is exclusive-writer; queries are read-only and safe for unlimited
//! concurrent readers once the build phase has completed.
//!
//! # Example
//!
//! ```
//! use smallworld::{HnswConfig, VectorIndex};
//!
//! let vectors = vec![vec![0.0f32, 1.0], vec![1.0, 0.0], vec![0.9, 0.1]];
//! let mut index = VectorIndex::build(vectors, "l2", HnswConfig::default()).unwrap();
//! index.set_query_param(10).unwrap();
//!
//! let hits = index.query(&[1.0, 0.0], 2).unwrap();
//! assert_eq!(hits[0].0, 1); // exact match first
//! ```

/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Error type and crate-wide `Result` alias.
pub mod error;
/// HNSW approximate nearest neighbor index: graph structure, search, insertion, and distance metrics.
pub mod hnsw;
/// Index façade: build, query-parameter handling, search, and teardown.
pub mod index;
/// Snapshot persistence: bincode serialization with CRC32 integrity footer.
pub mod storage;
/// Vector store: contiguous f32 arena indexed by dense internal IDs.
pub mod store;

pub use error::{IndexError, Result};
pub use hnsw::{DistanceMetric, HnswConfig, HnswGraph};
pub use index::VectorIndex;
pub use store::VectorStore;
