//! Error type for index operations.
//!
//! All validation errors are surfaced synchronously to the caller; a failed
//! operation commits no partial mutation to the graph or the vector store.

/// Error returned by index, store, and graph operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A vector's length disagrees with the index's fixed dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The requested distance metric is not supported.
    #[error("unsupported metric: {0:?}")]
    UnsupportedMetric(String),

    /// A numeric parameter (k, ef, M, ef_construction) is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The index cannot serve queries yet (or anymore).
    #[error("index not ready: {0}")]
    NotReady(&'static str),

    /// Lookup of an out-of-range identifier.
    #[error("vector {0} not found")]
    NotFound(u64),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
