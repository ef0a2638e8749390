//! Vector store: contiguous f32 arena indexed by dense internal IDs.
//!
//! Vectors are stored back-to-back in a single `Vec<f32>` (Struct-of-Arrays
//! layout) for cache-friendly access during graph traversal. The dimension is
//! fixed by the first append; every later append must match it. Vectors are
//! immutable once stored and IDs are never reused — the build-then-query
//! workload needs no update or delete path.

use crate::config;
use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};

/// Append-only arena of fixed-dimension f32 vectors.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VectorStore {
    data: Vec<f32>,
    dimension: usize,
    count: u32,
}

impl VectorStore {
    /// Creates an empty store. The dimension is established by the first append.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vector and returns its newly assigned internal ID.
    ///
    /// The first append fixes the store's dimension; later appends that
    /// disagree fail with [`IndexError::DimensionMismatch`] and leave the
    /// store untouched.
    pub fn append(&mut self, vector: &[f32]) -> Result<u32> {
        if self.count == 0 {
            if vector.is_empty() || vector.len() > config::MAX_DIMENSION {
                return Err(IndexError::InvalidArgument(format!(
                    "dimension must be in 1..={}, got {}",
                    config::MAX_DIMENSION,
                    vector.len()
                )));
            }
            self.dimension = vector.len();
        } else if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let id = self.count;
        self.data.extend_from_slice(vector);
        self.count += 1;
        Ok(id)
    }

    /// Returns a read-only view of the vector with the given external ID.
    pub fn get(&self, id: u64) -> Result<&[f32]> {
        if id >= self.count as u64 {
            return Err(IndexError::NotFound(id));
        }
        Ok(self.vector(id as u32))
    }

    /// Internal accessor for IDs produced by the graph.
    ///
    /// An out-of-range ID here is an internal-consistency fault (the graph
    /// only holds IDs the store assigned) and panics via slice indexing.
    #[inline]
    pub fn vector(&self, id: u32) -> &[f32] {
        let start = id as usize * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Returns `true` if no vector has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fixed dimension, or `None` before the first append.
    pub fn dim(&self) -> Option<usize> {
        (self.count > 0).then_some(self.dimension)
    }

    /// Releases excess arena capacity after a bulk build.
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
    }

    /// Validates internal invariants, primarily after deserialization.
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.count > 0 && self.dimension == 0 {
            return Err("populated store has zero dimension".to_string());
        }
        let expected = self.count as usize * self.dimension;
        if self.data.len() != expected {
            return Err(format!(
                "arena length {} != count({}) * dimension({})",
                self.data.len(),
                self.count,
                self.dimension
            ));
        }
        Ok(())
    }
}
