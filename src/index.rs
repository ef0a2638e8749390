//! Index façade: orchestrates build and query over the store and the graph.
//!
//! Mirrors the ANN benchmark plugin contract: bulk build, a query-time
//! exploration parameter set once and reused, top-k queries, and an
//! idempotent teardown. External identifiers are the insertion positions
//! `0..n-1`, exposed as `u64`.

use crate::config;
use crate::error::{IndexError, Result};
use crate::hnsw::graph::{HnswConfig, HnswGraph};
use crate::hnsw::search::knn_search;
use crate::hnsw::DistanceMetric;
use crate::store::VectorStore;
use serde::{Deserialize, Serialize};

/// Store and graph, present while the index is open.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IndexInner {
    pub(crate) store: VectorStore,
    pub(crate) graph: HnswGraph,
}

/// An HNSW-backed approximate nearest neighbor index over one vector
/// collection.
///
/// Build is exclusive-writer; [`VectorIndex::query`] takes `&self` and
/// mutates nothing, so queries may run from any number of threads once the
/// build completed. Backing memory is released on drop or via the explicit
/// [`VectorIndex::close`].
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    pub(crate) inner: Option<IndexInner>,
    ef_search: Option<usize>,
}

impl VectorIndex {
    /// Builds an index over `vectors` in input order.
    ///
    /// Vector `i` gets external id `i`. Fails with
    /// [`IndexError::UnsupportedMetric`] for an unknown metric name,
    /// [`IndexError::InvalidArgument`] for out-of-range config parameters,
    /// and [`IndexError::DimensionMismatch`] if the vectors disagree in
    /// length.
    pub fn build<I>(vectors: I, metric: &str, config: HnswConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let metric = DistanceMetric::parse(metric)?;
        config.validate()?;

        let mut store = VectorStore::new();
        let mut graph = HnswGraph::new(metric, config);
        for vector in vectors {
            let id = store.append(&vector)?;
            graph.insert(id, &store);
        }
        graph.optimize();
        store.shrink_to_fit();

        tracing::info!(
            vectors = store.len(),
            dimension = store.dim().unwrap_or(0),
            max_layer = graph.max_layer,
            ?metric,
            "index built"
        );

        Ok(Self {
            inner: Some(IndexInner { store, graph }),
            ef_search: None,
        })
    }

    /// Sets the exploration breadth used by subsequent queries.
    pub fn set_query_param(&mut self, ef: usize) -> Result<()> {
        if ef < 1 {
            return Err(IndexError::InvalidArgument(
                "ef must be >= 1".to_string(),
            ));
        }
        self.ef_search = Some(ef);
        Ok(())
    }

    /// Returns the `min(k, population)` nearest neighbors of `vector` as
    /// `(external id, distance)` pairs, ascending by distance with ties
    /// broken by ascending id.
    ///
    /// Fails with [`IndexError::NotReady`] before [`Self::set_query_param`]
    /// or after [`Self::close`], [`IndexError::InvalidArgument`] for a bad
    /// `k` or `ef < k`, and [`IndexError::DimensionMismatch`] when the query
    /// length disagrees with the index dimension.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<(u64, f32)>> {
        let inner = self
            .inner
            .as_ref()
            .ok_or(IndexError::NotReady("index is closed"))?;
        let ef = self
            .ef_search
            .ok_or(IndexError::NotReady("query parameters not set"))?;

        if k < 1 || k > config::MAX_K {
            return Err(IndexError::InvalidArgument(format!(
                "k must be in 1..={}, got {k}",
                config::MAX_K
            )));
        }
        if ef < k {
            return Err(IndexError::InvalidArgument(format!(
                "ef ({ef}) must be >= k ({k})"
            )));
        }

        // No dimension is established before the first insert; an empty
        // index answers every query with an empty result.
        let Some(dim) = inner.store.dim() else {
            return Ok(Vec::new());
        };
        if vector.len() != dim {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                actual: vector.len(),
            });
        }

        let hits = knn_search(&inner.graph, &inner.store, vector, k, ef);
        Ok(hits.into_iter().map(|(d, id)| (id as u64, d)).collect())
    }

    /// Releases all owned memory. Idempotent; queries after close fail with
    /// [`IndexError::NotReady`].
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("index closed");
        }
    }

    /// Number of indexed vectors (0 after close).
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.store.len())
    }

    /// Returns `true` if the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed vector dimension, or `None` while empty or closed.
    pub fn dimension(&self) -> Option<usize> {
        self.inner.as_ref().and_then(|inner| inner.store.dim())
    }

    /// The configured distance metric, or `None` after close.
    pub fn metric(&self) -> Option<DistanceMetric> {
        self.inner.as_ref().map(|inner| inner.graph.metric)
    }
}
