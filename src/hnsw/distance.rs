//! Distance metric selection for HNSW search.
//!
//! All metrics return a distance value where **lower is better** (more
//! similar), so insertion and search share one comparison direction.

use crate::error::{IndexError, Result};
use crate::hnsw::kernels;
use serde::{Deserialize, Serialize};

/// Distance metric used for vector similarity computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Squared Euclidean distance (L2²). Range: \[0, ∞).
    L2,
    /// Negative dot product: `-dot(a, b)`. Lower = higher similarity.
    InnerProduct,
    /// Cosine distance: `1 - cosine_similarity`, computed per call — vectors
    /// are stored as given, never pre-normalized. Range: \[0, 2\].
    Cosine,
}

impl DistanceMetric {
    /// Parses a benchmark-style metric name.
    ///
    /// Accepts the aliases common in ANN benchmark harnesses: `l2` /
    /// `euclidean`, `inner_product` / `ip`, and `cosine` / `angular`.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "l2" | "euclidean" => Ok(DistanceMetric::L2),
            "inner_product" | "ip" => Ok(DistanceMetric::InnerProduct),
            "cosine" | "angular" => Ok(DistanceMetric::Cosine),
            other => Err(IndexError::UnsupportedMetric(other.to_string())),
        }
    }

    /// Computes the distance between two equal-length f32 slices.
    ///
    /// Length validation happens at the public boundaries (store append,
    /// façade query); by the time this runs both slices have the index's
    /// fixed dimension.
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::L2 => kernels::euclidean_sq(a, b),
            DistanceMetric::InnerProduct => -kernels::dot(a, b),
            DistanceMetric::Cosine => 1.0 - kernels::cosine(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(DistanceMetric::parse("l2").unwrap(), DistanceMetric::L2);
        assert_eq!(
            DistanceMetric::parse("inner_product").unwrap(),
            DistanceMetric::InnerProduct
        );
        assert_eq!(
            DistanceMetric::parse("cosine").unwrap(),
            DistanceMetric::Cosine
        );
    }

    #[test]
    fn test_parse_benchmark_aliases() {
        assert_eq!(
            DistanceMetric::parse("euclidean").unwrap(),
            DistanceMetric::L2
        );
        assert_eq!(
            DistanceMetric::parse("ip").unwrap(),
            DistanceMetric::InnerProduct
        );
        assert_eq!(
            DistanceMetric::parse("angular").unwrap(),
            DistanceMetric::Cosine
        );
    }

    #[test]
    fn test_parse_unknown_metric() {
        assert!(matches!(
            DistanceMetric::parse("hamming"),
            Err(IndexError::UnsupportedMetric(_))
        ));
    }

    #[test]
    fn test_l2_self_distance_zero() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert!(DistanceMetric::L2.distance(&a, &a) < 1e-6);
    }

    #[test]
    fn test_inner_product_is_negated() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let d = DistanceMetric::InnerProduct.distance(&a, &b);
        assert!((d - (-32.0)).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_orthogonal_is_one() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        let d = DistanceMetric::Cosine.distance(&a, &b);
        assert!((d - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_all_metrics_rank_closer_vector_lower() {
        let query = [1.0, 1.0, 0.0];
        let near = [1.0, 0.9, 0.1];
        let far = [-1.0, -1.0, 0.0];
        for metric in [
            DistanceMetric::L2,
            DistanceMetric::InnerProduct,
            DistanceMetric::Cosine,
        ] {
            assert!(
                metric.distance(&query, &near) < metric.distance(&query, &far),
                "{metric:?} ranked the far vector closer"
            );
        }
    }
}
