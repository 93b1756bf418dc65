//! # Pixseek Embedder
//!
//! The embedder boundary: image file in, fixed-length L2-normalized
//! feature vector out. The index never looks inside an embedder; it only
//! relies on this contract.

mod error;
mod histogram;

pub use error::{EmbedderError, Result};
pub use histogram::{ByteHistogramEmbedder, HISTOGRAM_BINS};

use async_trait::async_trait;
use std::path::Path;

/// Produces an embedding vector for an image file.
///
/// Contract: `extract` is deterministic for identical input, the output
/// length equals `dimension()` for the lifetime of the instance, and the
/// output is L2-normalized unless its norm is exactly zero (a degenerate
/// all-zero embedding is passed through as-is).
#[async_trait]
pub trait ImageEmbedder: Send + Sync {
    /// Output vector length, fixed per embedder instance.
    fn dimension(&self) -> usize;

    /// Embed the image at `path`. Fails for unreadable input; callers
    /// must not substitute fallback feature values.
    async fn extract(&self, path: &Path) -> Result<Vec<f32>>;
}

/// Scale `vector` to unit L2 norm. A zero vector is left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_produces_unit_norm() {
        let mut vector = vec![3.0, 4.0];
        l2_normalize(&mut vector);
        assert_eq!(vector, vec![0.6, 0.8]);
    }

    #[test]
    fn normalize_leaves_zero_vector_alone() {
        let mut vector = vec![0.0; 4];
        l2_normalize(&mut vector);
        assert_eq!(vector, vec![0.0; 4]);
    }
}
