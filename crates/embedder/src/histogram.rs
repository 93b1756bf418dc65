use crate::error::{EmbedderError, Result};
use crate::{l2_normalize, ImageEmbedder};
use async_trait::async_trait;
use std::path::Path;

pub const HISTOGRAM_BINS: usize = 256;

/// Byte-value histogram embedder.
///
/// Buckets every byte of the file into 256 bins and L2-normalizes the
/// result. Deterministic and cheap; a content signature rather than a
/// perceptual model. Deployments wanting semantic similarity plug a
/// neural embedder in behind the same trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteHistogramEmbedder;

#[async_trait]
impl ImageEmbedder for ByteHistogramEmbedder {
    fn dimension(&self) -> usize {
        HISTOGRAM_BINS
    }

    async fn extract(&self, path: &Path) -> Result<Vec<f32>> {
        let bytes =
            tokio::fs::read(path)
                .await
                .map_err(|source| EmbedderError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut histogram = vec![0.0_f32; HISTOGRAM_BINS];
        for byte in &bytes {
            histogram[*byte as usize] += 1.0;
        }
        l2_normalize(&mut histogram);

        log::debug!("Embedded {:?} ({} bytes)", path, bytes.len());
        Ok(histogram)
    }
}
