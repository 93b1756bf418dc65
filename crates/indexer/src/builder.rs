use crate::error::{IndexerError, Result};
use crate::scanner::DatasetScanner;
use crate::stats::BuildStats;
use pixseek_embedder::ImageEmbedder;
use pixseek_vector_store::{artifact, VectorStore};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Offline batch builder: embeds every image in a dataset directory and
/// writes the index artifact.
pub struct DatasetIndexer {
    embedder: Arc<dyn ImageEmbedder>,
}

impl DatasetIndexer {
    pub fn new(embedder: Arc<dyn ImageEmbedder>) -> Self {
        Self { embedder }
    }

    /// Embed all images under `dataset_dir` and save the resulting store
    /// to `artifact_path`.
    ///
    /// Individual embedder failures are logged, counted, and skipped; the
    /// build only fails as a whole when no image could be embedded, in
    /// which case no artifact is written.
    pub async fn build_from_dataset(
        &self,
        dataset_dir: impl AsRef<Path>,
        artifact_path: impl AsRef<Path>,
    ) -> Result<BuildStats> {
        let dataset_dir = dataset_dir.as_ref();
        if !dataset_dir.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "{} is not a directory",
                dataset_dir.display()
            )));
        }

        let started = Instant::now();
        let files = DatasetScanner::new(dataset_dir).scan();

        let mut stats = BuildStats::new();
        let mut embeddings = Vec::with_capacity(files.len());
        let mut identifiers = Vec::with_capacity(files.len());

        for path in files {
            match self.embedder.extract(&path).await {
                Ok(vector) => {
                    embeddings.push(vector);
                    identifiers.push(path.display().to_string());
                    stats.indexed += 1;
                }
                Err(err) => {
                    log::warn!("Skipping {:?}: {err}", path);
                    stats.add_skip(format!("{}: {err}", path.display()));
                }
            }
        }

        let store = VectorStore::build(embeddings, identifiers)?;
        artifact::save(&store, artifact_path.as_ref()).await?;

        stats.time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Indexed {} images ({} skipped) into {:?} in {} ms",
            stats.indexed,
            stats.skipped,
            artifact_path.as_ref(),
            stats.time_ms
        );
        Ok(stats)
    }
}
