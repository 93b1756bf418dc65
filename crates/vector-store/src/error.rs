use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Length mismatch: {embeddings} embeddings vs {identifiers} identifiers")]
    LengthMismatch {
        embeddings: usize,
        identifiers: usize,
    },

    #[error("Empty dataset: nothing to index")]
    EmptyDataset,

    #[error("Index artifact not found: {0:?}")]
    ArtifactNotFound(PathBuf),

    #[error("Corrupt index artifact: {0}")]
    CorruptArtifact(String),

    #[error("Index not built")]
    IndexNotBuilt,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
