//! # Pixseek Indexer
//!
//! Offline batch indexing of image datasets.
//!
//! ## Pipeline
//!
//! ```text
//! Dataset directory
//!     │
//!     ├──> DatasetScanner
//!     │      └─> Image files (sorted)
//!     │
//!     ├──> ImageEmbedder (per file, failures skipped)
//!     │      └─> Embedding vectors
//!     │
//!     └──> VectorStore + artifact::save
//!            └─> Atomic index artifact
//! ```

mod builder;
mod error;
mod scanner;
mod stats;

pub use builder::DatasetIndexer;
pub use error::{IndexerError, Result};
pub use scanner::DatasetScanner;
pub use stats::BuildStats;
