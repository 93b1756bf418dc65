//! # Pixseek Vector Store
//!
//! Exact k-nearest-neighbor storage and lookup for image embeddings.
//!
//! ## Architecture
//!
//! ```text
//! Embedding[] + ImageId[]
//!     │
//!     ├──> VectorStore
//!     │      └─> Brute-force squared-L2 search
//!     │
//!     ├──> artifact (persistence)
//!     │      └─> Atomic binary blob + change signature
//!     │
//!     └──> IndexService
//!            └─> Lazy load, signature polling, snapshot swap
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pixseek_vector_store::{IndexService, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let service = IndexService::new("data/index.psx");
//!     let hits = service.search(&[0.0_f32; 256], 10).await?;
//!
//!     for hit in hits {
//!         println!("{}: {:.4}", hit.identifier, hit.distance);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod artifact;
mod error;
mod service;
mod store;
mod types;

pub use artifact::ArtifactSignature;
pub use error::{Result, VectorStoreError};
pub use service::IndexService;
pub use store::VectorStore;
pub use types::SearchHit;
