use crate::artifact::{self, ArtifactSignature};
use crate::error::{Result, VectorStoreError};
use crate::store::VectorStore;
use crate::types::SearchHit;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

enum State {
    Uninitialized,
    Ready {
        store: Arc<VectorStore>,
        signature: ArtifactSignature,
    },
    Failed(String),
}

/// Long-lived, concurrency-safe facade over the on-disk index artifact.
///
/// Loads lazily on first use and re-checks the artifact signature before
/// each search, swapping in a freshly loaded store when the builder has
/// replaced the artifact. Searches run against a reference-counted
/// snapshot, so a search that started before a swap finishes against the
/// store it began with.
pub struct IndexService {
    artifact_path: PathBuf,
    state: RwLock<State>,
    reload_gate: Mutex<()>,
    last_reload_error: std::sync::Mutex<Option<String>>,
}

impl IndexService {
    pub fn new(artifact_path: impl AsRef<Path>) -> Self {
        Self {
            artifact_path: artifact_path.as_ref().to_path_buf(),
            state: RwLock::new(State::Uninitialized),
            reload_gate: Mutex::new(()),
            last_reload_error: std::sync::Mutex::new(None),
        }
    }

    /// Search the active store for the `k` nearest neighbors of `query`.
    ///
    /// Fails with `IndexNotBuilt` when no artifact exists yet, and with
    /// the load error when the artifact is corrupt and no previously
    /// loaded store is available.
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        self.ensure_loaded().await?;
        self.maybe_reload().await;
        let store = self.snapshot().await?;
        store.search(query, k)
    }

    /// Reference-counted handle to the active store, for callers that
    /// want to pin one version across several calls.
    pub async fn snapshot(&self) -> Result<Arc<VectorStore>> {
        match &*self.state.read().await {
            State::Ready { store, .. } => Ok(Arc::clone(store)),
            State::Uninitialized => Err(VectorStoreError::IndexNotBuilt),
            State::Failed(reason) => Err(VectorStoreError::CorruptArtifact(reason.clone())),
        }
    }

    /// Load the artifact if nothing has been loaded yet.
    ///
    /// A missing artifact is not an error here; the service stays
    /// uninitialized and searches report `IndexNotBuilt`. A corrupt
    /// artifact moves the service to a failed state that surfaces to
    /// callers until a later reload succeeds.
    pub async fn ensure_loaded(&self) -> Result<()> {
        if !matches!(&*self.state.read().await, State::Uninitialized) {
            return Ok(());
        }

        let _gate = self.reload_gate.lock().await;
        if !matches!(&*self.state.read().await, State::Uninitialized) {
            return Ok(());
        }

        match self.load_current().await {
            Ok((store, signature)) => {
                log::info!(
                    "Loaded index artifact {:?}: {} vectors",
                    self.artifact_path,
                    store.len()
                );
                *self.state.write().await = State::Ready {
                    store: Arc::new(store),
                    signature,
                };
                Ok(())
            }
            Err(VectorStoreError::ArtifactNotFound(_)) => Ok(()),
            Err(err) => {
                *self.state.write().await = State::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Swap in a freshly loaded store when the artifact has changed.
    ///
    /// Only one reload runs at a time; contending callers return
    /// immediately and serve the current snapshot. A failed reload keeps
    /// the previous store active and records the error.
    pub async fn maybe_reload(&self) {
        let Ok(_gate) = self.reload_gate.try_lock() else {
            return;
        };

        let current = match artifact::signature(&self.artifact_path).await {
            Ok(signature) => signature,
            Err(err) => {
                self.record_reload_error(&err);
                return;
            }
        };

        let stale = match &*self.state.read().await {
            State::Ready { signature, .. } => *signature != current,
            State::Failed(_) => true,
            State::Uninitialized => current != ArtifactSignature::Absent,
        };
        if !stale || current == ArtifactSignature::Absent {
            return;
        }

        match self.load_current().await {
            Ok((store, signature)) => {
                log::info!(
                    "Reloaded index artifact {:?}: {} vectors",
                    self.artifact_path,
                    store.len()
                );
                *self.state.write().await = State::Ready {
                    store: Arc::new(store),
                    signature,
                };
                self.clear_reload_error();
            }
            Err(err) => {
                log::warn!(
                    "Reload of {:?} failed, keeping previous index: {err}",
                    self.artifact_path
                );
                self.record_reload_error(&err);
                let mut state = self.state.write().await;
                if !matches!(&*state, State::Ready { .. }) {
                    *state = State::Failed(err.to_string());
                }
            }
        }
    }

    /// Most recent reload failure, if any; cleared by a successful reload.
    pub fn last_reload_error(&self) -> Option<String> {
        self.last_reload_error
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    // Signature is taken before the read, so an artifact replaced mid-load
    // is flagged stale again on the next poll.
    async fn load_current(&self) -> Result<(VectorStore, ArtifactSignature)> {
        let signature = artifact::signature(&self.artifact_path).await?;
        let store = artifact::load(&self.artifact_path).await?;
        Ok((store, signature))
    }

    fn record_reload_error(&self, err: &VectorStoreError) {
        if let Ok(mut guard) = self.last_reload_error.lock() {
            *guard = Some(err.to_string());
        }
    }

    fn clear_reload_error(&self) {
        if let Ok(mut guard) = self.last_reload_error.lock() {
            *guard = None;
        }
    }
}
