use serde::{Deserialize, Serialize};

/// Outcome of one batch build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Images successfully embedded and indexed
    pub indexed: usize,

    /// Images skipped because the embedder failed on them
    pub skipped: usize,

    /// Wall-clock build time in milliseconds
    pub time_ms: u64,

    /// One message per skipped image
    pub errors: Vec<String>,
}

impl BuildStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_skip(&mut self, message: String) {
        self.skipped += 1;
        self.errors.push(message);
    }
}
