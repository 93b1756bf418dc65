use serde::Serialize;

/// A single nearest-neighbor match.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Identifier stored alongside the matched embedding (usually an image path).
    pub identifier: String,

    /// Squared L2 distance to the query; smaller means more similar.
    pub distance: f32,
}
