use crate::error::{Result, VectorStoreError};
use crate::types::SearchHit;

/// In-memory collection of (identifier, embedding) pairs with exact
/// brute-force k-nearest-neighbor search.
///
/// The matrix is stored flat, row-major: row `i` starts at
/// `i * dimension` and is the embedding for `identifiers[i]`. A store is
/// immutable once built; updates happen by building a replacement.
pub struct VectorStore {
    dimension: usize,
    vectors: Vec<f32>,
    identifiers: Vec<String>,
}

impl VectorStore {
    /// Build a store from index-aligned embeddings and identifiers.
    ///
    /// The dimension is fixed to the length of the first embedding.
    pub fn build(embeddings: Vec<Vec<f32>>, identifiers: Vec<String>) -> Result<Self> {
        if embeddings.is_empty() {
            return Err(VectorStoreError::EmptyDataset);
        }
        if embeddings.len() != identifiers.len() {
            return Err(VectorStoreError::LengthMismatch {
                embeddings: embeddings.len(),
                identifiers: identifiers.len(),
            });
        }

        let dimension = embeddings[0].len();
        let mut vectors = Vec::with_capacity(dimension * embeddings.len());
        for embedding in &embeddings {
            if embedding.len() != dimension {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            vectors.extend_from_slice(embedding);
        }

        Ok(Self {
            dimension,
            vectors,
            identifiers,
        })
    }

    /// Reassemble a store from decoded artifact parts.
    ///
    /// Invariant: `vectors.len() == dimension * identifiers.len()`.
    pub(crate) fn from_parts(
        dimension: usize,
        vectors: Vec<f32>,
        identifiers: Vec<String>,
    ) -> Result<Self> {
        let expected = dimension
            .checked_mul(identifiers.len())
            .ok_or_else(|| VectorStoreError::CorruptArtifact("matrix size overflows".into()))?;
        if vectors.len() != expected {
            return Err(VectorStoreError::CorruptArtifact(format!(
                "matrix holds {} floats but {} identifiers x dimension {} requires {}",
                vectors.len(),
                identifiers.len(),
                dimension,
                expected
            )));
        }
        Ok(Self {
            dimension,
            vectors,
            identifiers,
        })
    }

    /// Find the `k` stored embeddings closest to `query` by squared L2
    /// distance, closest first. Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 || self.identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(row, vector)| (row, squared_l2(query, vector)))
            .collect();

        // Stable sort on distance alone, so ties resolve to insertion order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(row, distance)| SearchHit {
                identifier: self.identifiers[row].clone(),
                distance,
            })
            .collect())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Embedding length this store was built with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Embedding at insertion position `row`, if present.
    pub fn vector(&self, row: usize) -> Option<&[f32]> {
        if row >= self.identifiers.len() {
            return None;
        }
        let start = row * self.dimension;
        self.vectors.get(start..start + self.dimension)
    }

    pub(crate) fn matrix(&self) -> &[f32] {
        &self.vectors
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_store() -> VectorStore {
        VectorStore::build(
            vec![
                vec![1.0, 0.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0, 0.0],
                vec![0.9, 0.1, 0.0, 0.0],
            ],
            vec!["img1".to_string(), "img2".to_string(), "img3".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn exact_match_ranks_first_with_zero_distance() {
        let store = sample_store();
        let hits = store.search(&[1.0, 0.0, 0.0, 0.0], 2).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].identifier, "img1");
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].identifier, "img3");
        // (1.0 - 0.9)^2 + (0.0 - 0.1)^2 = 0.02
        assert!((hits[1].distance - 0.02).abs() < 1e-6);
    }

    #[test]
    fn result_length_is_capped_by_store_size() {
        let store = sample_store();
        let hits = store.search(&[0.0, 1.0, 0.0, 0.0], 100).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn distances_are_non_decreasing() {
        let store = sample_store();
        let hits = store.search(&[0.5, 0.5, 0.0, 0.0], 3).unwrap();
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn equal_distances_keep_insertion_order() {
        let store = VectorStore::build(
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            vec!["first".to_string(), "other".to_string(), "last".to_string()],
        )
        .unwrap();

        let hits = store.search(&[0.0, 1.0], 3).unwrap();
        assert_eq!(hits[0].identifier, "first");
        assert_eq!(hits[1].identifier, "last");
        assert_eq!(hits[2].identifier, "other");
    }

    #[test]
    fn k_zero_returns_nothing() {
        let store = sample_store();
        assert!(store.search(&[1.0, 0.0, 0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn duplicate_identifiers_are_independently_retrievable() {
        let store = VectorStore::build(
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec!["dup".to_string(), "dup".to_string()],
        )
        .unwrap();
        let hits = store.search(&[0.5, 0.5], 2).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn build_rejects_empty_dataset() {
        let result = VectorStore::build(vec![], vec![]);
        assert!(matches!(result, Err(VectorStoreError::EmptyDataset)));
    }

    #[test]
    fn build_rejects_length_mismatch() {
        let result = VectorStore::build(vec![vec![1.0, 0.0]], vec!["a".into(), "b".into()]);
        assert!(matches!(
            result,
            Err(VectorStoreError::LengthMismatch {
                embeddings: 1,
                identifiers: 2
            })
        ));
    }

    #[test]
    fn build_rejects_ragged_dimensions() {
        let result = VectorStore::build(
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
            vec!["a".into(), "b".into()],
        );
        assert!(matches!(
            result,
            Err(VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn search_rejects_wrong_query_dimension() {
        let store = sample_store();
        let result = store.search(&[1.0, 0.0], 1);
        assert!(matches!(
            result,
            Err(VectorStoreError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }
}
