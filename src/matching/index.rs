//! In-memory similarity index over question embeddings
//!
//! The index holds one embedding per knowledge base entry, index-aligned
//! with the entry sequence. It is derived state: recomputed from the
//! entries at startup and extended by one row per learned entry, never
//! persisted.

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::types::Entry;

/// Ordered embeddings, one row per knowledge base entry
pub type EmbeddingMatrix = Vec<Vec<f32>>;

/// Cosine similarity between two vectors.
///
/// A zero-magnitude vector or a length mismatch scores 0.0 rather than
/// dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Index of question embeddings for nearest-neighbor search
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    matrix: EmbeddingMatrix,
}

impl SimilarityIndex {
    /// An index with no rows, matching an empty knowledge base
    pub fn empty() -> Self {
        Self { matrix: Vec::new() }
    }

    /// Build an index directly from precomputed rows
    pub fn from_rows(matrix: EmbeddingMatrix) -> Self {
        Self { matrix }
    }

    /// Encode every question in order, producing an index aligned with the
    /// entry sequence. An empty knowledge base yields an empty index, not an
    /// error.
    pub async fn rebuild(entries: &[Entry], embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if entries.is_empty() {
            return Ok(Self::empty());
        }

        let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();
        let matrix = embedder.embed_batch(&questions).await?;
        Ok(Self { matrix })
    }

    /// A new index with one additional row appended.
    ///
    /// Used when a single entry is learned: the existing rows are reused
    /// rather than re-encoded, and the previous index stays intact for
    /// readers still holding the prior snapshot.
    pub fn with_row(&self, embedding: Vec<f32>) -> Self {
        let mut matrix = self.matrix.clone();
        matrix.push(embedding);
        Self { matrix }
    }

    /// Index and score of the row most similar to the query.
    ///
    /// Returns `(None, 0.0)` immediately when the index is empty. Ties
    /// resolve to the lowest index (first inserted), so results are
    /// deterministic.
    pub fn nearest(&self, query_embedding: &[f32]) -> (Option<usize>, f32) {
        let mut best: Option<usize> = None;
        let mut best_score = 0.0f32;

        for (idx, row) in self.matrix.iter().enumerate() {
            let score = cosine_similarity(query_embedding, row);
            if best.is_none() || score > best_score {
                best = Some(idx);
                best_score = score;
            }
        }

        (best, best_score)
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}
