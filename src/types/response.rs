//! Response types for the ask/learn endpoints

use serde::{Deserialize, Serialize};

/// Response body for `POST /api/ask`
///
/// Always well-formed: a query with no confident match carries the fallback
/// answer and similarity 0 rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Stored answer of the best match, or the fallback answer
    pub answer: String,
    /// Cosine similarity of the accepted match (0.0 on reject)
    pub similarity: f32,
}

/// Response body for `POST /api/learn`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnResponse {
    pub message: String,
}
