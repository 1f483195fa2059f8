//! Request types for the ask/learn endpoints

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/ask`
///
/// A missing `question` field deserializes to an empty string and is rejected
/// by validation, so both absent and empty input produce the same client
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Request body for `POST /api/learn`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}
