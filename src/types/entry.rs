//! Knowledge base entry

use serde::{Deserialize, Serialize};

/// A learned question/answer pair.
///
/// Entries are immutable once created and carry no explicit id; an entry is
/// identified by its position in the knowledge base's insertion-ordered
/// sequence, which is also the join key into the embedding matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub question: String,
    pub answer: String,
}

impl Entry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
