//! Semantic matching: similarity index and decision policy

pub mod engine;
pub mod index;

pub use engine::{MatchDecision, MatchEngine, FALLBACK_ANSWER, SIMILARITY_THRESHOLD};
pub use index::{cosine_similarity, SimilarityIndex};
