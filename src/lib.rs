//! askbase: semantic Q&A matching over a learnable knowledge base
//!
//! This crate answers free-text questions by matching them against a small,
//! mutable knowledge base of question/answer pairs using embedding-backed
//! cosine similarity. Entries can be appended at runtime via `learn`; queries
//! that clear the confidence threshold return the stored answer, everything
//! else degrades to a fixed fallback response.

pub mod config;
pub mod error;
pub mod knowledge;
pub mod matching;
pub mod providers;
pub mod server;
pub mod types;

pub use config::MatchConfig;
pub use error::{Error, Result};
pub use matching::{MatchEngine, FALLBACK_ANSWER, SIMILARITY_THRESHOLD};
pub use types::{
    entry::Entry,
    request::{AskRequest, LearnRequest},
    response::{AskResponse, LearnResponse},
};
