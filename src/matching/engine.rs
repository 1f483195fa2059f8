//! Match engine: snapshot state, decision policy, ask/learn
//!
//! The engine holds the knowledge base and its similarity index as a single
//! atomically-swapped snapshot. Readers (`ask`) grab the current snapshot
//! once and run lock-free against it; writers (`learn`) serialize on a write
//! section around compute, persist, and publish, so no reader ever observes
//! an entry sequence and an index of different lengths.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::knowledge::KnowledgeStore;
use crate::matching::index::SimilarityIndex;
use crate::providers::EmbeddingProvider;
use crate::types::Entry;

/// Minimum cosine similarity required to accept a match.
///
/// The single most important tunable in the system: scores at or above this
/// value return the stored answer, everything below falls back.
pub const SIMILARITY_THRESHOLD: f32 = 0.70;

/// Answer returned when no entry clears the threshold
pub const FALLBACK_ANSWER: &str = "Sorry, I didn't understand that.";

/// Outcome of the decision policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchDecision {
    /// The entry at `index` matched with the given score
    Accept { index: usize, score: f32 },
    /// No entry cleared the threshold
    Reject,
}

/// Turn a nearest-neighbor result into an accept-or-reject decision.
///
/// Accepts iff an index is present and the score clears
/// [`SIMILARITY_THRESHOLD`] (inclusive).
pub fn decide(index: Option<usize>, score: f32) -> MatchDecision {
    match index {
        Some(index) if score >= SIMILARITY_THRESHOLD => MatchDecision::Accept { index, score },
        _ => MatchDecision::Reject,
    }
}

/// Result of an `ask` call
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub answer: String,
    pub similarity: f32,
}

/// A consistent (entries, index) pair, published together.
///
/// Invariant: `index.len() == entries.len()`.
struct Snapshot {
    entries: Vec<Entry>,
    index: SimilarityIndex,
}

/// Semantic matching engine over a learnable knowledge base
pub struct MatchEngine {
    store: KnowledgeStore,
    embedder: Arc<dyn EmbeddingProvider>,
    snapshot: RwLock<Arc<Snapshot>>,
    /// Serializes `learn` calls around compute -> persist -> publish
    write_lock: Mutex<()>,
}

impl MatchEngine {
    /// Load the knowledge base and build the similarity index.
    ///
    /// A missing or corrupt knowledge file starts the engine empty rather
    /// than failing; an unreachable embedder with a non-empty knowledge base
    /// is an error, since the index cannot be built.
    pub async fn new(store: KnowledgeStore, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let entries = store.load();
        let index = SimilarityIndex::rebuild(&entries, embedder.as_ref()).await?;
        tracing::info!(
            "Match engine ready ({} entries, {} embedder)",
            entries.len(),
            embedder.name()
        );

        Ok(Self {
            store,
            embedder,
            snapshot: RwLock::new(Arc::new(Snapshot { entries, index })),
            write_lock: Mutex::new(()),
        })
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Number of entries in the current knowledge base
    pub fn entry_count(&self) -> usize {
        self.current().entries.len()
    }

    /// Whether the embedding provider is reachable
    pub async fn embedder_healthy(&self) -> bool {
        self.embedder.health_check().await.unwrap_or(false)
    }

    /// Match a question against the knowledge base.
    ///
    /// Returns the stored answer of the best match when it clears the
    /// threshold, otherwise the fallback answer with similarity 0. Empty
    /// input is a caller error and never enters the matching pipeline.
    pub async fn ask(&self, text: &str) -> Result<AskOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("No question provided".to_string()));
        }

        let snapshot = self.current();
        if snapshot.entries.is_empty() {
            return Ok(AskOutcome {
                answer: FALLBACK_ANSWER.to_string(),
                similarity: 0.0,
            });
        }

        let query_embedding = self.embedder.embed(text).await?;
        let (index, score) = snapshot.index.nearest(&query_embedding);

        match decide(index, score) {
            MatchDecision::Accept { index, score } => {
                tracing::debug!("Matched entry {} with similarity {:.3}", index, score);
                Ok(AskOutcome {
                    answer: snapshot.entries[index].answer.clone(),
                    similarity: score,
                })
            }
            MatchDecision::Reject => {
                tracing::debug!("No match above threshold (best: {:.3})", score);
                Ok(AskOutcome {
                    answer: FALLBACK_ANSWER.to_string(),
                    similarity: 0.0,
                })
            }
        }
    }

    /// Append a question/answer pair to the knowledge base.
    ///
    /// Under the write section: encode the new question, persist the
    /// extended knowledge base, then publish the new snapshot. If the
    /// durable write fails the in-memory state is not advanced, so the
    /// store and the index never diverge.
    pub async fn learn(&self, question: &str, answer: &str) -> Result<()> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(Error::Validation(
                "Both question and answer are required".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;

        // Encode before touching durable state; an embedder failure leaves
        // everything unchanged.
        let embedding = self.embedder.embed(question).await?;

        let snapshot = self.current();
        let entries = self
            .store
            .append(&snapshot.entries, question.to_string(), answer.to_string())?;
        let index = snapshot.index.with_row(embedding);

        // Durable write succeeded; publish entries and index together.
        *self.snapshot.write() = Arc::new(Snapshot { entries, index });

        tracing::info!(
            "Learned new entry (knowledge base now {} entries)",
            self.entry_count()
        );
        Ok(())
    }
}

#[cfg(test)]
impl MatchEngine {
    fn snapshot_sizes(&self) -> (usize, usize) {
        let snapshot = self.current();
        (snapshot.entries.len(), snapshot.index.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    const STUB_DIMS: usize = 64;

    /// Deterministic embedder for tests: each distinct text is assigned its
    /// own basis vector, so identical texts have cosine similarity 1.0 and
    /// distinct texts 0.0.
    struct StubEmbedder {
        assigned: StdMutex<HashMap<String, usize>>,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self {
                assigned: StdMutex::new(HashMap::new()),
            }
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            let mut assigned = self.assigned.lock().unwrap();
            let next = assigned.len();
            let slot = *assigned.entry(text.to_string()).or_insert(next);
            let mut v = vec![0.0; STUB_DIMS];
            v[slot % STUB_DIMS] = 1.0;
            v
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(self.vector_for(text))
        }

        fn dimensions(&self) -> usize {
            STUB_DIMS
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    async fn engine_in(dir: &tempfile::TempDir) -> MatchEngine {
        let store = KnowledgeStore::new(dir.path().join("knowledge_base.json"));
        MatchEngine::new(store, Arc::new(StubEmbedder::new()))
            .await
            .unwrap()
    }

    #[test]
    fn decide_accepts_exact_threshold() {
        let decision = decide(Some(2), SIMILARITY_THRESHOLD);
        assert_eq!(
            decision,
            MatchDecision::Accept {
                index: 2,
                score: SIMILARITY_THRESHOLD
            }
        );
    }

    #[test]
    fn decide_rejects_just_below_threshold() {
        assert_eq!(decide(Some(0), 0.6999), MatchDecision::Reject);
    }

    #[test]
    fn decide_rejects_absent_index() {
        assert_eq!(decide(None, 0.99), MatchDecision::Reject);
    }

    #[tokio::test]
    async fn empty_base_returns_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(&dir).await;

        let outcome = engine.ask("anything at all").await.unwrap();
        assert_eq!(outcome.answer, FALLBACK_ANSWER);
        assert_eq!(outcome.similarity, 0.0);
    }

    #[tokio::test]
    async fn learn_then_ask_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(&dir).await;

        engine
            .learn("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let outcome = engine.ask("What is Rust?").await.unwrap();
        assert_eq!(outcome.answer, "A systems language.");
        assert!(outcome.similarity >= SIMILARITY_THRESHOLD);
    }

    #[tokio::test]
    async fn unrelated_question_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(&dir).await;

        engine
            .learn("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let outcome = engine.ask("How do I bake bread?").await.unwrap();
        assert_eq!(outcome.answer, FALLBACK_ANSWER);
        assert_eq!(outcome.similarity, 0.0);
    }

    #[tokio::test]
    async fn ask_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(&dir).await;

        engine.learn("What is Rust?", "A systems language.").await.unwrap();

        let first = engine.ask("What is Rust?").await.unwrap();
        let second = engine.ask("What is Rust?").await.unwrap();
        assert_eq!(first.answer, second.answer);
        assert_eq!(first.similarity, second.similarity);
    }

    #[tokio::test]
    async fn growth_is_monotonic_and_aligned() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(&dir).await;

        for i in 0..5 {
            engine
                .learn(&format!("question {}", i), &format!("answer {}", i))
                .await
                .unwrap();
            let (entries, rows) = engine.snapshot_sizes();
            assert_eq!(entries, i + 1);
            assert_eq!(rows, entries);
        }
    }

    #[tokio::test]
    async fn rejects_empty_inputs_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(&dir).await;

        assert!(matches!(
            engine.ask("   ").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            engine.learn("", "answer").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            engine.learn("question", "  ").await,
            Err(Error::Validation(_))
        ));
        assert_eq!(engine.entry_count(), 0);
    }

    #[tokio::test]
    async fn failed_persist_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // The store's parent "directory" is a plain file, so the durable
        // write must fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = KnowledgeStore::new(blocker.join("knowledge_base.json"));
        let engine = MatchEngine::new(store, Arc::new(StubEmbedder::new()))
            .await
            .unwrap();

        let result = engine.learn("What is Rust?", "A systems language.").await;
        assert!(matches!(result, Err(Error::Storage(_))));
        assert_eq!(engine.entry_count(), 0);

        let outcome = engine.ask("What is Rust?").await.unwrap();
        assert_eq!(outcome.answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let engine = engine_in(&dir).await;
            engine.learn("What is Rust?", "A systems language.").await.unwrap();
        }

        let engine = engine_in(&dir).await;
        assert_eq!(engine.entry_count(), 1);
        let outcome = engine.ask("What is Rust?").await.unwrap();
        assert_eq!(outcome.answer, "A systems language.");
        assert!(outcome.similarity >= SIMILARITY_THRESHOLD);
    }

    #[tokio::test]
    async fn concurrent_learns_then_asks() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(engine_in(&dir).await);

        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine
                    .learn(&format!("question {}", i), &format!("answer {}", i))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let (entries, rows) = engine.snapshot_sizes();
        assert_eq!(entries, 8);
        assert_eq!(rows, 8);

        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                let outcome = engine.ask(&format!("question {}", i)).await.unwrap();
                (i, outcome)
            }));
        }
        for handle in handles {
            let (i, outcome) = handle.await.unwrap();
            assert_eq!(outcome.answer, format!("answer {}", i));
            assert!(outcome.similarity >= SIMILARITY_THRESHOLD);
        }
    }
}
