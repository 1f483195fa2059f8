//! JSON-file knowledge store
//!
//! Owns the authoritative, durable sequence of question/answer entries.
//! Reads degrade to an empty knowledge base on any failure; writes are
//! atomic and surface failures to the caller.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::types::Entry;

/// On-disk shape: `{ "questions": [ { "question", "answer" }, ... ] }`
#[derive(Serialize)]
struct KnowledgeFile<'a> {
    questions: &'a [Entry],
}

/// Knowledge store that persists learned Q&A pairs to a single JSON file
pub struct KnowledgeStore {
    storage_path: PathBuf,
}

impl KnowledgeStore {
    /// Create a store backed by the given file path
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Load the knowledge base from disk.
    ///
    /// Never fails: a missing file, undecodable content, or a document
    /// without the expected shape all yield an empty knowledge base so the
    /// service starts in a usable state. Entries with missing or empty
    /// fields are logged and dropped rather than silently miscounted.
    pub fn load(&self) -> Vec<Entry> {
        let data = match fs::read_to_string(&self.storage_path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Knowledge file {} not found, starting empty",
                    self.storage_path.display()
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read knowledge file {}: {}",
                    self.storage_path.display(),
                    e
                );
                return Vec::new();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not decode knowledge file, starting empty: {}", e);
                return Vec::new();
            }
        };

        let Some(items) = value.get("questions").and_then(|q| q.as_array()) else {
            tracing::warn!("Knowledge file has no \"questions\" array, starting empty");
            return Vec::new();
        };

        let mut entries = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            match serde_json::from_value::<Entry>(item.clone()) {
                Ok(entry) if !entry.question.trim().is_empty() && !entry.answer.trim().is_empty() => {
                    entries.push(entry);
                }
                Ok(_) => {
                    tracing::warn!("Dropping entry {} with empty question or answer", position);
                }
                Err(e) => {
                    tracing::warn!("Dropping malformed entry {}: {}", position, e);
                }
            }
        }

        tracing::info!("Loaded {} entries from knowledge store", entries.len());
        entries
    }

    /// Append one entry to the given sequence and persist the result.
    ///
    /// Returns the updated sequence. The durable write happens before the
    /// caller can observe the new sequence, so an accepted append is always
    /// on disk.
    pub fn append(&self, current: &[Entry], question: String, answer: String) -> Result<Vec<Entry>> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return Err(Error::Validation(
                "Both question and answer are required".to_string(),
            ));
        }

        let mut entries = current.to_vec();
        entries.push(Entry { question, answer });
        self.persist(&entries)?;
        Ok(entries)
    }

    /// Write the full knowledge base to disk, replacing prior content.
    ///
    /// Writes to a temporary file in the target directory and renames it
    /// over the store, so a concurrent `load` never observes a half-written
    /// file. Failure is a hard error: an entry accepted by `learn` but not
    /// durably saved would silently regress on restart.
    pub fn persist(&self, entries: &[Entry]) -> Result<()> {
        let data = serde_json::to_string_pretty(&KnowledgeFile { questions: entries })
            .map_err(|e| Error::Storage(format!("failed to serialize knowledge base: {}", e)))?;

        let dir = match self.storage_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("failed to create {}: {}", parent.display(), e))
                })?;
                parent.to_path_buf()
            }
            _ => PathBuf::from("."),
        };

        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| Error::Storage(format!("failed to create temp file: {}", e)))?;
        tmp.write_all(data.as_bytes())
            .map_err(|e| Error::Storage(format!("failed to write knowledge base: {}", e)))?;
        tmp.persist(&self.storage_path).map_err(|e| {
            Error::Storage(format!(
                "failed to replace {}: {}",
                self.storage_path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> KnowledgeStore {
        KnowledgeStore::new(dir.path().join("knowledge_base.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json at all {{{").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"items": [1, 2, 3]}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"questions": [
                {"question": "What is Rust?", "answer": "A systems language."},
                {"question": "missing answer"},
                {"question": "", "answer": "empty question"},
                42
            ]}"#,
        )
        .unwrap();

        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "What is Rust?");
    }

    #[test]
    fn append_persists_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let entries = store
            .append(&[], "What is Rust?".to_string(), "A systems language.".to_string())
            .unwrap();
        assert_eq!(entries.len(), 1);

        let entries = store
            .append(&entries, "What is cargo?".to_string(), "The build tool.".to_string())
            .unwrap();
        assert_eq!(entries.len(), 2);

        let reloaded = store.load();
        assert_eq!(reloaded, entries);
    }

    #[test]
    fn persisted_file_has_questions_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .append(&[], "q".to_string(), "a".to_string())
            .unwrap();

        let data = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        let questions = value.get("questions").and_then(|q| q.as_array()).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0]["question"], "q");
        assert_eq!(questions[0]["answer"], "a");
    }

    #[test]
    fn append_rejects_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.append(&[], "".to_string(), "a".to_string()).is_err());
        assert!(store.append(&[], "q".to_string(), "  ".to_string()).is_err());
        assert!(store.load().is_empty());
    }
}
