//! Configuration for the matching service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl MatchConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file is
    /// a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&data)
            .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            timeout_secs: 30,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the knowledge base file
    pub knowledge_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let knowledge_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("askbase")
            .join("knowledge_base.json");

        Self { knowledge_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = MatchConfig::load(Path::new("/nonexistent/askbase.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.embeddings.model, "nomic-embed-text");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("askbase.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 8080\nenable_cors = false\n").unwrap();

        let config = MatchConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.enable_cors);
        assert_eq!(config.embeddings.dimensions, 768);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("askbase.toml");
        std::fs::write(&path, "server = not toml").unwrap();

        assert!(MatchConfig::load(&path).is_err());
    }
}
