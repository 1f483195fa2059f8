//! Matching server binary
//!
//! Run with: cargo run --bin askbase-server

use std::path::PathBuf;

use askbase::{config::MatchConfig, server::MatchServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askbase=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::var("ASKBASE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("askbase.toml"));
    let config = MatchConfig::load(&config_path)?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - Knowledge base: {}", config.storage.knowledge_path.display());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.embeddings.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.embeddings.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.embeddings.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Install: https://ollama.com/download");
            tracing::warn!("  2. Start: ollama serve");
            tracing::warn!("  3. Pull the embedding model: ollama pull nomic-embed-text");
        }
    }

    // Create and start server
    let server = MatchServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ask   - Ask a question");
    println!("  POST /api/learn - Teach a new answer");
    println!("  GET  /api/info  - Service metadata");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
