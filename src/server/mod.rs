//! HTTP server for the matching service

pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::MatchConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeStore;
use crate::matching::MatchEngine;
use crate::providers::{EmbeddingProvider, OllamaEmbedder};
use state::AppState;

/// Matching HTTP server
pub struct MatchServer {
    config: MatchConfig,
    state: AppState,
}

impl MatchServer {
    /// Create a new server: wires up the embedder, the knowledge store, and
    /// the match engine from configuration.
    pub async fn new(config: MatchConfig) -> Result<Self> {
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(OllamaEmbedder::new(&config.embeddings)?);
        let store = KnowledgeStore::new(config.storage.knowledge_path.clone());
        let engine = MatchEngine::new(store, embedder).await?;

        Ok(Self {
            config,
            state: AppState::new(engine),
        })
    }

    /// Build the router with all routes
    fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(home))
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes())
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| crate::error::Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting matching server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Home endpoint: fixed liveness string, no state touched
async fn home() -> &'static str {
    "askbase is running"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check: verifies the embedding provider is reachable
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.engine().embedder_healthy().await {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}
