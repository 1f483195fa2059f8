//! API routes for the matching server

pub mod ask;
pub mod learn;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask_question))
        .route("/learn", post(learn::learn_question))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "askbase",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Semantic Q&A matching over a learnable knowledge base",
        "entries": state.engine().entry_count(),
        "endpoints": {
            "POST /api/ask": "Match a question against the knowledge base",
            "POST /api/learn": "Add a question/answer pair",
            "GET /api/info": "Service metadata"
        }
    }))
}
