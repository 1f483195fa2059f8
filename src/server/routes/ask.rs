//! Ask endpoint: match a question against the knowledge base

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /api/ask - Answer a question from the knowledge base
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::Validation("No question provided".to_string()));
    }

    tracing::info!("Ask: \"{}\"", question);

    let outcome = state.engine().ask(question).await?;

    tracing::info!(
        "Ask completed in {}ms (similarity: {:.3})",
        start.elapsed().as_millis(),
        outcome.similarity
    );

    Ok(Json(AskResponse {
        answer: outcome.answer,
        similarity: outcome.similarity,
    }))
}
