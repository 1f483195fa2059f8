//! Learn endpoint: append a question/answer pair at runtime

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{LearnRequest, LearnResponse};

/// POST /api/learn - Add a new question/answer pair to the knowledge base
pub async fn learn_question(
    State(state): State<AppState>,
    Json(request): Json<LearnRequest>,
) -> Result<Json<LearnResponse>> {
    let question = request.question.trim();
    let answer = request.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(Error::Validation(
            "Both question and answer are required".to_string(),
        ));
    }

    tracing::info!("Learn: \"{}\"", question);

    state.engine().learn(question, answer).await?;

    Ok(Json(LearnResponse {
        message: "New knowledge added successfully!".to_string(),
    }))
}
