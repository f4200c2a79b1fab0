use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::server::state::AppState;
use crate::session::ChatMessage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// The assistant message plus the conversation it belongs to, so a caller
/// that let the server pick an id can continue the conversation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub conversation_id: String,
    #[serde(flatten)]
    pub message: ChatMessage,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

/// Ask in the conversation's session and wait out the presentation delay
#[instrument(skip(state, request), fields(conversation_id = ?request.conversation_id))]
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    let conversation_id = request
        .conversation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let message = state
        .supervisor
        .ask_and_wait(conversation_id.clone(), request.message)
        .await?;
    Ok(Json(ChatResponse {
        conversation_id,
        message,
    }))
}
