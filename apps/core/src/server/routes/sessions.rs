use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::actors::{AskOutcome, SessionSnapshot};
use crate::error::AppError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub text: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_session).delete(close_session))
        .route("/{id}/questions", post(submit_question))
}

/// `202` when accepted, `200` when the text was blank, `409` while busy.
#[instrument(skip(state, request))]
async fn submit_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QuestionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let status = match state.supervisor.ask(id.clone(), request.text).await? {
        AskOutcome::Accepted { .. } => StatusCode::ACCEPTED,
        AskOutcome::Ignored => StatusCode::OK,
        AskOutcome::Busy => {
            return Err(AppError::Conflict(
                "A reply is still being composed for this session".to_string(),
            ))
        }
    };
    let snapshot = state.supervisor.snapshot(id).await?;
    Ok((status, Json(snapshot)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.supervisor.snapshot(id).await?))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.supervisor.close(id.clone()).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", id)))
    }
}
