use axum::{extract::State, routing::get, Json, Router};
use validator::Validate;

use crate::database;
use crate::error::AppError;
use crate::models::{Citation, NewCitation};
use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_citations).post(create_citation))
}

async fn list_citations(State(state): State<AppState>) -> Result<Json<Vec<Citation>>, AppError> {
    Ok(Json(database::list_citations(&state.pool).await?))
}

async fn create_citation(
    State(state): State<AppState>,
    Json(payload): Json<NewCitation>,
) -> Result<Json<Citation>, AppError> {
    payload.validate()?;
    Ok(Json(database::create_citation(&state.pool, payload).await?))
}
