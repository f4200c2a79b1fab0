use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::database;
use crate::error::AppError;
use crate::library::{self, DocumentGroup};
use crate::models::{Document, DocumentStatusUpdate, NewDocument};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route("/categories", get(list_by_category))
        .route("/{id}", get(get_document).delete(delete_document))
        .route("/{id}/status", patch(update_status))
}

async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = database::list_documents(&state.pool, &state.default_user).await?;
    Ok(Json(library::search_documents(documents, query.q.as_deref())))
}

async fn list_by_category(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<Vec<DocumentGroup>>, AppError> {
    let documents = database::list_documents(&state.pool, &state.default_user).await?;
    let documents = library::search_documents(documents, query.q.as_deref());
    Ok(Json(library::group_by_category(documents)))
}

#[instrument(skip(state, payload), fields(name = %payload.name))]
async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<NewDocument>,
) -> Result<Json<Document>, AppError> {
    payload.validate()?;
    let document = database::create_document(&state.pool, &state.default_user, payload).await?;
    Ok(Json(document))
}

async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(database::get_document(&state.pool, &id).await?))
}

#[instrument(skip(state, payload))]
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DocumentStatusUpdate>,
) -> Result<Json<Document>, AppError> {
    payload.validate()?;
    let document = database::update_document_status(&state.pool, &id, &payload.status).await?;
    Ok(Json(document))
}

#[instrument(skip(state))]
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    database::delete_document(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
