use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::server::state::AppState;
use crate::uploads::{UploadRequest, UploadTarget};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub object_path: String,
}

pub fn router(max_bytes: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_bytes).unwrap_or(usize::MAX);
    Router::new().route("/", post(request_upload)).route(
        "/{token}",
        put(complete_upload).layer(DefaultBodyLimit::max(body_limit)),
    )
}

/// Serves stored objects at the paths handed out as `objectPath`
pub fn objects_router() -> Router<AppState> {
    Router::new().route("/uploads/{object_id}", get(download_object))
}

async fn request_upload(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadTarget>, AppError> {
    Ok(Json(state.uploads.request_upload(request)?))
}

#[instrument(skip(state, token, body))]
async fn complete_upload(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<Json<StoredObject>, AppError> {
    let object_path = state.uploads.complete_upload(&token, &body).await?;
    Ok(Json(StoredObject { object_path }))
}

async fn download_object(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.uploads.read_object(&object_id).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}
