use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::database;
use crate::error::AppError;
use crate::models::{Conversation, Message, NewConversation, NewMessage};
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RenameConversation {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_conversations).post(create_conversation))
        .route("/{id}", get(get_conversation).patch(rename_conversation))
        .route("/{id}/messages", get(list_messages).post(create_message))
}

async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = database::list_conversations(&state.pool, &state.default_user).await?;
    Ok(Json(conversations))
}

#[instrument(skip(state))]
async fn create_conversation(
    State(state): State<AppState>,
    Json(payload): Json<NewConversation>,
) -> Result<Json<Conversation>, AppError> {
    payload.validate()?;
    let conversation =
        database::create_conversation(&state.pool, &state.default_user, payload).await?;
    Ok(Json(conversation))
}

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, AppError> {
    Ok(Json(database::get_conversation(&state.pool, &id).await?))
}

#[instrument(skip(state))]
async fn rename_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RenameConversation>,
) -> Result<Json<Conversation>, AppError> {
    payload.validate()?;
    let conversation = database::rename_conversation(&state.pool, &id, &payload.title).await?;
    Ok(Json(conversation))
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    database::get_conversation(&state.pool, &id).await?;
    Ok(Json(database::list_messages(&state.pool, &id).await?))
}

#[instrument(skip(state, payload))]
async fn create_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<NewMessage>,
) -> Result<Json<Message>, AppError> {
    payload.conversation_id = id;
    payload.validate()?;
    database::get_conversation(&state.pool, &payload.conversation_id).await?;
    Ok(Json(database::create_message(&state.pool, payload).await?))
}
