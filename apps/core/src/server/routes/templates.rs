use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;
use validator::Validate;

use crate::database;
use crate::drafting::{self, Draft, TEMPLATE_CATEGORIES};
use crate::error::AppError;
use crate::models::{NewTemplate, Template};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DraftRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// A template with the fields a draft will ask for
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: Template,
    pub placeholders: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/{id}", get(get_template))
        .route("/{id}/draft", post(draft))
}

async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<Vec<Template>>, AppError> {
    if let Some(category) = &query.category {
        if !TEMPLATE_CATEGORIES.contains(&category.to_lowercase().as_str()) {
            return Err(AppError::Validation(format!(
                "Unknown template category: {}",
                category
            )));
        }
    }

    let templates = database::list_templates(&state.pool).await?;
    let filtered = drafting::filter_templates(&templates, query.q.as_deref(), query.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TemplateDetail>, AppError> {
    let template = database::get_template(&state.pool, &id).await?;
    let placeholders = drafting::placeholders(&template.content);
    Ok(Json(TemplateDetail {
        template,
        placeholders,
    }))
}

#[instrument(skip(state, payload), fields(name = %payload.name))]
async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<NewTemplate>,
) -> Result<Json<Template>, AppError> {
    payload.validate()?;
    Ok(Json(database::create_template(&state.pool, payload).await?))
}

#[instrument(skip(state, request))]
async fn draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<Draft>, AppError> {
    let template = database::get_template(&state.pool, &id).await?;
    Ok(Json(drafting::render_draft(&template, &request.values)))
}
