use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::brain::SourceEntry;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SourceQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_sources))
}

async fn search_sources(
    State(state): State<AppState>,
    Query(query): Query<SourceQuery>,
) -> Json<Vec<SourceEntry>> {
    let limit = query.limit.unwrap_or_else(|| state.composer.link_limit());
    let entries = state
        .composer
        .directory()
        .search(&query.q, limit)
        .copied()
        .collect();
    Json(entries)
}
