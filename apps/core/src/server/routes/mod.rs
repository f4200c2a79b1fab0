pub mod answers;
pub mod chat;
pub mod citations;
pub mod conversations;
pub mod documents;
pub mod sessions;
pub mod sources;
pub mod templates;
pub mod uploads;

use axum::Router;

use crate::server::state::AppState;

pub fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/answers", answers::router())
        .nest("/chat", chat::router())
        .nest("/citations", citations::router())
        .nest("/conversations", conversations::router())
        .nest("/documents", documents::router())
        .nest("/sessions", sessions::router())
        .nest("/sources", sources::router())
        .nest("/templates", templates::router())
        .nest("/uploads", uploads::router(state.uploads.max_bytes()))
}
