use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

use crate::actors::SupervisorHandle;
use crate::brain::ResponseComposer;
use crate::uploads::UploadService;

/// Shared application state accessible from all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Owns the live question/answer sessions
    pub supervisor: SupervisorHandle,
    /// Used directly by the stateless answer and source-search routes
    pub composer: Arc<ResponseComposer>,
    pub uploads: Arc<UploadService>,
    /// Stub user id until authentication exists
    pub default_user: Arc<str>,
}
