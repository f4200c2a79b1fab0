use std::io;
use thiserror::Error;

/// Every failure the assistant backend can report.
///
/// The question/answer path itself (classification, composition, source
/// search and session transitions) never produces one of these. They come
/// from collaborators: the SQLite store, the upload storage, the session
/// supervisor mailbox and startup configuration.
#[derive(Debug, Error)]
pub enum AppError {
    /// SQLite failure reported by `sqlx`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure in the data directory or object storage.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The session supervisor could not be reached or dropped a reply.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Rejected input, such as a blank chat message or an unknown status.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad `HOA_*` environment value or logger setup failure.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A session already composing, or an upload target used twice.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No upload target could be issued, or the uploaded bytes were refused.
    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A supervisor reply or delayed answer did not arrive in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl AppError {
    /// True for failures caused by the caller rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NotFound(_)
                | AppError::Conflict(_)
                | AppError::Upload(_)
        )
    }
}

// sqlx and io errors are not Clone; carry their message across instead.
impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Database(e) => AppError::Database(sqlx::Error::Protocol(e.to_string())),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Validation(msg) => AppError::Validation(msg.clone()),
            AppError::Config(msg) => AppError::Config(msg.clone()),
            AppError::NotFound(msg) => AppError::NotFound(msg.clone()),
            AppError::Conflict(msg) => AppError::Conflict(msg.clone()),
            AppError::Upload(msg) => AppError::Upload(msg.clone()),
            AppError::Internal(msg) => AppError::Internal(msg.clone()),
            AppError::Timeout(msg) => AppError::Timeout(msg.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Malformed JSON: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Upload(format!("Could not build upload URL: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("Malformed identifier: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_keeps_message() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        let cloned = err.clone();
        assert!(matches!(cloned, AppError::Database(_)));
        assert!(cloned.to_string().contains("no rows returned"));
    }

    #[test]
    fn test_client_errors() {
        assert!(AppError::Conflict("busy".into()).is_client_error());
        assert!(AppError::Upload("too large".into()).is_client_error());
        assert!(!AppError::Internal("bug".into()).is_client_error());
        assert!(!AppError::Timeout("slow".into()).is_client_error());
    }

    #[test]
    fn test_url_error_is_upload_error() {
        let err: AppError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, AppError::Upload(_)));
    }
}
