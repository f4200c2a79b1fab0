use serde::Serialize;
use tokio::sync::oneshot;

use crate::brain::ComposedAnswer;
use crate::session::{ChatMessage, Notification, SessionState, TurnId};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// A generic internal error within an actor, usually a closed mailbox.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// The session was closed while a reply was pending.
    #[error("Session closed: {0}")]
    SessionClosed(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Result of asking a question in a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AskOutcome {
    /// The user message was appended and a reply is scheduled.
    #[serde(rename_all = "camelCase")]
    Accepted {
        turn: TurnId,
        user_message: ChatMessage,
    },
    /// Blank input, nothing happened.
    Ignored,
    /// A reply for an earlier question is still pending.
    Busy,
}

/// Point-in-time copy of a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: SessionState,
    pub messages: Vec<ChatMessage>,
    pub notifications: Vec<Notification>,
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Submit a question to a session, creating the session if needed.
    Ask {
        session_id: String,
        text: String,
        /// Receives the assistant message once it is appended.
        reply: Option<oneshot::Sender<Result<ChatMessage, AppError>>>,
        /// Receives the submit outcome immediately.
        responder: oneshot::Sender<Result<AskOutcome, AppError>>,
    },
    /// Copy of an open session. Never opens one.
    Snapshot {
        session_id: String,
        responder: oneshot::Sender<Result<SessionSnapshot, AppError>>,
    },
    /// Tear down a session and cancel its pending reply.
    /// Responds with whether the session existed.
    Close {
        session_id: String,
        responder: oneshot::Sender<Result<bool, AppError>>,
    },
    /// A command to shut down the supervisor.
    Shutdown,
}

/// Internal message posted by a delayed reply task
#[derive(Debug)]
pub(crate) struct AnswerReady {
    pub session_id: String,
    /// Which opening of the session scheduled the answer
    pub generation: u64,
    pub turn: TurnId,
    pub answer: ComposedAnswer,
}
