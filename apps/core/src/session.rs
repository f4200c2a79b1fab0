//! Conversation Session - ordered message history plus the composing flag.
//!
//! The session is a plain value owned by its caller. `submit` and `resolve`
//! are the only transitions:
//!
//! ```text
//! Idle --submit(text)--> Composing --resolve(turn, answer)--> Idle
//! ```
//!
//! A second submit while composing is rejected with [`SubmitOutcome::Busy`];
//! blank input is ignored without a transition.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::brain::{ComposedAnswer, MessageType, SourceLink, Topic};
use crate::models::Message;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your HOA Governance AI Assistant. I can help you research governance questions, find relevant CC&R sections, and understand Texas Property Code requirements. What would you like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub citations: Vec<String>,
    pub source_links: Vec<SourceLink>,
    pub message_type: Option<MessageType>,
    pub topic: Option<Topic>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.to_string(),
            citations: Vec::new(),
            source_links: Vec::new(),
            message_type: None,
            topic: None,
            created_at: Utc::now(),
        }
    }

    fn assistant(answer: ComposedAnswer) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: answer.body,
            citations: answer.citations,
            source_links: answer.source_links,
            message_type: Some(answer.message_type),
            topic: Some(answer.topic),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a message from its stored row. The topic is not stored, so
    /// restored replies carry none. Rows with an unknown role yield `None`.
    pub fn from_stored(message: Message) -> Option<Self> {
        let role = message.role.parse().ok()?;
        Some(Self {
            id: message.id,
            role,
            content: message.content,
            citations: message.citations.map(|c| c.0).unwrap_or_default(),
            source_links: message.source_links.map(|l| l.0).unwrap_or_default(),
            message_type: message
                .message_type
                .as_deref()
                .and_then(|t| t.parse().ok()),
            topic: None,
            created_at: DateTime::from_timestamp_millis(message.created_at)
                .unwrap_or_else(Utc::now),
        })
    }

    fn welcome() -> Self {
        Self {
            id: "welcome".to_string(),
            role: Role::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            citations: Vec::new(),
            source_links: Vec::new(),
            message_type: None,
            topic: None,
            created_at: Utc::now(),
        }
    }
}

/// Identifies one submitted question within a session
pub type TurnId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Composing { turn: TurnId, question: String },
}

/// A question accepted by `submit`, waiting for its answer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub turn: TurnId,
    pub question: String,
    pub user_message: ChatMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted(PendingTurn),
    /// Blank input: nothing appended, no transition
    Ignored,
    /// A reply is still being composed
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("session is not composing")]
    NotComposing,
    #[error("turn {got} does not match pending turn {expected}")]
    StaleTurn { expected: TurnId, got: TurnId },
}

/// Non-fatal problem surfaced to the user, e.g. a failed save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: String,
    messages: Vec<ChatMessage>,
    state: SessionState,
    next_turn: TurnId,
    notifications: Vec<Notification>,
}

impl ConversationSession {
    /// New idle session seeded with the welcome message
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: vec![ChatMessage::welcome()],
            state: SessionState::Idle,
            next_turn: 1,
            notifications: Vec::new(),
        }
    }

    /// Idle session holding the welcome message followed by `history`
    pub fn restore(id: impl Into<String>, history: Vec<ChatMessage>) -> Self {
        let mut session = Self::new(id);
        session.messages.extend(history);
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, SessionState::Composing { .. })
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Idle -> Composing. The user message is appended before returning.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_composing() {
            return SubmitOutcome::Busy;
        }

        let turn = self.next_turn;
        self.next_turn += 1;

        let user_message = ChatMessage::user(question);
        self.messages.push(user_message.clone());
        self.state = SessionState::Composing {
            turn,
            question: question.to_string(),
        };

        SubmitOutcome::Accepted(PendingTurn {
            turn,
            question: question.to_string(),
            user_message,
        })
    }

    /// Composing -> Idle. Answers for any other turn are rejected untouched.
    pub fn resolve(
        &mut self,
        turn: TurnId,
        answer: ComposedAnswer,
    ) -> Result<&ChatMessage, ResolveError> {
        match &self.state {
            SessionState::Idle => return Err(ResolveError::NotComposing),
            SessionState::Composing { turn: expected, .. } if *expected != turn => {
                return Err(ResolveError::StaleTurn {
                    expected: *expected,
                    got: turn,
                });
            }
            SessionState::Composing { .. } => {}
        }

        self.state = SessionState::Idle;
        self.messages.push(ChatMessage::assistant(answer));
        Ok(&self.messages[self.messages.len() - 1])
    }
}
