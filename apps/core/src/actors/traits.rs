use crate::actors::messages::AppError;
use crate::models::{Message, NewMessage};
use async_trait::async_trait;

/// Persistence collaborator used by the session supervisor.
///
/// Abstracts the message store so the supervisor can be driven against
/// SQLite in production and against in-memory or failing stores in tests.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Persists one message and returns the stored row.
    async fn append_message(&self, message: NewMessage) -> Result<Message, AppError>;

    /// Returns a conversation's messages in creation order.
    async fn load_messages(&self, conversation_id: &str) -> Result<Vec<Message>, AppError>;
}
