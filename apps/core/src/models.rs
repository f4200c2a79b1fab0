use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::brain::SourceLink;
use crate::session::ChatMessage;

/// Mis-encoded section sign found in some imported citation data.
const BROKEN_SECTION_SIGN: &str = "ยง";

/// Replace the mis-encoded section sign with `§`.
pub fn normalize_citation_text(text: &str) -> String {
    text.replace(BROKEN_SECTION_SIGN, "§")
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "user" | "assistant" => Ok(()),
        _ => Err(ValidationError::new("role")),
    }
}

fn validate_document_status(status: &str) -> Result<(), ValidationError> {
    match status {
        "processing" | "ready" | "failed" => Ok(()),
        _ => Err(ValidationError::new("status")),
    }
}

fn validate_citation_type(kind: &str) -> Result<(), ValidationError> {
    match kind {
        "ccr" | "texas-code" | "policy" | "financial" => Ok(()),
        _ => Err(ValidationError::new("type")),
    }
}

/// A research conversation owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// The unique identifier for the conversation (UUID).
    pub id: String,
    /// The owning user.
    pub user_id: String,
    /// The user-defined title.
    pub title: String,
    /// Unix timestamp (ms) of creation.
    pub created_at: i64,
    /// Unix timestamp (ms) of the last rename or message.
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewConversation {
    /// Defaults to the configured stub user when absent.
    #[serde(default)]
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

/// Represents a single persisted message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    /// Citation labels in display order.
    pub citations: Option<Json<Vec<String>>>,
    pub source_links: Option<Json<Vec<SourceLink>>>,
    /// "answer", "warning" or "suggestion" for assistant messages.
    pub message_type: Option<String>,
    /// Unix timestamp (ms).
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Client-side id to keep; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub conversation_id: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
    #[serde(default)]
    pub source_links: Option<Vec<SourceLink>>,
    #[serde(default)]
    pub message_type: Option<String>,
}

impl NewMessage {
    /// Persistable form of an in-memory session message
    pub fn from_chat(conversation_id: &str, message: &ChatMessage) -> Self {
        Self {
            id: Some(message.id.clone()),
            conversation_id: conversation_id.to_string(),
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            citations: (!message.citations.is_empty()).then(|| message.citations.clone()),
            source_links: (!message.source_links.is_empty())
                .then(|| message.source_links.clone()),
            message_type: message.message_type.map(|t| t.as_str().to_string()),
        }
    }
}

/// A governing or reference document in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    /// File type, e.g. "pdf", "docx", "xlsx".
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub doc_type: String,
    pub category: String,
    /// Unix timestamp (ms).
    pub upload_date: i64,
    #[serde(default)]
    pub sections: Option<i64>,
    /// "processing", "ready" or "failed".
    pub status: String,
    /// Opaque object path returned by the upload flow.
    #[serde(default)]
    pub file_url: Option<String>,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 16))]
    pub doc_type: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub sections: Option<i64>,
    #[serde(default)]
    #[validate(custom(function = "validate_document_status"))]
    pub status: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentStatusUpdate {
    #[validate(custom(function = "validate_document_status"))]
    pub status: String,
}

/// A governing-document or statute excerpt shown in the citations panel.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    /// e.g. "CC&Rs", "Texas Property Code".
    pub source: String,
    /// e.g. "Section 4.2", "§209.0052".
    pub section: String,
    pub content: String,
    /// "ccr", "texas-code", "policy" or "financial".
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub citation_type: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCitation {
    #[validate(length(min = 1))]
    pub source: String,
    #[validate(length(min = 1))]
    pub section: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_citation_type"))]
    pub citation_type: String,
}

/// A drafting template. Bodies use `{{field}}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    /// "governance", "financial", "communication" or "research".
    pub category: String,
    pub content: String,
    /// "high", "medium" or "low".
    pub popularity: String,
    pub is_system: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default = "default_popularity")]
    pub popularity: String,
    #[serde(default)]
    pub is_system: bool,
}

fn default_popularity() -> String {
    "medium".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_section_sign() {
        assert_eq!(normalize_citation_text("ยง209.0052"), "§209.0052");
        assert_eq!(normalize_citation_text("§209.0052"), "§209.0052");
    }

    #[test]
    fn test_new_message_validation() {
        let mut message = NewMessage {
            id: None,
            conversation_id: "c1".to_string(),
            role: "user".to_string(),
            content: "hello".to_string(),
            citations: None,
            source_links: None,
            message_type: None,
        };
        assert!(message.validate().is_ok());

        message.role = "system".to_string();
        assert!(message.validate().is_err());

        message.role = "assistant".to_string();
        message.content = String::new();
        assert!(message.validate().is_err());
    }

    #[test]
    fn test_document_status_validation() {
        let update = DocumentStatusUpdate {
            status: "ready".to_string(),
        };
        assert!(update.validate().is_ok());

        let update = DocumentStatusUpdate {
            status: "archived".to_string(),
        };
        assert!(update.validate().is_err());
    }
}
