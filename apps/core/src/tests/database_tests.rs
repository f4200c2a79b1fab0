//! Database Module Tests
//!
//! CRUD over conversations, messages, documents, citations and templates
//! against a throwaway SQLite file.

use crate::actors::ConversationStore;
use crate::brain::SourceLink;
use crate::database::{self, SqliteConversationStore};
use crate::error::AppError;
use crate::models::{NewCitation, NewConversation, NewDocument, NewMessage, NewTemplate};
use sqlx::sqlite::SqlitePool;
use tempfile::{tempdir, TempDir};

/// Create a test database pool with a temporary file
async fn create_test_pool() -> (SqlitePool, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.sqlite");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = database::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

fn new_conversation(title: &str) -> NewConversation {
    NewConversation {
        user_id: None,
        title: title.to_string(),
    }
}

fn new_message(conversation_id: &str, role: &str, content: &str) -> NewMessage {
    NewMessage {
        id: None,
        conversation_id: conversation_id.to_string(),
        role: role.to_string(),
        content: content.to_string(),
        citations: None,
        source_links: None,
        message_type: None,
    }
}

fn new_document(name: &str) -> NewDocument {
    NewDocument {
        name: name.to_string(),
        doc_type: "pdf".to_string(),
        category: "governing".to_string(),
        sections: Some(12),
        status: None,
        file_url: Some("/objects/uploads/abc".to_string()),
        user_id: None,
    }
}

#[cfg(test)]
mod conversation_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_conversation() {
        let (pool, _dir) = create_test_pool().await;

        let created = database::create_conversation(&pool, "demo-user", new_conversation("Parking"))
            .await
            .expect("Failed to create conversation");
        assert_eq!(created.user_id, "demo-user");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = database::get_conversation(&pool, &created.id).await.unwrap();
        assert_eq!(fetched.title, "Parking");
    }

    #[tokio::test]
    async fn test_get_missing_conversation() {
        let (pool, _dir) = create_test_pool().await;

        let result = database::get_conversation(&pool, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_is_per_user_and_recent_first() {
        let (pool, _dir) = create_test_pool().await;

        let first = database::create_conversation(&pool, "demo-user", new_conversation("First"))
            .await
            .unwrap();
        database::create_conversation(&pool, "demo-user", new_conversation("Second"))
            .await
            .unwrap();
        database::create_conversation(&pool, "other-user", new_conversation("Hidden"))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        database::rename_conversation(&pool, &first.id, "First, renamed")
            .await
            .unwrap();

        let listed = database::list_conversations(&pool, "demo-user").await.unwrap();
        let titles: Vec<_> = listed.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["First, renamed", "Second"]);
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;

    #[tokio::test]
    async fn test_messages_in_creation_order() {
        let (pool, _dir) = create_test_pool().await;
        let conversation = database::create_conversation(&pool, "demo-user", new_conversation("Chat"))
            .await
            .unwrap();

        for i in 0..5 {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            database::create_message(&pool, new_message(&conversation.id, role, &format!("m{}", i)))
                .await
                .unwrap();
        }

        let messages = database::list_messages(&pool, &conversation.id).await.unwrap();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_message_json_columns_round_trip() {
        let (pool, _dir) = create_test_pool().await;
        let conversation = database::create_conversation(&pool, "demo-user", new_conversation("Chat"))
            .await
            .unwrap();

        let mut message = new_message(&conversation.id, "assistant", "See the code.");
        message.citations = Some(vec!["Texas Property Code ยง209.006".to_string()]);
        message.source_links = Some(vec![SourceLink::new("Chapter 209", "https://example.org/209")]);
        message.message_type = Some("answer".to_string());

        let stored = database::create_message(&pool, message).await.unwrap();
        let citations = stored.citations.expect("citations stored").0;
        assert_eq!(citations, vec!["Texas Property Code §209.006".to_string()]);
        assert_eq!(stored.source_links.expect("links stored").0[0].name, "Chapter 209");
        assert_eq!(stored.message_type.as_deref(), Some("answer"));
    }

    #[tokio::test]
    async fn test_message_bumps_conversation() {
        let (pool, _dir) = create_test_pool().await;
        let conversation = database::create_conversation(&pool, "demo-user", new_conversation("Chat"))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let message = database::create_message(&pool, new_message(&conversation.id, "user", "hi"))
            .await
            .unwrap();

        let updated = database::get_conversation(&pool, &conversation.id).await.unwrap();
        assert_eq!(updated.updated_at, message.created_at);
        assert!(updated.updated_at > conversation.updated_at);
    }

    #[tokio::test]
    async fn test_message_requires_conversation() {
        let (pool, _dir) = create_test_pool().await;

        let result = database::create_message(&pool, new_message("missing", "user", "hi")).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_sqlite_store_creates_conversation() {
        let (pool, _dir) = create_test_pool().await;
        let store = SqliteConversationStore::new(pool.clone(), "demo-user");

        store
            .append_message(new_message("session-1", "user", "emergency meeting?"))
            .await
            .unwrap();
        store
            .append_message(new_message("session-1", "assistant", "72 hours"))
            .await
            .unwrap();

        let conversation = database::get_conversation(&pool, "session-1").await.unwrap();
        assert_eq!(conversation.title, database::DEFAULT_CONVERSATION_TITLE);
        assert_eq!(store.load_messages("session-1").await.unwrap().len(), 2);
    }
}

#[cfg(test)]
mod document_tests {
    use super::*;

    #[tokio::test]
    async fn test_document_lifecycle() {
        let (pool, _dir) = create_test_pool().await;

        let document = database::create_document(&pool, "demo-user", new_document("CC&Rs.pdf"))
            .await
            .unwrap();
        assert_eq!(document.status, "processing");
        assert_eq!(document.sections, Some(12));

        let ready = database::update_document_status(&pool, &document.id, "ready")
            .await
            .unwrap();
        assert_eq!(ready.status, "ready");

        let listed = database::list_documents(&pool, "demo-user").await.unwrap();
        assert_eq!(listed.len(), 1);

        database::delete_document(&pool, &document.id).await.unwrap();
        assert!(matches!(
            database::get_document(&pool, &document.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            database::delete_document(&pool, &document.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}

#[cfg(test)]
mod citation_and_template_tests {
    use super::*;

    #[tokio::test]
    async fn test_citation_section_normalized() {
        let (pool, _dir) = create_test_pool().await;

        let citation = database::create_citation(
            &pool,
            NewCitation {
                source: "Texas Property Code".to_string(),
                section: "ยง209.0052".to_string(),
                content: "Notice of proposed rule change".to_string(),
                citation_type: "texas-code".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(citation.section, "§209.0052");
        assert_eq!(database::list_citations(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_system_templates_seeded_once() {
        let (pool, _dir) = create_test_pool().await;

        database::seed_system_templates(&pool).await.unwrap();
        let templates = database::list_templates(&pool).await.unwrap();
        assert_eq!(templates.len(), 12);
        assert!(templates.iter().all(|t| t.is_system));
        assert_eq!(templates[0].name, "Rule Amendment Notice");
    }

    #[tokio::test]
    async fn test_create_and_get_template() {
        let (pool, _dir) = create_test_pool().await;

        let created = database::create_template(
            &pool,
            NewTemplate {
                name: "Pool Rules".to_string(),
                description: "Summer pool rules".to_string(),
                category: "communication".to_string(),
                content: "Pool opens {{opening_date}}".to_string(),
                popularity: "low".to_string(),
                is_system: false,
            },
        )
        .await
        .unwrap();

        let fetched = database::get_template(&pool, &created.id).await.unwrap();
        assert_eq!(fetched.content, "Pool opens {{opening_date}}");
        assert!(!fetched.is_system);

        let templates = database::list_templates(&pool).await.unwrap();
        assert_eq!(templates.last().unwrap().name, "Pool Rules");
    }
}
