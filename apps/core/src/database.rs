use crate::error::AppError;
use crate::models::{
    normalize_citation_text, Citation, Conversation, Document, Message, NewCitation,
    NewConversation, NewDocument, NewMessage, NewTemplate, Template,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::actors::traits::ConversationStore;

/// Title given to conversations created implicitly by a first message.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New research conversation";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    conversation_id TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    citations TEXT,
    source_links TEXT,
    message_type TEXT,
    created_at INTEGER NOT NULL,
    FOREIGN KEY(conversation_id) REFERENCES conversations(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id, created_at);
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    category TEXT NOT NULL,
    upload_date INTEGER NOT NULL,
    sections INTEGER,
    status TEXT NOT NULL DEFAULT 'processing',
    file_url TEXT,
    user_id TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS citations (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    section TEXT NOT NULL,
    content TEXT NOT NULL,
    type TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS templates (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    content TEXT NOT NULL,
    popularity TEXT NOT NULL DEFAULT 'medium',
    is_system INTEGER NOT NULL DEFAULT 1
);
"#;

struct SystemTemplate {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    popularity: &'static str,
    content: &'static str,
}

const SYSTEM_TEMPLATES: &[SystemTemplate] = &[
    SystemTemplate {
        id: "system-rule-amendment-notice",
        name: "Rule Amendment Notice",
        description: "Compliant with Chapter 209 notice requirements",
        category: "governance",
        popularity: "high",
        content: "NOTICE OF PROPOSED RULE AMENDMENT\n\nTo all owners of {{association_name}}:\n\nThe Board of Directors will consider the following rule amendment at the meeting on {{meeting_date}}:\n\n{{rule_text}}\n\nThis notice is provided at least 30 days before the meeting as required by CC&Rs Section 3.5 and Texas Property Code §209.0052.",
    },
    SystemTemplate {
        id: "system-board-resolution",
        name: "Board Resolution",
        description: "Template with recitals and decision sections",
        category: "governance",
        popularity: "high",
        content: "RESOLUTION OF THE BOARD OF DIRECTORS OF {{association_name}}\n\nWHEREAS, {{recitals}};\n\nNOW, THEREFORE, BE IT RESOLVED that {{resolution}}.\n\nAdopted on {{adoption_date}}.",
    },
    SystemTemplate {
        id: "system-209-violation-letter",
        name: "209 Violation Letter",
        description: "Required notice before enforcement actions",
        category: "governance",
        popularity: "high",
        content: "Dear {{owner_name}},\n\nThis letter concerns a violation at {{property_address}}: {{violation_description}}.\n\nUnder Texas Property Code §209.006 you may request a hearing before the board within 30 days. Please cure the violation by {{cure_date}}.\n\nSincerely,\n{{board_contact}}",
    },
    SystemTemplate {
        id: "system-architectural-guidelines",
        name: "Architectural Guidelines",
        description: "ARC review committee guidelines draft",
        category: "governance",
        popularity: "medium",
        content: "ARCHITECTURAL REVIEW GUIDELINES\n\nScope: {{scope}}\n\nSubmission requirements: {{submission_requirements}}\n\nReview period: {{review_period}} days.",
    },
    SystemTemplate {
        id: "system-annual-budget-narrative",
        name: "Annual Budget Narrative",
        description: "Owner-friendly budget explanation",
        category: "financial",
        popularity: "high",
        content: "{{fiscal_year}} BUDGET OVERVIEW\n\nTotal operating budget: {{operating_total}}\nReserve contribution: {{reserve_contribution}}\n\nKey changes: {{key_changes}}",
    },
    SystemTemplate {
        id: "system-dues-increase-memo",
        name: "Dues Increase Memo",
        description: "Justification for assessment changes",
        category: "financial",
        popularity: "medium",
        content: "MEMO: ASSESSMENT CHANGE\n\nCurrent assessment: {{current_assessment}}\nProposed assessment: {{proposed_assessment}}\n\nReasons: {{justification}}",
    },
    SystemTemplate {
        id: "system-special-assessment",
        name: "Special Assessment",
        description: "Emergency funding justification",
        category: "financial",
        popularity: "medium",
        content: "NOTICE OF SPECIAL ASSESSMENT\n\nAmount per lot: {{amount}}\nDue date: {{due_date}}\n\nPurpose: {{purpose}}",
    },
    SystemTemplate {
        id: "system-reserve-funding-plan",
        name: "Reserve Funding Plan",
        description: "Long-term reserve study summary",
        category: "financial",
        popularity: "low",
        content: "RESERVE FUNDING PLAN\n\nStudy date: {{study_date}}\nPercent funded: {{percent_funded}}\n\nPlanned contributions: {{contribution_schedule}}",
    },
    SystemTemplate {
        id: "system-owner-faq",
        name: "Owner FAQ",
        description: "Common questions with CC&R references",
        category: "communication",
        popularity: "medium",
        content: "FREQUENTLY ASKED QUESTIONS - {{association_name}}\n\n{{questions}}\n\nSee the CC&Rs for full text.",
    },
    SystemTemplate {
        id: "system-meeting-agenda",
        name: "Meeting Agenda",
        description: "Auto-includes recurring items",
        category: "communication",
        popularity: "high",
        content: "BOARD MEETING AGENDA\n\nDate: {{meeting_date}}\nLocation: {{location}}\n\n1. Call to order\n2. Approval of prior minutes\n3. Financial report\n4. {{new_business}}\n5. Owner forum\n6. Adjournment",
    },
    SystemTemplate {
        id: "system-board-minutes",
        name: "Board Minutes",
        description: "Template for secretary to complete",
        category: "communication",
        popularity: "high",
        content: "MINUTES OF THE BOARD OF DIRECTORS\n\nDate: {{meeting_date}}\nDirectors present: {{directors_present}}\n\nActions taken: {{actions}}\n\nRecorded by {{secretary_name}}",
    },
    SystemTemplate {
        id: "system-compliance-memo",
        name: "Compliance Memo",
        description: "Situation analysis with options",
        category: "research",
        popularity: "medium",
        content: "COMPLIANCE MEMO\n\nSituation: {{situation}}\n\nApplicable provisions: {{provisions}}\n\nOptions: {{options}}\n\nRecommendation: {{recommendation}}",
    },
];

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Open (creating if needed) the SQLite database at `database_url` and apply
/// the schema and system templates.
#[instrument]
pub async fn init_db(database_url: &str) -> Result<SqlitePool, AppError> {
    info!("Initializing database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    seed_system_templates(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// Insert the built-in drafting templates. Re-running is a no-op.
pub async fn seed_system_templates(pool: &SqlitePool) -> Result<(), AppError> {
    for template in SYSTEM_TEMPLATES {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO templates (id, name, description, category, content, popularity, is_system)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(template.id)
        .bind(template.name)
        .bind(template.description)
        .bind(template.category)
        .bind(template.content)
        .bind(template.popularity)
        .execute(pool)
        .await?;
    }
    debug!(count = SYSTEM_TEMPLATES.len(), "System templates seeded");
    Ok(())
}

// --- Conversations CRUD ---

pub async fn create_conversation(
    pool: &SqlitePool,
    user_id: &str,
    new: NewConversation,
) -> Result<Conversation, AppError> {
    let id = Uuid::new_v4().to_string();
    let now = now_millis();

    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (id, user_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, title, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(new.user_id.as_deref().unwrap_or(user_id))
    .bind(&new.title)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(conversation)
}

/// Create the conversation row for `id` unless it already exists
pub async fn ensure_conversation(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<(), AppError> {
    let now = now_millis();
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO conversations (id, user_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(DEFAULT_CONVERSATION_TITLE)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Conversation, AppError> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))
}

pub async fn list_conversations(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Conversation>, AppError> {
    let conversations = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE user_id = ?
        ORDER BY updated_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(conversations)
}

pub async fn rename_conversation(
    pool: &SqlitePool,
    id: &str,
    title: &str,
) -> Result<Conversation, AppError> {
    sqlx::query_as::<_, Conversation>(
        r#"
        UPDATE conversations
        SET title = ?, updated_at = ?
        WHERE id = ?
        RETURNING id, user_id, title, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))
}

// --- Messages CRUD ---

pub async fn create_message(pool: &SqlitePool, new: NewMessage) -> Result<Message, AppError> {
    let id = new.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let created_at = now_millis();
    let citations = new.citations.map(|labels| {
        Json(
            labels
                .iter()
                .map(|label| normalize_citation_text(label))
                .collect::<Vec<_>>(),
        )
    });

    let mut tx = pool.begin().await?;

    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (id, conversation_id, role, content, citations, source_links, message_type, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, conversation_id, role, content, citations, source_links, message_type, created_at
        "#,
    )
    .bind(&id)
    .bind(&new.conversation_id)
    .bind(&new.role)
    .bind(&new.content)
    .bind(citations)
    .bind(new.source_links.map(Json))
    .bind(&new.message_type)
    .bind(created_at)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(created_at)
        .bind(&new.conversation_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(message)
}

pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Vec<Message>, AppError> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, role, content, citations, source_links, message_type, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;
    Ok(messages)
}

// --- Documents CRUD ---

pub async fn create_document(
    pool: &SqlitePool,
    user_id: &str,
    new: NewDocument,
) -> Result<Document, AppError> {
    let id = Uuid::new_v4().to_string();

    let document = sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (id, name, type, category, upload_date, sections, status, file_url, user_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, name, type, category, upload_date, sections, status, file_url, user_id
        "#,
    )
    .bind(&id)
    .bind(&new.name)
    .bind(&new.doc_type)
    .bind(&new.category)
    .bind(now_millis())
    .bind(new.sections)
    .bind(new.status.as_deref().unwrap_or("processing"))
    .bind(&new.file_url)
    .bind(new.user_id.as_deref().unwrap_or(user_id))
    .fetch_one(pool)
    .await?;

    Ok(document)
}

pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<Document, AppError> {
    sqlx::query_as::<_, Document>(
        r#"
        SELECT id, name, type, category, upload_date, sections, status, file_url, user_id
        FROM documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
}

pub async fn list_documents(pool: &SqlitePool, user_id: &str) -> Result<Vec<Document>, AppError> {
    let documents = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, name, type, category, upload_date, sections, status, file_url, user_id
        FROM documents
        WHERE user_id = ?
        ORDER BY upload_date DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(documents)
}

pub async fn update_document_status(
    pool: &SqlitePool,
    id: &str,
    status: &str,
) -> Result<Document, AppError> {
    sqlx::query_as::<_, Document>(
        r#"
        UPDATE documents
        SET status = ?
        WHERE id = ?
        RETURNING id, name, type, category, upload_date, sections, status, file_url, user_id
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
}

pub async fn delete_document(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM documents WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Document {} not found", id)));
    }
    Ok(())
}

// --- Citations ---

pub async fn create_citation(pool: &SqlitePool, new: NewCitation) -> Result<Citation, AppError> {
    let id = Uuid::new_v4().to_string();

    let citation = sqlx::query_as::<_, Citation>(
        r#"
        INSERT INTO citations (id, source, section, content, type, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, source, section, content, type, created_at
        "#,
    )
    .bind(&id)
    .bind(&new.source)
    .bind(normalize_citation_text(&new.section))
    .bind(&new.content)
    .bind(&new.citation_type)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    Ok(citation)
}

/// Newest 50 citations
pub async fn list_citations(pool: &SqlitePool) -> Result<Vec<Citation>, AppError> {
    let citations = sqlx::query_as::<_, Citation>(
        r#"
        SELECT id, source, section, content, type, created_at
        FROM citations
        ORDER BY created_at DESC, rowid DESC
        LIMIT 50
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(citations)
}

// --- Templates ---

pub async fn list_templates(pool: &SqlitePool) -> Result<Vec<Template>, AppError> {
    let templates = sqlx::query_as::<_, Template>(
        r#"
        SELECT id, name, description, category, content, popularity, is_system
        FROM templates
        ORDER BY is_system DESC, rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(templates)
}

pub async fn get_template(pool: &SqlitePool, id: &str) -> Result<Template, AppError> {
    sqlx::query_as::<_, Template>(
        r#"
        SELECT id, name, description, category, content, popularity, is_system
        FROM templates
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Template {} not found", id)))
}

pub async fn create_template(pool: &SqlitePool, new: NewTemplate) -> Result<Template, AppError> {
    let id = Uuid::new_v4().to_string();

    let template = sqlx::query_as::<_, Template>(
        r#"
        INSERT INTO templates (id, name, description, category, content, popularity, is_system)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, name, description, category, content, popularity, is_system
        "#,
    )
    .bind(&id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.category)
    .bind(&new.content)
    .bind(&new.popularity)
    .bind(new.is_system)
    .fetch_one(pool)
    .await?;

    Ok(template)
}

/// [`ConversationStore`] backed by the SQLite pool.
///
/// Sessions map one-to-one onto conversations; the conversation row is
/// created on the first persisted message.
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: SqlitePool,
    default_user: String,
}

impl SqliteConversationStore {
    pub fn new(pool: SqlitePool, default_user: impl Into<String>) -> Self {
        Self {
            pool,
            default_user: default_user.into(),
        }
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn append_message(&self, message: NewMessage) -> Result<Message, AppError> {
        ensure_conversation(&self.pool, &message.conversation_id, &self.default_user).await?;
        create_message(&self.pool, message).await
    }

    async fn load_messages(&self, conversation_id: &str) -> Result<Vec<Message>, AppError> {
        list_messages(&self.pool, conversation_id).await
    }
}
