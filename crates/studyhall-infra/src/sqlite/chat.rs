//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `studyhall-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, writes on
//! the writer pool, reads on the reader pool. The message log is
//! append-only; no UPDATE or DELETE statement exists for
//! `chat_messages`.

use chrono::Utc;
use sqlx::Row;

use studyhall_core::chat::repository::ChatRepository;
use studyhall_types::chat::{ChatMessage, MessageRole, StudySession};
use studyhall_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct StudySessionRow {
    id: i64,
    user_id: i64,
    topic: String,
    created_at: String,
}

impl StudySessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            topic: row.try_get("topic")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<StudySession, RepositoryError> {
        Ok(StudySession {
            id: self.id,
            user_id: self.user_id,
            topic: self.topic,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct ChatMessageRow {
    id: i64,
    session_id: i64,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id: self.id,
            session_id: self.session_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn collect_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let msg_row =
            ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        messages.push(msg_row.into_message()?);
    }
    Ok(messages)
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(
        &self,
        user_id: i64,
        topic: &str,
    ) -> Result<StudySession, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO study_sessions (user_id, topic, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(topic)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(StudySession {
            id: result.last_insert_rowid(),
            user_id,
            topic: topic.to_string(),
            created_at,
        })
    }

    async fn get_session(&self, session_id: i64) -> Result<Option<StudySession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM study_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row = StudySessionRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn list_sessions(&self, user_id: i64) -> Result<Vec<StudySession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM study_sessions WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row = StudySessionRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            sessions.push(session_row.into_session()?);
        }

        Ok(sessions)
    }

    async fn append_message(
        &self,
        session_id: i64,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        // Timestamp and rowid are assigned here, at write time; ordering
        // needs no read-modify-write cycle.
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO chat_messages (session_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(role.to_string())
        .bind(content)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            session_id,
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn list_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        collect_messages(&rows)
    }

    async fn recent_messages(
        &self,
        session_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // Inner query picks the most recent `limit` rows; the outer
        // query restores ascending order so the oldest of the window
        // comes first.
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT * FROM chat_messages WHERE session_id = ?
                   ORDER BY created_at DESC, id DESC LIMIT ?
               ) ORDER BY created_at ASC, id ASC"#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        collect_messages(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_user(pool: &DatabasePool, username: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, 'x', ?)",
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(Utc::now().to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();
        result.last_insert_rowid()
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let user_id = seed_user(&pool, "ada").await;
        let session = repo.create_session(user_id, "Rust basics").await.unwrap();
        assert!(session.id > 0);

        let found = repo.get_session(session.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.topic, "Rust basics");
    }

    #[tokio::test]
    async fn test_get_missing_session() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        assert!(repo.get_session(12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let user_id = seed_user(&pool, "bob").await;
        let first = repo.create_session(user_id, "one").await.unwrap();
        let second = repo.create_session(user_id, "two").await.unwrap();

        let sessions = repo.list_sessions(user_id).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, second.id);
        assert_eq!(sessions[1].id, first.id);

        let other = seed_user(&pool, "carol").await;
        assert!(repo.list_sessions(other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_messages_are_ordered_and_append_only() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let user_id = seed_user(&pool, "dan").await;
        let session = repo.create_session(user_id, "ordering").await.unwrap();

        repo.append_message(session.id, MessageRole::User, "Hello").await.unwrap();
        repo.append_message(session.id, MessageRole::Assistant, "Hi!").await.unwrap();
        repo.append_message(session.id, MessageRole::User, "Explain Big-O").await.unwrap();

        let messages = repo.list_messages(session.id).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[2].content, "Explain Big-O");

        for pair in messages.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[tokio::test]
    async fn test_recent_messages_window() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let user_id = seed_user(&pool, "eve").await;
        let session = repo.create_session(user_id, "window").await.unwrap();

        for i in 0..25 {
            let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
            repo.append_message(session.id, role, &format!("msg-{i}")).await.unwrap();
        }

        let window = repo.recent_messages(session.id, 20).await.unwrap();
        assert_eq!(window.len(), 20);
        // Most recent 20, ascending: the five oldest are dropped.
        assert_eq!(window[0].content, "msg-5");
        assert_eq!(window[19].content, "msg-24");
    }

    #[tokio::test]
    async fn test_recent_messages_short_history() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let user_id = seed_user(&pool, "fay").await;
        let session = repo.create_session(user_id, "short").await.unwrap();

        repo.append_message(session.id, MessageRole::User, "only one").await.unwrap();

        let window = repo.recent_messages(session.id, 20).await.unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].content, "only one");
    }
}
