//! SQLite note repository implementation.
//!
//! Every statement filters on `user_id`, so a foreign note id is
//! indistinguishable from a missing one.

use chrono::Utc;
use sqlx::Row;

use studyhall_core::repository::note::NoteRepository;
use studyhall_types::error::RepositoryError;
use studyhall_types::note::{Note, NoteDraft};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `NoteRepository`.
pub struct SqliteNoteRepository {
    pool: DatabasePool,
}

impl SqliteNoteRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn note_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Note, RepositoryError> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let updated_at: String = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    let read = || -> Result<(i64, i64, String, String), sqlx::Error> {
        Ok((
            row.try_get("id")?,
            row.try_get("user_id")?,
            row.try_get("title")?,
            row.try_get("content")?,
        ))
    };
    let (id, user_id, title, content) =
        read().map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Note {
        id,
        user_id,
        title,
        content,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl NoteRepository for SqliteNoteRepository {
    async fn create_note(&self, user_id: i64, draft: &NoteDraft) -> Result<Note, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO notes (user_id, title, content, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Note {
            id: result.last_insert_rowid(),
            user_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM notes WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(note_from_row).collect()
    }

    async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        draft: &NoteDraft,
    ) -> Result<Note, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE notes SET title = ?, content = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(format_datetime(&now))
        .bind(note_id)
        .bind(user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query("SELECT * FROM notes WHERE id = ?")
            .bind(note_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        note_from_row(&row)
    }

    async fn delete_note(&self, user_id: i64, note_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
