//! Personal note CRUD handlers.
//!
//! Everything is scoped to the caller; a note id belonging to someone
//! else behaves exactly like a missing one.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use studyhall_core::repository::note::NoteRepository;
use studyhall_types::error::RepositoryError;
use studyhall_types::note::{Note, NoteDraft};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

fn map_note_error(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Note not found".to_string()),
        other => AppError::Internal(other.to_string()),
    }
}

/// GET /api/v1/notes - The caller's notes, newest first.
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state.note_repo.list_notes(user.id).await?;
    Ok(Json(notes))
}

/// POST /api/v1/notes - Create a note.
pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<NoteDraft>,
) -> Result<Json<Note>, AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("Note title must not be empty".to_string()));
    }

    let note = state.note_repo.create_note(user.id, &draft).await?;
    Ok(Json(note))
}

/// PUT /api/v1/notes/{id} - Replace a note's title and content.
pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(note_id): Path<i64>,
    Json(draft): Json<NoteDraft>,
) -> Result<Json<Note>, AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("Note title must not be empty".to_string()));
    }

    let note = state
        .note_repo
        .update_note(user.id, note_id, &draft)
        .await
        .map_err(map_note_error)?;
    Ok(Json(note))
}

/// DELETE /api/v1/notes/{id} - Delete a note.
pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(note_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .note_repo
        .delete_note(user.id, note_id)
        .await
        .map_err(map_note_error)?;

    Ok(Json(json!({ "message": "Note deleted" })))
}
