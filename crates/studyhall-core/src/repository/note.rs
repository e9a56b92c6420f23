//! NoteRepository trait definition.
//!
//! All operations are scoped by owner: a note id belonging to another
//! user behaves exactly like a missing note.

use studyhall_types::error::RepositoryError;
use studyhall_types::note::{Note, NoteDraft};

/// Repository trait for personal note persistence.
pub trait NoteRepository: Send + Sync {
    /// Create a note owned by `user_id`.
    fn create_note(
        &self,
        user_id: i64,
        draft: &NoteDraft,
    ) -> impl std::future::Future<Output = Result<Note, RepositoryError>> + Send;

    /// List the user's notes, newest first.
    fn list_notes(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Note>, RepositoryError>> + Send;

    /// Replace title and content of the user's note; bumps `updated_at`.
    /// Returns [`RepositoryError::NotFound`] if absent or foreign.
    fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        draft: &NoteDraft,
    ) -> impl std::future::Future<Output = Result<Note, RepositoryError>> + Send;

    /// Delete the user's note. Returns [`RepositoryError::NotFound`] if
    /// absent or foreign.
    fn delete_note(
        &self,
        user_id: i64,
        note_id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
