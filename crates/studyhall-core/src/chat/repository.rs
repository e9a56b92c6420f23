//! ChatRepository trait definition.
//!
//! The message store seen by the orchestrator: append-only writes and
//! ordered reads. Uses native async fn in traits (RPITIT, Rust 2024
//! edition); implementations live in studyhall-infra.

use studyhall_types::chat::{ChatMessage, MessageRole, StudySession};
use studyhall_types::error::RepositoryError;

/// Repository trait for study session and chat message persistence.
///
/// Messages are ordered by `(created_at, id)` within a session. The
/// repository assigns both at write time, so two concurrent appends to
/// the same session are safe without any read-modify-write cycle.
pub trait ChatRepository: Send + Sync {
    /// Create a new study session owned by `user_id`.
    fn create_session(
        &self,
        user_id: i64,
        topic: &str,
    ) -> impl std::future::Future<Output = Result<StudySession, RepositoryError>> + Send;

    /// Get a session by id.
    fn get_session(
        &self,
        session_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<StudySession>, RepositoryError>> + Send;

    /// List a user's sessions, most recent first.
    fn list_sessions(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<StudySession>, RepositoryError>> + Send;

    /// Append one message to a session. Never updates existing rows.
    fn append_message(
        &self,
        session_id: i64,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// All messages of a session in ascending `(created_at, id)` order.
    fn list_messages(
        &self,
        session_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The most recent `limit` messages of a session, still in ascending
    /// order (the oldest of the window comes first).
    fn recent_messages(
        &self,
        session_id: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
