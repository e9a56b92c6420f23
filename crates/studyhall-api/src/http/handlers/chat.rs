//! Study chat handlers.
//!
//! POST /api/v1/chat drives one full conversational turn through the
//! chat service; generation-side degradation never fails the request,
//! so the client always receives a persisted assistant message.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use studyhall_types::chat::{ChatMessage, StudySession};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Request body for one chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Existing session to continue; if absent, a new session is created.
    pub session_id: Option<i64>,
    /// Topic for a newly created session.
    pub topic: Option<String>,
    /// The user's message.
    pub message: String,
}

/// POST /api/v1/chat - Send a message, receive the assistant's reply.
pub async fn chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let reply = state
        .chat_service
        .handle_chat(user.id, body.session_id, body.topic.as_deref(), &body.message)
        .await?;

    Ok(Json(reply.message))
}

/// GET /api/v1/sessions - The caller's sessions, most recent first.
pub async fn list_sessions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<StudySession>>, AppError> {
    let sessions = state.chat_service.list_sessions(user.id).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/sessions/{id}/messages - Full transcript, ascending.
///
/// A session owned by another user is reported as not found.
pub async fn session_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<i64>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = state
        .chat_service
        .session_messages(user.id, session_id)
        .await?;
    Ok(Json(messages))
}
