//! Context assembly: fixed preamble plus a bounded window of history.
//!
//! The prompt sent upstream always opens with the same two turns -- an
//! instruction frame and the model's acknowledgment -- followed by the
//! most recent [`CONTEXT_WINDOW`] stored messages in ascending order.
//! The preamble pair is constant and never persisted.

use studyhall_types::chat::ChatMessage;
use studyhall_types::error::RepositoryError;
use studyhall_types::llm::PromptTurn;

use crate::chat::repository::ChatRepository;

/// Maximum number of stored messages included in one prompt.
///
/// Bounds prompt size and cost irrespective of conversation length;
/// oldest-first ordering inside the window preserves the causal
/// narrative for the model.
pub const CONTEXT_WINDOW: i64 = 20;

/// Instruction frame sent as the first `user` turn of every prompt.
pub const PREAMBLE_INSTRUCTION: &str = "You are an elite AI Study Assistant. \
Your goal is to help students learn faster, explain complex topics simply, \
and provide study plans. Be encouraging, concise, and professional.";

/// Canned acknowledgment sent as the `model` turn answering the frame.
pub const PREAMBLE_ACK: &str = "Understood. I am ready to assist with any study inquiries.";

/// Builds the ordered prompt sequence for a session.
///
/// Stateless; all logic is in associated functions that take the
/// repository as a parameter. Reading twice with no intervening append
/// yields identical sequences.
pub struct ContextAssembler;

impl ContextAssembler {
    /// Build the prompt for `session_id`: preamble pair + trailing window.
    ///
    /// For a session with M stored messages the result has exactly
    /// `2 + min(M, CONTEXT_WINDOW)` turns.
    pub async fn build_context<C: ChatRepository>(
        repo: &C,
        session_id: i64,
    ) -> Result<Vec<PromptTurn>, RepositoryError> {
        let window = repo.recent_messages(session_id, CONTEXT_WINDOW).await?;
        Ok(Self::assemble(&window))
    }

    /// Prepend the preamble and map stored roles to wire roles.
    ///
    /// `window` must already be the bounded trailing slice in ascending
    /// order; this function adds no further truncation.
    pub fn assemble(window: &[ChatMessage]) -> Vec<PromptTurn> {
        let mut turns = Vec::with_capacity(2 + window.len());
        turns.push(PromptTurn::user(PREAMBLE_INSTRUCTION));
        turns.push(PromptTurn::model(PREAMBLE_ACK));

        for msg in window {
            turns.push(PromptTurn {
                role: msg.role.into(),
                text: msg.content.clone(),
            });
        }

        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studyhall_types::chat::MessageRole;
    use studyhall_types::llm::PromptRole;

    fn make_message(id: i64, role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage {
            id,
            session_id: 1,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_is_preamble_only() {
        let turns = ContextAssembler::assemble(&[]);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], PromptTurn::user(PREAMBLE_INSTRUCTION));
        assert_eq!(turns[1], PromptTurn::model(PREAMBLE_ACK));
    }

    #[test]
    fn test_preamble_precedes_history() {
        let window = vec![
            make_message(1, MessageRole::User, "Hello"),
            make_message(2, MessageRole::Assistant, "Hi! What are we studying?"),
        ];
        let turns = ContextAssembler::assemble(&window);
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, PromptRole::User);
        assert_eq!(turns[1].role, PromptRole::Model);
        assert_eq!(turns[2].text, "Hello");
        assert_eq!(turns[3].text, "Hi! What are we studying?");
    }

    #[test]
    fn test_stored_roles_map_to_wire_roles() {
        let window = vec![
            make_message(1, MessageRole::User, "a"),
            make_message(2, MessageRole::Assistant, "b"),
        ];
        let turns = ContextAssembler::assemble(&window);
        assert_eq!(turns[2].role, PromptRole::User);
        assert_eq!(turns[3].role, PromptRole::Model);
    }
}
