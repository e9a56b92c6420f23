//! Chat service orchestrating one conversational turn end to end.
//!
//! ChatService resolves or creates the session, persists the user turn,
//! assembles the bounded context, obtains reply text from the generation
//! client, and persists the reply. Exactly two message rows are written
//! per successful call -- when generation degrades to fallback text,
//! that text IS the assistant row.

use tracing::info;

use studyhall_types::chat::{ChatMessage, MessageRole, StudySession};
use studyhall_types::error::ChatError;

use crate::chat::context::ContextAssembler;
use crate::chat::repository::ChatRepository;
use crate::llm::client::GenerationClient;
use crate::llm::generator::TextGenerator;

/// Topic assigned when the first turn arrives without one.
pub const DEFAULT_TOPIC: &str = "General Study";

/// Result of one chat turn: the resolved session and the persisted reply.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session_id: i64,
    pub message: ChatMessage,
}

/// Orchestrates chat turns against a message store and a generator.
///
/// Generic over [`ChatRepository`] and [`TextGenerator`] to maintain
/// clean architecture (studyhall-core never depends on studyhall-infra).
pub struct ChatService<C: ChatRepository, G: TextGenerator> {
    repo: C,
    generator: GenerationClient<G>,
}

impl<C: ChatRepository, G: TextGenerator> ChatService<C, G> {
    /// Create a new chat service over the given store and generator.
    pub fn new(repo: C, generator: G) -> Self {
        Self {
            repo,
            generator: GenerationClient::new(generator),
        }
    }

    /// Access the chat repository.
    pub fn repo(&self) -> &C {
        &self.repo
    }

    /// Handle one inbound chat turn for an authenticated user.
    ///
    /// Without a session id a new session is created (topic defaults to
    /// [`DEFAULT_TOPIC`]). With one, the session must exist and belong
    /// to `user_id`; a foreign session is reported as not found, never
    /// silently redirected. Nothing is written before validation and
    /// ownership checks pass.
    pub async fn handle_chat(
        &self,
        user_id: i64,
        session_id: Option<i64>,
        topic: Option<&str>,
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let session = match session_id {
            Some(id) => {
                let session = self
                    .repo
                    .get_session(id)
                    .await?
                    .ok_or(ChatError::SessionNotFound)?;
                if session.user_id != user_id {
                    return Err(ChatError::SessionNotFound);
                }
                session
            }
            None => {
                let topic = topic.unwrap_or(DEFAULT_TOPIC);
                let session = self.repo.create_session(user_id, topic).await?;
                info!(session_id = session.id, user_id, topic, "study session created");
                session
            }
        };

        self.repo
            .append_message(session.id, MessageRole::User, message)
            .await?;

        let prompt = ContextAssembler::build_context(&self.repo, session.id).await?;
        let reply_text = self.generator.generate(&prompt).await;

        let reply = self
            .repo
            .append_message(session.id, MessageRole::Assistant, &reply_text)
            .await?;

        info!(session_id = session.id, reply_id = reply.id, "chat turn completed");

        Ok(ChatReply {
            session_id: session.id,
            message: reply,
        })
    }

    /// List the user's sessions, most recent first.
    pub async fn list_sessions(&self, user_id: i64) -> Result<Vec<StudySession>, ChatError> {
        Ok(self.repo.list_sessions(user_id).await?)
    }

    /// Full transcript of one of the user's sessions, ascending.
    ///
    /// Applies the same ownership rule as [`Self::handle_chat`].
    pub async fn session_messages(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let session = self
            .repo
            .get_session(session_id)
            .await?
            .ok_or(ChatError::SessionNotFound)?;
        if session.user_id != user_id {
            return Err(ChatError::SessionNotFound);
        }
        Ok(self.repo.list_messages(session_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::Utc;
    use studyhall_types::error::RepositoryError;
    use studyhall_types::llm::{GenerationError, PromptRole, PromptTurn};

    use crate::chat::context::CONTEXT_WINDOW;

    #[derive(Default)]
    struct StoreState {
        sessions: Vec<StudySession>,
        messages: Vec<ChatMessage>,
        next_session_id: i64,
        next_message_id: i64,
    }

    /// In-memory ChatRepository double; insertion order is message order.
    #[derive(Default)]
    struct InMemoryChatStore {
        state: Mutex<StoreState>,
    }

    impl InMemoryChatStore {
        fn message_count(&self) -> usize {
            self.state.lock().unwrap().messages.len()
        }
    }

    impl ChatRepository for InMemoryChatStore {
        async fn create_session(
            &self,
            user_id: i64,
            topic: &str,
        ) -> Result<StudySession, RepositoryError> {
            let mut state = self.state.lock().unwrap();
            state.next_session_id += 1;
            let session = StudySession {
                id: state.next_session_id,
                user_id,
                topic: topic.to_string(),
                created_at: Utc::now(),
            };
            state.sessions.push(session.clone());
            Ok(session)
        }

        async fn get_session(
            &self,
            session_id: i64,
        ) -> Result<Option<StudySession>, RepositoryError> {
            let state = self.state.lock().unwrap();
            Ok(state.sessions.iter().find(|s| s.id == session_id).cloned())
        }

        async fn list_sessions(&self, user_id: i64) -> Result<Vec<StudySession>, RepositoryError> {
            let state = self.state.lock().unwrap();
            let mut sessions: Vec<_> = state
                .sessions
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect();
            sessions.reverse();
            Ok(sessions)
        }

        async fn append_message(
            &self,
            session_id: i64,
            role: MessageRole,
            content: &str,
        ) -> Result<ChatMessage, RepositoryError> {
            let mut state = self.state.lock().unwrap();
            state.next_message_id += 1;
            let message = ChatMessage {
                id: state.next_message_id,
                session_id,
                role,
                content: content.to_string(),
                created_at: Utc::now(),
            };
            state.messages.push(message.clone());
            Ok(message)
        }

        async fn list_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
            let state = self.state.lock().unwrap();
            Ok(state
                .messages
                .iter()
                .filter(|m| m.session_id == session_id)
                .cloned()
                .collect())
        }

        async fn recent_messages(
            &self,
            session_id: i64,
            limit: i64,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let all = self.list_messages(session_id).await?;
            let skip = all.len().saturating_sub(limit as usize);
            Ok(all.into_iter().skip(skip).collect())
        }
    }

    /// Echoes the final user turn of the prompt.
    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GenerationError> {
            let last = turns
                .iter()
                .rev()
                .find(|t| t.role == PromptRole::User)
                .map(|t| t.text.as_str())
                .unwrap_or_default();
            Ok(format!("You asked: '{last}'"))
        }
    }

    /// Always fails with the given error kind.
    struct FailingGenerator(fn() -> GenerationError);

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _turns: &[PromptTurn]) -> Result<String, GenerationError> {
            Err((self.0)())
        }
    }

    fn echo_service() -> ChatService<InMemoryChatStore, EchoGenerator> {
        ChatService::new(InMemoryChatStore::default(), EchoGenerator)
    }

    #[tokio::test]
    async fn test_first_turn_creates_session_with_default_topic() {
        let service = echo_service();

        let reply = service.handle_chat(1, None, None, "Hello").await.unwrap();

        let session = service.repo().get_session(reply.session_id).await.unwrap().unwrap();
        assert_eq!(session.topic, DEFAULT_TOPIC);
        assert_eq!(session.user_id, 1);

        let messages = service.repo().list_messages(reply.session_id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].id, reply.message.id);
    }

    #[tokio::test]
    async fn test_explicit_topic_is_kept() {
        let service = echo_service();
        let reply = service
            .handle_chat(1, None, Some("Rust lifetimes"), "Help")
            .await
            .unwrap();
        let session = service.repo().get_session(reply.session_id).await.unwrap().unwrap();
        assert_eq!(session.topic, "Rust lifetimes");
    }

    #[tokio::test]
    async fn test_reply_echoes_current_turn() {
        // The just-persisted user turn must be part of the prompt.
        let service = echo_service();
        let reply = service
            .handle_chat(1, None, None, "What is recursion?")
            .await
            .unwrap();
        assert!(reply.message.content.contains("What is recursion?"));
    }

    #[tokio::test]
    async fn test_missing_session_is_rejected_without_writes() {
        let service = echo_service();
        let err = service.handle_chat(1, Some(999), None, "Hello").await.unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        assert_eq!(service.repo().message_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_session_is_rejected_without_writes() {
        let service = echo_service();
        let reply = service.handle_chat(1, None, None, "mine").await.unwrap();

        let err = service
            .handle_chat(2, Some(reply.session_id), None, "theirs")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        assert_eq!(service.repo().message_count(), 2, "only the owner's turn persisted");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_before_any_write() {
        let service = echo_service();
        let err = service.handle_chat(1, None, None, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));

        let state_empty = service.repo().list_sessions(1).await.unwrap().is_empty();
        assert!(state_empty, "no session created for invalid input");
        assert_eq!(service.repo().message_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_persisted_as_reply() {
        let service = ChatService::new(
            InMemoryChatStore::default(),
            FailingGenerator(|| GenerationError::Provider("HTTP 500: boom".to_string())),
        );

        let reply = service.handle_chat(1, None, None, "Hello").await.unwrap();
        assert!(reply.message.content.contains("HTTP 500: boom"));
        assert_eq!(service.repo().message_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhaustion_still_persists_two_rows() {
        let service = ChatService::new(
            InMemoryChatStore::default(),
            FailingGenerator(|| GenerationError::RateLimited),
        );

        let reply = service.handle_chat(1, None, None, "Hello").await.unwrap();
        assert!(reply.message.content.contains("too many requests"));
        assert_eq!(reply.message.role, MessageRole::Assistant);
        assert_eq!(service.repo().message_count(), 2);
    }

    #[tokio::test]
    async fn test_session_messages_enforces_ownership() {
        let service = echo_service();
        let reply = service.handle_chat(1, None, None, "Hello").await.unwrap();

        let mine = service.session_messages(1, reply.session_id).await.unwrap();
        assert_eq!(mine.len(), 2);

        let err = service.session_messages(2, reply.session_id).await.unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_context_window_caps_at_twenty() {
        let store = InMemoryChatStore::default();
        let session = store.create_session(1, "history").await.unwrap();
        for i in 0..25 {
            let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
            store
                .append_message(session.id, role, &format!("msg-{i}"))
                .await
                .unwrap();
        }

        let turns = ContextAssembler::build_context(&store, session.id).await.unwrap();
        assert_eq!(turns.len(), (2 + CONTEXT_WINDOW) as usize);
        // The window drops the five oldest messages.
        assert_eq!(turns[2].text, "msg-5");
        assert_eq!(turns.last().unwrap().text, "msg-24");
    }

    #[tokio::test]
    async fn test_context_length_is_two_plus_min() {
        let store = InMemoryChatStore::default();
        let session = store.create_session(1, "short").await.unwrap();
        for i in 0..3 {
            store
                .append_message(session.id, MessageRole::User, &format!("m{i}"))
                .await
                .unwrap();
        }

        let turns = ContextAssembler::build_context(&store, session.id).await.unwrap();
        assert_eq!(turns.len(), 5);
    }

    #[tokio::test]
    async fn test_context_read_is_idempotent() {
        let store = InMemoryChatStore::default();
        let session = store.create_session(1, "idempotent").await.unwrap();
        store.append_message(session.id, MessageRole::User, "a").await.unwrap();
        store.append_message(session.id, MessageRole::Assistant, "b").await.unwrap();

        let first = ContextAssembler::build_context(&store, session.id).await.unwrap();
        let second = ContextAssembler::build_context(&store, session.id).await.unwrap();
        assert_eq!(first, second);
    }
}
