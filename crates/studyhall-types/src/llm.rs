//! Prompt types for the generation service.
//!
//! The stored [`MessageRole`] and the wire role expected by the upstream
//! generation API are different alphabets ("assistant" is sent as
//! "model"). The mapping is a total function over the two-variant enum,
//! so a stored role can never render to an unknown wire value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::MessageRole;

/// Role of a prompt turn as the generation service expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    User,
    Model,
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptRole::User => write!(f, "user"),
            PromptRole::Model => write!(f, "model"),
        }
    }
}

impl From<MessageRole> for PromptRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => PromptRole::User,
            MessageRole::Assistant => PromptRole::Model,
        }
    }
}

/// One entry in the ordered prompt sequence sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: PromptRole,
    pub text: String,
}

impl PromptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Model,
            text: text.into(),
        }
    }
}

/// Errors from a single generation attempt.
///
/// Classified so the retry layer can decide what to do: rate limits are
/// retried, empty candidates and provider failures are not.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("rate limited by the generation service")]
    RateLimited,

    #[error("empty or filtered candidate")]
    EmptyCandidate,

    #[error("{0}")]
    Provider(String),
}
