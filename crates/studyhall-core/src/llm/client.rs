//! Retry/backoff wrapper around a [`TextGenerator`].
//!
//! The chat feature must stay usable when the upstream provider is
//! degraded, so [`GenerationClient::generate`] never returns an error:
//! rate limits are retried with escalating delays and every terminal
//! failure resolves to user-visible text.
//!
//! Per call: `ATTEMPT(n) -> SUCCESS | EMPTY_RESULT |
//! RATE_LIMITED -> (n < 3: SLEEP(10n) -> ATTEMPT(n+1) | n = 3: FAIL) |
//! OTHER_FAILURE -> FAIL`. All terminal states yield text.

use std::time::Duration;

use tracing::warn;

use studyhall_types::llm::{GenerationError, PromptTurn};

use super::generator::TextGenerator;

/// Total attempts per generate call, counting the first.
const MAX_ATTEMPTS: u32 = 3;

/// Backoff unit; attempt n sleeps `n * BACKOFF_UNIT` before attempt n+1.
///
/// The upstream quota window resets in roughly 20-30s, so the schedule
/// (10s, 20s) lands the later attempts past the reset.
const BACKOFF_UNIT: Duration = Duration::from_secs(10);

/// Shown when the provider returned an empty or filtered candidate.
const EMPTY_CANDIDATE_REPLY: &str = "I apologize, but I couldn't generate a response \
to that. Please try rephrasing your question.";

/// Shown when every attempt was rejected for quota.
const RATE_LIMIT_REPLY: &str = "The study assistant is receiving too many requests \
right now. Please wait a moment and send your message again.";

/// Governs retries and translates failures into reply text.
pub struct GenerationClient<G> {
    inner: G,
}

impl<G: TextGenerator> GenerationClient<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    /// Produce reply text for the prompt, absorbing every failure mode.
    ///
    /// The sleeps are plain awaits local to the calling task; no lock is
    /// held across them, so concurrent chats proceed independently.
    pub async fn generate(&self, turns: &[PromptTurn]) -> String {
        let mut attempt = 1;
        loop {
            match self.inner.generate(turns).await {
                Ok(text) => return text,
                Err(GenerationError::EmptyCandidate) => {
                    warn!(attempt, "generation returned an empty candidate");
                    return EMPTY_CANDIDATE_REPLY.to_string();
                }
                Err(GenerationError::RateLimited) if attempt < MAX_ATTEMPTS => {
                    let delay = BACKOFF_UNIT * attempt;
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        "generation rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(GenerationError::RateLimited) => {
                    warn!(attempt, "generation rate limited, attempts exhausted");
                    return RATE_LIMIT_REPLY.to_string();
                }
                Err(err) => {
                    warn!(attempt, error = %err, "generation failed");
                    return format!("Error reaching the study assistant: {err}");
                }
            }
        }
    }
}
