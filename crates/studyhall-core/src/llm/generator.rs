//! TextGenerator trait definition.
//!
//! One generation attempt against the upstream provider. Retry policy
//! and failure-to-text translation live in
//! [`crate::llm::client::GenerationClient`], not here: an implementation
//! reports what happened and nothing more.

use studyhall_types::llm::{GenerationError, PromptTurn};

/// A single-shot text generation backend.
///
/// Implementations live in studyhall-infra (the Gemini HTTP client and
/// the offline mock). Uses native async fn in traits (RPITIT).
pub trait TextGenerator: Send + Sync {
    /// Produce a reply for the ordered prompt sequence.
    ///
    /// Must classify upstream quota errors as
    /// [`GenerationError::RateLimited`] so the caller can retry them.
    fn generate(
        &self,
        turns: &[PromptTurn],
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
