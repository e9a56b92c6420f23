//! Offline generation backend used when no API key is configured.
//!
//! Keeps local development and the test suite functional without
//! network access: the reply deterministically echoes the final user
//! utterance of the prompt.

use studyhall_core::llm::generator::TextGenerator;
use studyhall_types::llm::{GenerationError, PromptRole, PromptTurn};

/// Deterministic echo backend.
pub struct MockGenerator;

impl TextGenerator for MockGenerator {
    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GenerationError> {
        let last = turns
            .iter()
            .rev()
            .find(|t| t.role == PromptRole::User)
            .map(|t| t.text.as_str())
            .unwrap_or_default();

        Ok(format!(
            "Mock response: I received your message '{last}'. \
             (Set LLM_API_KEY to get real responses)"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_final_user_turn() {
        let turns = vec![
            PromptTurn::user("You are a study assistant."),
            PromptTurn::model("Understood."),
            PromptTurn::user("What is recursion?"),
        ];

        let reply = MockGenerator.generate(&turns).await.unwrap();
        assert!(reply.contains("What is recursion?"));
    }

    #[tokio::test]
    async fn test_mock_skips_trailing_model_turn() {
        let turns = vec![
            PromptTurn::user("Explain closures"),
            PromptTurn::model("A closure captures its environment."),
        ];

        let reply = MockGenerator.generate(&turns).await.unwrap();
        assert!(reply.contains("Explain closures"));
    }
}
