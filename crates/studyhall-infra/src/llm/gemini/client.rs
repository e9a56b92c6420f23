//! GeminiGenerator -- concrete [`TextGenerator`] implementation for the
//! Google Gemini `generateContent` API.
//!
//! Sends the ordered prompt sequence as a single non-streaming request.
//! HTTP 429 is classified as [`GenerationError::RateLimited`] so the
//! retry layer in studyhall-core can back off and try again; every other
//! failure is reported verbatim and not retried.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use studyhall_core::llm::generator::TextGenerator;
use studyhall_types::llm::{GenerationError, PromptTurn};

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Default model; the efficient tier is plenty for study chat.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// Google Gemini generation backend.
///
/// # API Key Security
///
/// The key is sent via the `x-goog-api-key` header (never the URL, so it
/// cannot leak through request logs) and is only exposed when the header
/// is built.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-flash-latest")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model,
        }
    }

    /// The model this generator targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

// GeminiGenerator intentionally does NOT derive Debug; the SecretString
// field ensures the API key is never printed, and omitting Debug keeps
// the rest of the client state out of logs as well.

impl TextGenerator for GeminiGenerator {
    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::from_turns(turns);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Provider(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(GenerationError::RateLimited);
            }
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Provider(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Provider(format!("failed to parse response: {e}")))?;

        parsed
            .first_candidate_text()
            .ok_or(GenerationError::EmptyCandidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_includes_model() {
        let generator = GeminiGenerator::new(
            SecretString::from("test-key"),
            DEFAULT_MODEL.to_string(),
        );
        assert_eq!(
            generator.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_base_url_override() {
        let generator = GeminiGenerator::new(SecretString::from("k"), "m".to_string())
            .with_base_url("http://localhost:8099".to_string());
        assert_eq!(generator.url(), "http://localhost:8099/m:generateContent");
    }
}
