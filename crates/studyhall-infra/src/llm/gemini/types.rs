//! Wire types for the Gemini `generateContent` endpoint.
//!
//! Only the fields this client reads or writes are modeled; unknown
//! response fields are ignored by serde.

use serde::{Deserialize, Serialize};

use studyhall_types::llm::PromptTurn;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<WireContent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireContent {
    pub role: String,
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WirePart {
    pub text: String,
}

/// Response body for `models/{model}:generateContent`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

impl GenerateContentRequest {
    /// Build a request from the ordered prompt sequence.
    pub fn from_turns(turns: &[PromptTurn]) -> Self {
        let contents = turns
            .iter()
            .map(|turn| WireContent {
                role: turn.role.to_string(),
                parts: vec![WirePart {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        Self { contents }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, or `None` when the candidate list is
    /// empty or its content was filtered away.
    pub fn first_candidate_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        let text: String = content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest::from_turns(&[
            PromptTurn::user("Hello"),
            PromptTurn::model("Hi!"),
        ]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["contents"][1]["role"], "model");
    }

    #[test]
    fn test_response_with_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"An answer"}],"role":"model"},"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_candidate_text().as_deref(), Some("An answer"));
    }

    #[test]
    fn test_response_joins_multiple_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"part one, "},{"text":"part two"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.first_candidate_text().as_deref(),
            Some("part one, part two")
        );
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_candidate_text().is_none());
    }

    #[test]
    fn test_response_with_filtered_candidate() {
        let json = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response.first_candidate_text().is_none());
    }
}
