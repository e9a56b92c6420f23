//! Environment-driven application configuration.
//!
//! One credential decides the generation mode: when `LLM_API_KEY` is
//! absent (or blank) the service runs against the deterministic mock
//! backend instead of the live Gemini API.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::llm::gemini::GeminiGenerator;

/// Fallback signing secret for local development only.
const DEV_JWT_SECRET: &str = "studyhall-dev-secret";

/// Default access token lifetime in minutes.
const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60;

/// Runtime configuration assembled from environment variables.
pub struct AppConfig {
    /// Directory holding the SQLite database.
    pub data_dir: PathBuf,
    /// Gemini API key; `None` selects the mock backend.
    pub llm_api_key: Option<SecretString>,
    /// Gemini model identifier.
    pub llm_model: String,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: SecretString,
    /// Access token lifetime.
    pub token_ttl: Duration,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// - `STUDYHALL_DATA_DIR` (default `~/.studyhall`)
    /// - `LLM_API_KEY` (unset or blank selects the mock backend)
    /// - `STUDYHALL_LLM_MODEL` (default `gemini-flash-latest`)
    /// - `STUDYHALL_JWT_SECRET` (development fallback with a warning)
    /// - `STUDYHALL_TOKEN_TTL_MINUTES` (default 60)
    pub fn from_env() -> Self {
        let data_dir = std::env::var("STUDYHALL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".studyhall")
            });

        let llm_api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        let llm_model = std::env::var("STUDYHALL_LLM_MODEL")
            .unwrap_or_else(|_| crate::llm::gemini::DEFAULT_MODEL.to_string());

        let jwt_secret = match std::env::var("STUDYHALL_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => SecretString::from(secret),
            _ => {
                tracing::warn!(
                    "STUDYHALL_JWT_SECRET not set; using the development secret. \
                     Do not run like this in production."
                );
                SecretString::from(DEV_JWT_SECRET)
            }
        };

        let token_ttl = parse_ttl_minutes(std::env::var("STUDYHALL_TOKEN_TTL_MINUTES").ok());

        Self {
            data_dir,
            llm_api_key,
            llm_model,
            jwt_secret,
            token_ttl,
        }
    }

    /// SQLite URL for the configured data directory.
    pub fn database_url(&self) -> String {
        format!(
            "sqlite://{}?mode=rwc",
            self.data_dir.join("studyhall.db").display()
        )
    }

    /// Build the live generation backend, if a credential is configured.
    pub fn gemini_generator(&self) -> Option<GeminiGenerator> {
        self.llm_api_key.as_ref().map(|key| {
            let key = SecretString::from(key.expose_secret().to_string());
            GeminiGenerator::new(key, self.llm_model.clone())
        })
    }
}

fn parse_ttl_minutes(raw: Option<String>) -> Duration {
    let minutes = raw
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
    Duration::from_secs(minutes * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_default() {
        assert_eq!(parse_ttl_minutes(None), Duration::from_secs(3600));
    }

    #[test]
    fn test_ttl_parsed() {
        assert_eq!(
            parse_ttl_minutes(Some("15".to_string())),
            Duration::from_secs(900)
        );
    }

    #[test]
    fn test_ttl_garbage_falls_back() {
        assert_eq!(
            parse_ttl_minutes(Some("soon".to_string())),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_database_url_shape() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/studyhall-test"),
            llm_api_key: None,
            llm_model: "gemini-flash-latest".to_string(),
            jwt_secret: SecretString::from("s"),
            token_ttl: Duration::from_secs(60),
        };
        assert_eq!(
            config.database_url(),
            "sqlite:///tmp/studyhall-test/studyhall.db?mode=rwc"
        );
        assert!(config.gemini_generator().is_none());
    }
}
