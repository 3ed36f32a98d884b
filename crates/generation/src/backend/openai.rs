//! Hosted OpenAI-compatible backend
//!
//! This backend talks to a hosted chat-completions API (api.openai.com by
//! default, or any compatible endpoint via `base_url`) using a bearer
//! credential.

use std::time::Duration;

use async_trait::async_trait;

use super::{read_chat_response, BackendError, CompletionBackend};
use crate::config::GenerationConfig;
use crate::constants::defaults;
use crate::types::{ChatRequest, ChatResponse};

/// Backend for hosted OpenAI-compatible APIs
#[derive(Debug)]
pub struct OpenAiBackend {
    /// HTTP client for API requests
    http_client: reqwest::Client,
    /// Base URL requests are sent to (no trailing slash)
    base_url: String,
    /// Bearer credential
    api_key: String,
    /// Model used when the caller does not override it
    model: String,
}

impl OpenAiBackend {
    /// Create a backend from configuration
    ///
    /// Fails with [`BackendError::Config`] when no credential is set - the
    /// hosted API rejects anonymous calls, so there is no point starting.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, BackendError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                BackendError::Config(
                    "No API key configured. Set UISMITH_API_KEY for the hosted backend."
                        .to_string(),
                )
            })?
            .to_string();

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(defaults::OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| defaults::OPENAI_MODEL.to_string());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn description(&self) -> &'static str {
        "Hosted OpenAI-compatible chat-completions API"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        match self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                log::debug!("Hosted backend health check failed: {}", e);
                false
            }
        }
    }

    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);

        log::debug!(
            "Relaying completion request to {} (model {})",
            url,
            request.model
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(BackendError::Http)?;

        read_chat_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> GenerationConfig {
        GenerationConfig {
            api_key: Some("sk-test".to_string()),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        let config = GenerationConfig::default();
        assert!(matches!(
            OpenAiBackend::from_config(&config),
            Err(BackendError::Config(_))
        ));
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let config = GenerationConfig {
            api_key: Some("   ".to_string()),
            ..GenerationConfig::default()
        };
        assert!(OpenAiBackend::from_config(&config).is_err());
    }

    #[test]
    fn test_defaults() {
        let backend = OpenAiBackend::from_config(&config_with_key()).unwrap();
        assert_eq!(backend.name(), "openai");
        assert_eq!(backend.base_url(), defaults::OPENAI_BASE_URL);
        assert_eq!(backend.default_model(), defaults::OPENAI_MODEL);
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config = GenerationConfig {
            base_url: Some("https://llm.example.com/v1/".to_string()),
            ..config_with_key()
        };
        let backend = OpenAiBackend::from_config(&config).unwrap();
        assert_eq!(backend.base_url(), "https://llm.example.com/v1");
    }
}
