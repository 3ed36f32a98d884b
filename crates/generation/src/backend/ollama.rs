//! Ollama backend implementation
//!
//! This backend relays completion calls to a local Ollama daemon through
//! its OpenAI-compatible endpoint. Useful for development without a hosted
//! API credential.

use std::time::Duration;

use async_trait::async_trait;

use super::{read_chat_response, BackendError, CompletionBackend};
use crate::config::GenerationConfig;
use crate::constants::defaults;
use crate::types::{ChatRequest, ChatResponse};

/// Backend for a local Ollama daemon
#[derive(Debug)]
pub struct OllamaBackend {
    /// HTTP client for API requests
    http_client: reqwest::Client,
    /// Base URL of the Ollama server (no trailing slash)
    base_url: String,
    /// Model used when the caller does not override it
    model: String,
}

impl OllamaBackend {
    /// Create a backend from configuration
    pub fn from_config(config: &GenerationConfig) -> Result<Self, BackendError> {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(defaults::OLLAMA_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| defaults::OLLAMA_MODEL.to_string());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            model,
        })
    }

    /// Check if Ollama is available on the system
    pub fn check_availability() -> (bool, Option<String>) {
        if which::which("ollama").is_ok() {
            (true, None)
        } else {
            (
                false,
                Some("Ollama not found in PATH. Install from ollama.ai".to_string()),
            )
        }
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn description(&self) -> &'static str {
        "Local Ollama daemon via its OpenAI-compatible API"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http_client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                log::debug!("Ollama health check failed: {}", e);
                false
            }
        }
    }

    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        log::debug!(
            "Relaying completion request to {} (model {})",
            url,
            request.model
        );

        let response = self
            .http_client
            .post(&url)
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

    #[test]
    fn test_defaults() {
        let backend = OllamaBackend::from_config(&GenerationConfig::default()).unwrap();
        assert_eq!(backend.name(), "ollama");
        assert_eq!(backend.base_url(), defaults::OLLAMA_BASE_URL);
        assert_eq!(backend.default_model(), defaults::OLLAMA_MODEL);
    }

    #[test]
    fn test_custom_base_url() {
        let config = GenerationConfig {
            base_url: Some("http://192.168.1.20:11434/".to_string()),
            ..GenerationConfig::default()
        };
        let backend = OllamaBackend::from_config(&config).unwrap();
        assert_eq!(backend.base_url(), "http://192.168.1.20:11434");
    }
}
