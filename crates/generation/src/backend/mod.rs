//! Pluggable completion backend abstraction
//!
//! This module provides a trait-based abstraction over OpenAI-compatible
//! chat-completion services. All backends implement the same interface,
//! allowing runtime switching between a hosted API and a local daemon.

pub mod ollama;
pub mod openai;
pub mod registry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{ChatRequest, ChatResponse};

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;
pub use registry::{BackendFactory, BackendRegistry};

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Completion failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl BackendError {
    /// Whether the failure was a wall-clock timeout on the wire
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Http(e) if e.is_timeout())
    }
}

/// Backend information for UI display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend identifier (e.g. "openai", "ollama")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Whether this backend is currently serving calls
    pub active: bool,
    /// Whether this backend is available (credentials/daemon present)
    pub available: bool,
    /// Reason if unavailable
    pub unavailable_reason: Option<String>,
}

/// The core trait that all completion backends must implement.
///
/// Backends are thin HTTP clients over OpenAI-compatible services. The
/// application only interacts with them through [`crate::Generator`].
#[async_trait]
pub trait CompletionBackend: Send + Sync + std::fmt::Debug {
    /// Registry identifier
    fn name(&self) -> &'static str;

    /// Description of this backend
    fn description(&self) -> &'static str;

    /// Base URL requests are sent to
    fn base_url(&self) -> &str;

    /// Model used when the caller does not override it
    fn default_model(&self) -> &str;

    /// Health check - verify the service is responding
    async fn health_check(&self) -> bool;

    /// One non-streaming chat completion call
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
}

/// Map a chat-completions HTTP response onto a [`ChatResponse`] or a typed error
///
/// Shared by all HTTP backends so status handling stays uniform: 401/403
/// become [`BackendError::Auth`], 429 becomes [`BackendError::RateLimited`],
/// any other failure status carries the body for display.
pub(crate) async fn read_chat_response(
    response: reqwest::Response,
) -> Result<ChatResponse, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = trim_error_body(&body);
        return Err(match status.as_u16() {
            401 | 403 => BackendError::Auth(message),
            429 => BackendError::RateLimited(message),
            code => BackendError::Api {
                status: code,
                message,
            },
        });
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

    if parsed.choices.is_empty() {
        return Err(BackendError::EmptyResponse);
    }

    Ok(parsed)
}

/// Keep provider error bodies short enough to show in the UI
fn trim_error_body(body: &str) -> String {
    const MAX_LEN: usize = 512;
    let trimmed = body.trim();
    if trimmed.len() <= MAX_LEN {
        trimmed.to_string()
    } else {
        let cut = trimmed
            .char_indices()
            .take_while(|(i, _)| *i < MAX_LEN)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &trimmed[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_error_body_short() {
        assert_eq!(trim_error_body("  oops  "), "oops");
    }

    #[test]
    fn test_trim_error_body_long() {
        let long = "x".repeat(2000);
        let trimmed = trim_error_body(&long);
        assert!(trimmed.len() < 600);
        assert!(trimmed.ends_with('…'));
    }

    #[test]
    fn test_error_display() {
        let err = BackendError::Api {
            status: 500,
            message: "server melted".to_string(),
        };
        assert_eq!(err.to_string(), "Completion failed (500): server melted");
    }
}
