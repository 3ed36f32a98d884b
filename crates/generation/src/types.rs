//! Common types for generation operations

use serde::{Deserialize, Serialize};

use crate::prompt::Framework;

/// Chat message (OpenAI-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request (OpenAI-compatible, non-streaming)
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One choice in a chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message body of a choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion response (OpenAI-compatible)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Text of the first choice, if the reply carried one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// A request to generate UI code from a description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Free-text description of the component to generate
    pub description: String,
    /// Target framework, selects the instruction template
    #[serde(default)]
    pub framework: Framework,
    /// Repository files embedded in the prompt as context
    #[serde(default)]
    pub context: Vec<ContextFile>,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>, framework: Framework) -> Self {
        Self {
            description: description.into(),
            framework,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<ContextFile>) -> Self {
        self.context = context;
        self
    }
}

/// A repository file carried along as prompt context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextFile {
    pub path: String,
    pub contents: String,
}

/// The outcome of one relay call
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    /// Provider text, verbatim
    pub raw: String,
    /// First fenced code block of the reply, if it contained one
    pub code: Option<String>,
    /// Model that produced the reply
    pub model: String,
    /// Backend that served the call
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"model":"m","choices":[{"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content(), Some("hello"));
    }

    #[test]
    fn test_first_content_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(response.first_content().is_none());
    }

    #[test]
    fn test_request_serialization_skips_unset_options() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            stream: false,
            max_tokens: None,
            temperature: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("temperature"));
        assert!(json.contains("\"stream\":false"));
    }
}
