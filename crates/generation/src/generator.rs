//! Generator - single entry point for all generation operations
//!
//! The generator abstracts over completion backends, validates input,
//! renders the instruction template, and makes exactly one outbound call
//! per invocation. No retries, no state between calls.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::{BackendError, BackendInfo, BackendRegistry, CompletionBackend};
use crate::config::GenerationConfig;
use crate::extract::extract_code;
use crate::prompt::{self, Framework, PromptError};
use crate::types::{ChatMessage, ChatRequest, Generation, GenerationRequest};

/// Error types for generator operations
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Description must not be empty")]
    EmptyPrompt,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Backend switch failed: {0}")]
    SwitchFailed(String),
}

/// The single entry point for ALL generation operations.
///
/// Application code should only interact with the Generator, never with
/// backends directly. The generator handles backend selection and forwards
/// each validated request as one completion call.
pub struct Generator {
    /// The currently active backend
    backend: Arc<RwLock<Box<dyn CompletionBackend>>>,
    /// Registry of available backends
    registry: BackendRegistry,
    /// Name of the current backend
    current_backend_name: Arc<RwLock<String>>,
    /// Relay settings shared by every call
    config: GenerationConfig,
}

impl Generator {
    /// Create a generator with the backend named in the configuration
    pub fn from_config(config: GenerationConfig) -> Result<Self, GenerationError> {
        let registry = BackendRegistry::new();
        let backend = registry.create(&config.backend, &config)?;
        let name = backend.name().to_string();
        Ok(Self {
            backend: Arc::new(RwLock::new(backend)),
            registry,
            current_backend_name: Arc::new(RwLock::new(name)),
            config,
        })
    }

    /// Create a generator with a specific backend instance
    pub fn with_backend(backend: Box<dyn CompletionBackend>, config: GenerationConfig) -> Self {
        let name = backend.name().to_string();
        Self {
            backend: Arc::new(RwLock::new(backend)),
            registry: BackendRegistry::new(),
            current_backend_name: Arc::new(RwLock::new(name)),
            config,
        }
    }

    /// Get the name of the currently active backend
    pub async fn current_backend_name(&self) -> String {
        self.current_backend_name.read().await.clone()
    }

    /// Switch to a different backend
    pub async fn switch_backend(&self, name: &str) -> Result<(), GenerationError> {
        // Create the new backend first to validate the name and settings
        let new_backend = self
            .registry
            .create(name, &self.config)
            .map_err(|e| GenerationError::SwitchFailed(e.to_string()))?;

        {
            let mut guard = self.backend.write().await;
            *guard = new_backend;
        }
        {
            let mut name_guard = self.current_backend_name.write().await;
            *name_guard = name.to_string();
        }

        log::info!("Switched to backend: {}", name);
        Ok(())
    }

    /// List all available backends, marking the active one
    pub async fn available_backends(&self) -> Vec<BackendInfo> {
        let current = self.current_backend_name().await;
        let mut infos = self.registry.list(&self.config);
        for info in &mut infos {
            info.active = info.name == current;
        }
        infos
    }

    /// Health check the current backend
    pub async fn health_check(&self) -> bool {
        let guard = self.backend.read().await;
        guard.health_check().await
    }

    /// Generate UI code from a description
    ///
    /// Empty and whitespace-only descriptions are rejected before any
    /// request is issued.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        if request.description.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let (system, user) = prompt::render(request)?;
        self.complete(system, user).await
    }

    /// Improve previously generated code based on feedback
    pub async fn refine(
        &self,
        code: &str,
        feedback: &str,
        framework: Framework,
    ) -> Result<Generation, GenerationError> {
        if feedback.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let (system, user) = prompt::render_refine(code, feedback, framework)?;
        self.complete(system, user).await
    }

    /// One outbound completion call; the raw reply is kept verbatim
    async fn complete(&self, system: String, user: String) -> Result<Generation, GenerationError> {
        let guard = self.backend.read().await;

        let request = ChatRequest {
            model: guard.default_model().to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            stream: false,
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let response = guard.chat_completion(&request).await?;
        let raw = response
            .first_content()
            .ok_or(BackendError::EmptyResponse)?
            .to_string();

        log::info!(
            "Completion served by {} ({} chars)",
            guard.name(),
            raw.len()
        );

        Ok(Generation {
            code: extract_code(&raw),
            model: response.model.unwrap_or(request.model),
            backend: guard.name().to_string(),
            raw,
        })
    }
}

/// Shared generator type for application state
pub type SharedGenerator = Arc<Generator>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatChoice, ChatResponse, ChoiceMessage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every outbound request and replies with a canned body
    #[derive(Debug)]
    struct RecordingBackend {
        requests: Arc<Mutex<Vec<ChatRequest>>>,
        reply: Option<String>,
        fail: bool,
    }

    impl RecordingBackend {
        fn replying(reply: &str) -> (Self, Arc<Mutex<Vec<ChatRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    requests: requests.clone(),
                    reply: Some(reply.to_string()),
                    fail: false,
                },
                requests,
            )
        }

        fn failing() -> Self {
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
                reply: None,
                fail: true,
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn description(&self) -> &'static str {
            "test backend"
        }

        fn base_url(&self) -> &str {
            "http://test.invalid"
        }

        fn default_model(&self) -> &str {
            "test-model"
        }

        async fn health_check(&self) -> bool {
            !self.fail
        }

        async fn chat_completion(
            &self,
            request: &ChatRequest,
        ) -> Result<ChatResponse, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(BackendError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(ChatResponse {
                model: Some("test-model".to_string()),
                choices: vec![ChatChoice {
                    message: ChoiceMessage {
                        role: Some("assistant".to_string()),
                        content: self.reply.clone(),
                    },
                    finish_reason: Some("stop".to_string()),
                }],
            })
        }
    }

    fn generator_with(backend: RecordingBackend) -> Generator {
        Generator::with_backend(Box::new(backend), GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_exactly_one_request_embeds_description() {
        let (backend, requests) = RecordingBackend::replying("ok");
        let generator = generator_with(backend);

        let request = GenerationRequest::new("a blue submit button", Framework::Svelte);
        generator.generate(&request).await.unwrap();

        let recorded = requests.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        let user_message = &recorded[0].messages[1];
        assert_eq!(user_message.role, "user");
        assert!(user_message.content.contains("a blue submit button"));
    }

    #[tokio::test]
    async fn test_raw_is_verbatim() {
        let reply = r#"<button style="color:blue">Submit</button>"#;
        let (backend, _) = RecordingBackend::replying(reply);
        let generator = generator_with(backend);

        let request = GenerationRequest::new("a blue submit button", Framework::Html);
        let generation = generator.generate(&request).await.unwrap();

        assert_eq!(generation.raw, reply);
        // no fence in the reply, so nothing was extracted
        assert!(generation.code.is_none());
    }

    #[tokio::test]
    async fn test_fenced_reply_extracts_code() {
        let (backend, _) = RecordingBackend::replying("```html\n<p>hi</p>\n```");
        let generator = generator_with(backend);

        let request = GenerationRequest::new("a paragraph", Framework::Html);
        let generation = generator.generate(&request).await.unwrap();

        assert_eq!(generation.code.as_deref(), Some("<p>hi</p>"));
        assert!(generation.raw.contains("```html"));
    }

    #[tokio::test]
    async fn test_empty_description_issues_no_request() {
        let (backend, requests) = RecordingBackend::replying("ok");
        let generator = generator_with(backend);

        let request = GenerationRequest::new("   \n ", Framework::Svelte);
        let err = generator.generate(&request).await.unwrap_err();

        assert!(matches!(err, GenerationError::EmptyPrompt));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_and_stays_usable() {
        let generator = generator_with(RecordingBackend::failing());
        let request = GenerationRequest::new("anything", Framework::Vue);

        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Backend(_)));

        // the generator is still usable for a subsequent attempt
        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Backend(_)));
    }

    #[tokio::test]
    async fn test_refine_embeds_code_and_feedback() {
        let (backend, requests) = RecordingBackend::replying("```html\n<b>new</b>\n```");
        let generator = generator_with(backend);

        generator
            .refine("<b>old</b>", "make it bold", Framework::Html)
            .await
            .unwrap();

        let recorded = requests.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        let user_message = &recorded[0].messages[1];
        assert!(user_message.content.contains("<b>old</b>"));
        assert!(user_message.content.contains("make it bold"));
    }

    #[tokio::test]
    async fn test_refine_rejects_empty_feedback() {
        let (backend, requests) = RecordingBackend::replying("ok");
        let generator = generator_with(backend);

        let err = generator
            .refine("<b>old</b>", "  ", Framework::Html)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyPrompt));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_switch_to_unknown_backend_fails() {
        let (backend, _) = RecordingBackend::replying("ok");
        let generator = generator_with(backend);

        let err = generator.switch_backend("mainframe").await.unwrap_err();
        assert!(matches!(err, GenerationError::SwitchFailed(_)));
        // active backend is unchanged
        assert_eq!(generator.current_backend_name().await, "recording");
    }
}
