//! Backend registry for runtime backend discovery and instantiation
//!
//! The registry manages available backends and provides factory methods to
//! create backend instances by name.

use std::collections::HashMap;

use super::{BackendError, BackendInfo, CompletionBackend, OllamaBackend, OpenAiBackend};
use crate::config::GenerationConfig;

/// Factory trait for creating backend instances
pub trait BackendFactory: Send + Sync {
    /// Create a new backend instance from configuration
    fn create(&self, config: &GenerationConfig) -> Result<Box<dyn CompletionBackend>, BackendError>;

    /// Get information about this backend
    fn info(&self, config: &GenerationConfig) -> BackendInfo;
}

/// Factory for the hosted OpenAI-compatible backend
pub struct OpenAiFactory;

impl BackendFactory for OpenAiFactory {
    fn create(&self, config: &GenerationConfig) -> Result<Box<dyn CompletionBackend>, BackendError> {
        Ok(Box::new(OpenAiBackend::from_config(config)?))
    }

    fn info(&self, config: &GenerationConfig) -> BackendInfo {
        let has_key = config
            .api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);
        BackendInfo {
            name: "openai".to_string(),
            description: "Hosted OpenAI-compatible chat-completions API".to_string(),
            active: false,
            available: has_key,
            unavailable_reason: (!has_key)
                .then(|| "No API key configured (UISMITH_API_KEY)".to_string()),
        }
    }
}

/// Factory for the local Ollama backend
pub struct OllamaFactory;

impl BackendFactory for OllamaFactory {
    fn create(&self, config: &GenerationConfig) -> Result<Box<dyn CompletionBackend>, BackendError> {
        Ok(Box::new(OllamaBackend::from_config(config)?))
    }

    fn info(&self, _config: &GenerationConfig) -> BackendInfo {
        let (available, unavailable_reason) = OllamaBackend::check_availability();
        BackendInfo {
            name: "ollama".to_string(),
            description: "Local Ollama daemon via its OpenAI-compatible API".to_string(),
            active: false,
            available,
            unavailable_reason,
        }
    }
}

/// Registry of available backends
pub struct BackendRegistry {
    factories: HashMap<&'static str, Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        let mut factories: HashMap<&'static str, Box<dyn BackendFactory>> = HashMap::new();
        factories.insert("openai", Box::new(OpenAiFactory));
        factories.insert("ollama", Box::new(OllamaFactory));
        Self { factories }
    }

    /// Create a backend instance by registry name
    pub fn create(
        &self,
        name: &str,
        config: &GenerationConfig,
    ) -> Result<Box<dyn CompletionBackend>, BackendError> {
        let factory = self.factories.get(name).ok_or_else(|| {
            BackendError::Config(format!(
                "Unknown backend '{}'. Available: {}",
                name,
                self.names().join(", ")
            ))
        })?;
        factory.create(config)
    }

    /// List information about every registered backend
    pub fn list(&self, config: &GenerationConfig) -> Vec<BackendInfo> {
        let mut infos: Vec<BackendInfo> = self
            .factories
            .values()
            .map(|factory| factory.info(config))
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Registered backend names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
