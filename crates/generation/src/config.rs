//! Configuration for the generation library

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, env_vars};

/// Settings for the relay
///
/// Everything has a default so the library works out of the box against a
/// local Ollama daemon; the hosted backend additionally needs `api_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Registry name of the backend serving completion calls
    /// (e.g. "openai", "ollama")
    pub backend: String,
    /// Model override; each backend has its own default
    pub model: Option<String>,
    /// Base URL override; each backend has its own default
    pub base_url: Option<String>,
    /// Credential for the hosted backend
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion length cap forwarded to the provider
    pub max_tokens: Option<u32>,
    /// Wall-clock budget for one completion call
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            model: None,
            base_url: None,
            api_key: None,
            temperature: defaults::TEMPERATURE,
            max_tokens: None,
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    /// Read settings from `UISMITH_*` environment variables
    ///
    /// Unset variables keep their defaults; unparsable numeric values are
    /// logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(backend) = std::env::var(env_vars::BACKEND) {
            config.backend = backend;
        }
        if let Ok(model) = std::env::var(env_vars::MODEL) {
            config.model = Some(model);
        }
        if let Ok(base_url) = std::env::var(env_vars::BASE_URL) {
            config.base_url = Some(base_url);
        }
        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            config.api_key = Some(api_key);
        }
        if let Ok(raw) = std::env::var(env_vars::TIMEOUT_SECS) {
            match raw.parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(_) => log::warn!(
                    "Ignoring unparsable {}={:?}",
                    env_vars::TIMEOUT_SECS,
                    raw
                ),
            }
        }

        config
    }
}
