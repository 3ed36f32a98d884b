//! Shared constants for the generation library

/// Default values used when configuration does not override them
pub mod defaults {
    /// Base URL of the hosted OpenAI-compatible API
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

    /// Base URL of a local Ollama daemon
    pub const OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";

    /// Model requested from the hosted backend
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";

    /// Model requested from the local backend
    pub const OLLAMA_MODEL: &str = "qwen2.5-coder:7b";

    /// Wall-clock budget for one completion call, in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Sampling temperature when the caller does not set one
    pub const TEMPERATURE: f32 = 0.7;
}

/// Environment variables read by [`crate::config::GenerationConfig::from_env`]
pub mod env_vars {
    pub const BACKEND: &str = "UISMITH_BACKEND";
    pub const MODEL: &str = "UISMITH_MODEL";
    pub const BASE_URL: &str = "UISMITH_BASE_URL";
    pub const API_KEY: &str = "UISMITH_API_KEY";
    pub const TIMEOUT_SECS: &str = "UISMITH_TIMEOUT_SECS";
}
