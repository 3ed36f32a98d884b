//! Prompt relay library for UI code generation
//!
//! This library is the core of uismith: it turns a natural-language
//! description of a UI component into generated code by relaying an
//! instruction template to an OpenAI-compatible chat-completions service.
//!
//! - **Backends**: pluggable completion services (hosted OpenAI-compatible
//!   APIs, a local Ollama daemon) behind a single trait
//! - **Prompts**: per-framework instruction templates with substitution
//!   points for the description and optional repository context
//! - **Generator**: the single entry point that validates input, renders
//!   the template, makes exactly one outbound call, and returns the reply
//!
//! # Example
//!
//! ```rust,ignore
//! use generation::{Generator, GenerationConfig, GenerationRequest, Framework};
//!
//! let generator = Generator::from_config(GenerationConfig::from_env())?;
//! let request = GenerationRequest::new("a blue submit button", Framework::Svelte);
//! let generation = generator.generate(&request).await?;
//! println!("{}", generation.code.as_deref().unwrap_or(&generation.raw));
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod extract;
pub mod generator;
pub mod prompt;
pub mod types;

// Re-exports for convenience
pub use backend::{
    BackendError, BackendFactory, BackendInfo, BackendRegistry, CompletionBackend,
    OllamaBackend, OpenAiBackend,
};
pub use config::GenerationConfig;
pub use extract::extract_code;
pub use generator::{GenerationError, Generator, SharedGenerator};
pub use prompt::Framework;
pub use types::{ContextFile, Generation, GenerationRequest};
