//! Pluggable narrative backend abstraction
//!
//! The insight orchestrator treats the narrative generator as an opaque,
//! swappable capability: any backend that can take a structured prompt and
//! return free text qualifies, and the engine never assumes a specific
//! model identity.
//!
//! # Architecture
//!
//! - `NarrativeBackend` trait: the interface every backend implements
//! - `NarrativeClient` enum: concrete wrapper with Clone + compile-time
//!   dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`,
//!   `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock).
//!   Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::{MockBackend, MockMode};
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::{NarrativePrompt, RawNarrative};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for narrative backends
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Generate free-text insight narrative for a rendered prompt
    async fn generate_narrative(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for logging)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete narrative client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum NarrativeClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl NarrativeClient {
    /// Create a narrative client from environment variables
    ///
    /// Returns None when the selected backend's required variables are not
    /// set; the orchestrator then runs fallback-only.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(NarrativeClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(NarrativeClient::OpenAICompatible)
            }
            "mock" => Some(NarrativeClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(NarrativeClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        NarrativeClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        NarrativeClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl NarrativeBackend for NarrativeClient {
    async fn generate_narrative(&self, prompt: &str) -> Result<String> {
        match self {
            NarrativeClient::Ollama(b) => b.generate_narrative(prompt).await,
            NarrativeClient::OpenAICompatible(b) => b.generate_narrative(prompt).await,
            NarrativeClient::Mock(b) => b.generate_narrative(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            NarrativeClient::Ollama(b) => b.health_check().await,
            NarrativeClient::OpenAICompatible(b) => b.health_check().await,
            NarrativeClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            NarrativeClient::Ollama(b) => b.model(),
            NarrativeClient::OpenAICompatible(b) => b.model(),
            NarrativeClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            NarrativeClient::Ollama(b) => b.host(),
            NarrativeClient::OpenAICompatible(b) => b.host(),
            NarrativeClient::Mock(b) => b.host(),
        }
    }
}
