//! Pluggable local language-model backends
//!
//! The advisor only ever needs one thing from a model: turn a prompt into a
//! completion. Every backend here runs against a local server (Ollama,
//! llama-server and friends) or is a mock.
//!
//! # Architecture
//!
//! - `AIBackend` trait: the completion interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let text = client.complete("Say hello", 64).await?;
//!     println!("{}", text);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AdvisorConfig, BackendKind};
use crate::error::Result;

/// Trait defining the interface for all completion backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Complete a prompt, generating at most `max_tokens` tokens
    ///
    /// The returned text is trimmed and never empty.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (llama-server, vLLM, LocalAI, Docker Model Runner, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match BackendKind::parse(&backend) {
            Some(BackendKind::Ollama) => OllamaBackend::from_env().map(AIClient::Ollama),
            Some(BackendKind::OpenAICompatible) => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            Some(BackendKind::Mock) => Some(AIClient::mock()),
            None => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AIClient::Ollama)
            }
        }
    }

    /// Create an AI client from the `[advisor]` config section
    ///
    /// Returns None when the selected backend has no host configured.
    pub fn from_config(config: &AdvisorConfig) -> Option<Self> {
        let timeout = config.timeout_secs.map(Duration::from_secs);

        let client = match config.backend {
            BackendKind::Mock => return Some(AIClient::mock()),
            BackendKind::Ollama => {
                let host = config.host.as_deref()?;
                let model = config.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL);
                AIClient::Ollama(OllamaBackend::new(host, model))
            }
            BackendKind::OpenAICompatible => {
                let host = config.host.as_deref()?;
                let model = config
                    .model
                    .as_deref()
                    .unwrap_or(openai_compatible::DEFAULT_MODEL);
                let backend = match config.api_key.as_deref() {
                    Some(key) => OpenAICompatibleBackend::with_api_key(host, model, key),
                    None => OpenAICompatibleBackend::new(host, model),
                };
                AIClient::OpenAICompatible(backend)
            }
        };

        Some(match timeout {
            Some(t) => client.with_timeout(t),
            None => client,
        })
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    /// Bound each request to `timeout` (no-op for mock)
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_timeout(timeout)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_timeout(timeout)),
            AIClient::Mock(b) => AIClient::Mock(b),
        }
    }

    /// Backend name for display
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::Ollama(_) => "ollama",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        match self {
            AIClient::Ollama(b) => b.complete(prompt, max_tokens).await,
            AIClient::OpenAICompatible(b) => b.complete(prompt, max_tokens).await,
            AIClient::Mock(b) => b.complete(prompt, max_tokens).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Trim a raw completion, treating blank output as a failure
pub(crate) fn clean_completion(raw: &str, backend: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(crate::error::Error::InvalidData(format!(
            "Empty completion from {}",
            backend
        )));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
        assert_eq!(client.backend_name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_requires_host() {
        let config = AdvisorConfig {
            host: None,
            ..AdvisorConfig::default()
        };
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_selects_backend() {
        let config = AdvisorConfig {
            backend: BackendKind::OpenAICompatible,
            host: Some("http://localhost:8080/".into()),
            model: Some("qwen2.5".into()),
            timeout_secs: Some(30),
            ..AdvisorConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.backend_name(), "openai_compatible");
        assert_eq!(client.host(), "http://localhost:8080");
        assert_eq!(client.model(), "qwen2.5");

        let mock = AdvisorConfig {
            backend: BackendKind::Mock,
            host: None,
            ..AdvisorConfig::default()
        };
        assert_eq!(AIClient::from_config(&mock).unwrap().backend_name(), "mock");
    }

    #[test]
    fn test_clean_completion() {
        assert_eq!(clean_completion("  hi \n", "x").unwrap(), "hi");
        assert!(clean_completion(" \n ", "x").is_err());
    }
}
