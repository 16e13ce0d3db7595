//! Mock backend for testing
//!
//! Returns a canned completion (or a scripted failure) and records every
//! prompt it receives. Useful for unit tests and development without a
//! running LLM server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

const DEFAULT_REPLY: &str = "Keep tracking your spending and aim to save at least 20% of income.";

/// Mock AI backend for testing
///
/// Clones share the prompt log, so a test can hand a clone to the code under
/// test and inspect calls afterwards.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: std::result::Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self::with_reply(DEFAULT_REPLY)
    }

    /// Mock that answers every prompt with `reply`
    pub fn with_reply(reply: &str) -> Self {
        Self {
            healthy: true,
            reply: Ok(reply.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock whose completions always fail with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            healthy: false,
            reply: Err(message.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Every prompt received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            Ok(text) => Ok(text.trim().to_string()),
            Err(message) => Err(Error::InvalidData(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_reply_and_call_log() {
        let mock = MockBackend::with_reply("  spend less  ");
        let observer = mock.clone();

        assert_eq!(mock.complete("first", 10).await.unwrap(), "spend less");
        mock.complete("second", 10).await.unwrap();

        assert_eq!(observer.calls(), 2);
        assert_eq!(observer.prompts(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockBackend::failing("model not loaded");
        let err = mock.complete("q", 10).await.unwrap_err();
        assert!(err.to_string().contains("model not loaded"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let healthy = MockBackend::new();
        assert!(healthy.health_check().await);

        let unhealthy = MockBackend::unhealthy();
        assert!(!unhealthy.health_check().await);
    }
}
