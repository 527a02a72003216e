//! Provider trait — the abstraction over language-model backends.
//!
//! A Provider knows how to send a message list to a model and get one
//! completion back. The orchestration core treats it as an opaque
//! text-completion service.
//!
//! Implementations: OpenAI-compatible endpoints (Mistral, Hugging Face router,
//! OpenAI, OpenRouter, Ollama).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "mistral-large-latest")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.3
}

/// Model parameters shared by every call a component makes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build a request carrying the given messages.
    pub fn request(&self, messages: Vec<Message>) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Build a single-prompt request.
    pub fn prompt(&self, prompt: impl Into<String>) -> ProviderRequest {
        self.request(vec![Message::user(prompt)])
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The tool loop and the capabilities call `complete()` without knowing which
/// backend is behind it. Any failure, timeouts included, comes back as a
/// [`ProviderError`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "mistral").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_build_requests() {
        let settings = ModelSettings::new("mistral-large-latest")
            .with_temperature(0.2)
            .with_max_tokens(512);
        let req = settings.prompt("Combien de séances ?");
        assert_eq!(req.model, "mistral-large-latest");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.max_tokens, Some(512));
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn settings_default_temperature() {
        let settings = ModelSettings::new("m");
        assert!((settings.temperature - 0.3).abs() < f32::EPSILON);
        assert!(settings.max_tokens.is_none());
    }
}
