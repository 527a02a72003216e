//! Provider stand-in for capability tests.

use std::sync::Mutex;

use async_trait::async_trait;
use athly_core::error::ProviderError;
use athly_core::message::Message;
use athly_core::provider::{Provider, ProviderRequest, ProviderResponse};

/// Replies with a fixed text (or fails) and records every prompt it receives.
pub struct RecordingProvider {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        match &self.reply {
            Some(text) => Ok(ProviderResponse {
                message: Message::assistant(text.clone()),
                usage: None,
                model: request.model,
            }),
            None => Err(ProviderError::Timeout("scripted timeout".into())),
        }
    }
}
