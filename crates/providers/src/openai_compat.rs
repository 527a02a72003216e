//! OpenAI-compatible provider implementation.
//!
//! Works with: Mistral, the Hugging Face inference router, OpenAI,
//! OpenRouter, Ollama, and any endpoint exposing `/chat/completions`.
//!
//! Capabilities are invoked through a textual protocol rather than native
//! function calling, so tool-role messages are sent as user observations.

use std::time::Duration;

use async_trait::async_trait;
use athly_core::error::ProviderError;
use athly_core::message::{Message, Role};
use athly_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An OpenAI-compatible chat-completion provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider whose calls give up after `timeout`.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to a default HTTP client");
                reqwest::Client::new()
            });

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::Tool => ApiMessage {
                    role: "user".into(),
                    content: Some(format!(
                        "Observation [{}]: {}",
                        m.capability.as_deref().unwrap_or("capability"),
                        m.content
                    )),
                },
                role => ApiMessage {
                    role: match role {
                        Role::System => "system".into(),
                        Role::Assistant => "assistant".into(),
                        _ => "user".into(),
                    },
                    content: Some(m.content.clone()),
                },
            })
            .collect()
    }

    fn map_transport_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl athly_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::ApiError {
                    status_code: 200,
                    message: format!("Failed to parse response: {e}"),
                }
            }
        })?;

        into_provider_response(api_response, &request.model)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Ok(response.status().is_success())
    }
}

fn into_provider_response(
    api_response: ApiResponse,
    requested_model: &str,
) -> Result<ProviderResponse, ProviderError> {
    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    let message = Message::assistant(choice.message.content.unwrap_or_default());

    let usage = api_response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(ProviderResponse {
        message,
        usage,
        model: api_response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
    })
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(300);

    #[test]
    fn trailing_slash_trimmed() {
        let provider = OpenAiCompatProvider::new("custom", "http://host/v1/", "", TIMEOUT);
        assert_eq!(provider.base_url(), "http://host/v1");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![
            Message::system("Tu es un coach"),
            Message::user("Bonjour"),
            Message::assistant("Salut"),
        ];
        let api_messages = OpenAiCompatProvider::to_api_messages(&messages);
        let roles: Vec<&str> = api_messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn tool_messages_become_observations() {
        let msg = Message::tool("expert_sport", "3 séances par semaine");
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        assert_eq!(api_msgs[0].role, "user");
        assert_eq!(
            api_msgs[0].content.as_deref(),
            Some("Observation [expert_sport]: 3 séances par semaine")
        );
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "mistral-large-latest",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Voici le plan"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let response = into_provider_response(parsed, "requested").unwrap();
        assert_eq!(response.message.content, "Voici le plan");
        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.model, "mistral-large-latest");
        assert_eq!(response.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn missing_choices_is_empty_response() {
        let parsed: ApiResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = into_provider_response(parsed, "m").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let data = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let response = into_provider_response(parsed, "fallback-model").unwrap();
        assert_eq!(response.message.content, "");
        assert_eq!(response.model, "fallback-model");
    }
}
