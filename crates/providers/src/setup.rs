//! Provider construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use athly_config::AppConfig;
use athly_core::provider::{ModelSettings, Provider};

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// A `[providers.<name>]` section may override the key and base URL;
/// otherwise the global key and the well-known URL are used.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    Arc::new(client_for(config))
}

fn client_for(config: &AppConfig) -> OpenAiCompatProvider {
    let name = config.provider.as_str();
    let section = config.providers.get(name);

    let api_key = config.resolved_api_key().unwrap_or_default();
    let base_url = section
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    if api_key.is_empty() && name != "ollama" {
        tracing::warn!(provider = name, "No API key configured; model calls will be rejected");
    }

    tracing::debug!(provider = name, base_url = %base_url, "Building provider");

    OpenAiCompatProvider::new(
        name,
        base_url,
        api_key,
        Duration::from_secs(config.timeout_secs),
    )
}

/// Model parameters for every call, honouring a per-provider default model.
pub fn model_settings(config: &AppConfig) -> ModelSettings {
    let model = config
        .providers
        .get(&config.provider)
        .and_then(|p| p.default_model.clone())
        .unwrap_or_else(|| config.model.clone());

    ModelSettings::new(model)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "mistral" => "https://api.mistral.ai/v1".into(),
        "huggingface" | "hf" => "https://router.huggingface.co/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
