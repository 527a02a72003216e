//! Configuration loading, validation, and management for Athly.
//!
//! Loads configuration from `~/.athly/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use athly_core::message::DEFAULT_APOLOGY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.athly/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Language-model provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model used for every call
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on one model call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Orchestration settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Retrieval store settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "mistral".into()
}
fn default_model() -> String {
    "mistral-large-latest".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_timeout_secs() -> u64 {
    300
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("orchestrator", &self.orchestrator)
            .field("knowledge", &self.knowledge)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Model calls allowed per agentic loop run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Returned by `process_chat` when a turn fails
    #[serde(default = "default_apology")]
    pub apology_message: String,

    /// Substrings (matched case-insensitively) that send a message down the agentic path
    #[serde(default)]
    pub extra_complex_patterns: Vec<String>,
}

fn default_max_iterations() -> u32 {
    25
}
fn default_apology() -> String {
    DEFAULT_APOLOGY.into()
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            apology_message: default_apology(),
            extra_complex_patterns: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory of .md/.txt coaching notes to index at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Passages retrieved per query
    #[serde(default = "default_n_results")]
    pub n_results: usize,

    /// Seed the store with the built-in notes
    #[serde(default = "default_true")]
    pub seed_samples: bool,
}

fn default_n_results() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            n_results: default_n_results(),
            seed_samples: true,
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.athly/config.toml),
    /// then apply environment overrides (see [`AppConfig::apply_env`]).
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply environment overrides, reading variables through `var`.
    ///
    /// - `ATHLY_PROVIDER` and `ATHLY_MODEL` replace provider and model. An
    ///   explicit model also beats the active provider section's `default_model`.
    /// - Without a key in the file, `ATHLY_API_KEY` is used, then the vendor
    ///   variable of the (overridden) provider only, e.g. `HUGGINGFACE_API_KEY`
    ///   for `huggingface`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = var("ATHLY_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = var("ATHLY_MODEL") {
            self.model = model;
            if let Some(section) = self.providers.get_mut(&self.provider) {
                section.default_model = None;
            }
        }

        if self.api_key.is_none() {
            self.api_key = var("ATHLY_API_KEY")
                .or_else(|| api_key_env_var(&self.provider).and_then(|name| var(name)));
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".athly")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be at least 1".into(),
            ));
        }
        if self.orchestrator.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "orchestrator.max_iterations must be at least 1".into(),
            ));
        }
        if self.knowledge.n_results == 0 {
            return Err(ConfigError::ValidationError(
                "knowledge.n_results must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The API key for the active provider: provider section first, then the global key.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.providers
            .get(&self.provider)
            .and_then(|p| p.api_key.clone())
            .or_else(|| self.api_key.clone())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.resolved_api_key().is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            orchestrator: OrchestratorConfig::default(),
            knowledge: KnowledgeConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// The vendor environment variable holding a key for `provider`.
pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
    match provider {
        "mistral" => Some("MISTRAL_API_KEY"),
        "huggingface" | "hf" => Some("HUGGINGFACE_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        _ => None,
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for athly_core::Error {
    fn from(err: ConfigError) -> Self {
        athly_core::Error::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "mistral");
        assert_eq!(config.model, "mistral-large-latest");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.orchestrator.max_iterations, 25);
        assert_eq!(config.knowledge.n_results, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.orchestrator.apology_message, DEFAULT_APOLOGY);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iteration_budget_rejected() {
        let mut config = AppConfig::default();
        config.orchestrator.max_iterations = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().provider, "mistral");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
provider = "huggingface"
model = "Qwen/QwQ-32B"

[orchestrator]
max_iterations = 10
extra_complex_patterns = ["semaine type"]

[knowledge]
data_dir = "/srv/athly/notes"

[providers.huggingface]
api_key = "hf_secret"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider, "huggingface");
        assert_eq!(config.orchestrator.max_iterations, 10);
        assert_eq!(config.orchestrator.extra_complex_patterns, vec!["semaine type"]);
        assert_eq!(config.orchestrator.apology_message, DEFAULT_APOLOGY);
        assert_eq!(config.knowledge.n_results, 5);
        assert_eq!(
            config.knowledge.data_dir.as_deref(),
            Some(Path::new("/srv/athly/notes"))
        );
        assert_eq!(config.resolved_api_key().as_deref(), Some("hf_secret"));
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = \"hot\"").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn debug_redacts_keys() {
        let mut config = AppConfig {
            api_key: Some("sk-very-secret".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "mistral".into(),
            ProviderConfig {
                api_key: Some("mistral-secret".into()),
                ..ProviderConfig::default()
            },
        );
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(!debug.contains("mistral-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("mistral-large-latest"));
        assert!(toml_str.contains("max_iterations = 25"));
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn vendor_key_follows_overridden_provider() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("MISTRAL_API_KEY", "mistral-secret"),
            ("HUGGINGFACE_API_KEY", "hf-secret"),
            ("ATHLY_PROVIDER", "huggingface"),
        ]));
        assert_eq!(config.provider, "huggingface");
        assert_eq!(config.resolved_api_key().as_deref(), Some("hf-secret"));
    }

    #[test]
    fn other_vendor_keys_are_never_borrowed() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "sk-openai")]));
        assert_eq!(config.provider, "mistral");
        assert!(!config.has_api_key());
    }

    #[test]
    fn athly_key_and_file_key_take_precedence() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("ATHLY_API_KEY", "athly-secret"),
            ("MISTRAL_API_KEY", "mistral-secret"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("athly-secret"));

        let mut config = AppConfig {
            api_key: Some("file-secret".into()),
            ..AppConfig::default()
        };
        config.apply_env(env(&[("ATHLY_API_KEY", "athly-secret")]));
        assert_eq!(config.api_key.as_deref(), Some("file-secret"));
    }

    #[test]
    fn env_model_beats_section_default_model() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "mistral".into(),
            ProviderConfig {
                api_key: Some("section-secret".into()),
                default_model: Some("mistral-small-latest".into()),
                ..ProviderConfig::default()
            },
        );
        config.apply_env(env(&[("ATHLY_MODEL", "open-mistral-nemo")]));
        assert_eq!(config.model, "open-mistral-nemo");
        let section = &config.providers["mistral"];
        assert_eq!(section.default_model, None);
        assert_eq!(section.api_key.as_deref(), Some("section-secret"));
    }

    #[test]
    fn local_provider_has_no_vendor_variable() {
        assert_eq!(api_key_env_var("ollama"), None);
        assert_eq!(api_key_env_var("hf"), Some("HUGGINGFACE_API_KEY"));
    }
}
