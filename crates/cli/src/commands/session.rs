//! Wiring shared by `chat` and `program`: config → provider, knowledge,
//! capabilities → orchestrator.

use std::sync::Arc;

use athly_agent::{Orchestrator, Router};
use athly_config::AppConfig;
use athly_core::knowledge::KnowledgeBase;
use athly_knowledge::{EmptyKnowledgeBase, InMemoryKnowledgeBase};
use tracing::{info, warn};

/// Load the configuration, refusing to go on without an API key.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() && config.provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    ATHLY_API_KEY        (generic)");
        eprintln!("    MISTRAL_API_KEY      (provider = \"mistral\", the default)");
        eprintln!("    HUGGINGFACE_API_KEY  (provider = \"huggingface\")");
        eprintln!("    OPENAI_API_KEY       (provider = \"openai\")");
        eprintln!("    OPENROUTER_API_KEY   (provider = \"openrouter\")");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    Ok(config)
}

/// The retrieval store described by `[knowledge]`.
pub fn build_knowledge(config: &AppConfig) -> Result<Arc<dyn KnowledgeBase>, Box<dyn std::error::Error>> {
    let settings = &config.knowledge;
    if !settings.seed_samples && settings.data_dir.is_none() {
        warn!("Knowledge base disabled: no data_dir and seed_samples = false");
        return Ok(Arc::new(EmptyKnowledgeBase));
    }

    let mut kb = if settings.seed_samples {
        InMemoryKnowledgeBase::with_samples()
    } else {
        InMemoryKnowledgeBase::new()
    };
    if let Some(dir) = &settings.data_dir {
        let added = kb
            .load_dir(dir)
            .map_err(|e| format!("Failed to load knowledge from {}: {e}", dir.display()))?;
        info!(dir = %dir.display(), documents = added, "Knowledge notes loaded");
    }
    Ok(Arc::new(kb))
}

/// One orchestrator (one conversation) built from the configuration.
pub fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let provider = athly_providers::build_from_config(config);
    let settings = athly_providers::model_settings(config);
    let knowledge = build_knowledge(config)?;

    let registry = athly_capabilities::default_registry(
        provider.clone(),
        settings.clone(),
        knowledge,
        config.knowledge.n_results,
    )?;

    let orchestrator = Orchestrator::new(provider, settings, registry)
        .with_max_iterations(config.orchestrator.max_iterations)
        .with_apology(config.orchestrator.apology_message.clone())
        .with_router(Router::new().with_extra_patterns(&config.orchestrator.extra_complex_patterns));
    Ok(orchestrator)
}
