//! `athly doctor` — Diagnose configuration and provider health.

use athly_config::AppConfig;
use athly_core::knowledge::KnowledgeBase;
use athly_core::provider::Provider;

use super::session;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Athly Doctor — System Diagnostics");
    println!("====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `athly onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found.");
            return Ok(());
        }
    };

    let settings = athly_providers::model_settings(&config);
    println!();
    println!("   Provider:    {}", config.provider);
    println!("   Model:       {}", settings.model);
    println!("   Temperature: {}", settings.temperature);
    println!("   Timeout:     {}s", config.timeout_secs);
    println!("   Iterations:  {}", config.orchestrator.max_iterations);
    println!();

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else if config.provider == "ollama" {
        println!("  ✅ Local provider, no API key needed");
    } else {
        println!("  ❌ No API key — set ATHLY_API_KEY or MISTRAL_API_KEY");
        issues += 1;
    }

    match session::build_knowledge(&config) {
        Ok(kb) => match kb.count().await {
            Ok(n) => println!("  ✅ Knowledge base: {n} notes ({})", kb.name()),
            Err(e) => {
                println!("  ❌ Knowledge base unreadable: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    let provider = athly_providers::build_from_config(&config);
    match provider.health_check().await {
        Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
        Ok(false) => {
            println!("  ❌ Provider '{}' answered but rejected the check", provider.name());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
