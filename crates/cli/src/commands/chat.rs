//! `athly chat` — Interactive or single-message chat mode.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::session;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = session::load_config()?;
    let mut orchestrator = session::build_orchestrator(&config)?;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let response = orchestrator.respond(&msg).await;
        eprint!("\r              \r");
        tracing::debug!(strategy = response.strategy.as_str(), "Answered");
        println!("{}", response.text);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║         Athly Coach — Interactive Mode        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", athly_providers::model_settings(&config).model);
    println!("  Tools:     expert_sport, table_generator");
    println!("  Budget:    {} iterations per request", config.orchestrator.max_iterations);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if !input.is_empty() {
            eprint!("  ...");
            let response = orchestrator.respond(input).await;
            eprint!("\r     \r");
            println!();
            for line in response.text.lines() {
                println!("  Athly > {line}");
            }
            println!();
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  À bientôt ! {} messages in this session.", orchestrator.memory().len());
    println!();

    Ok(())
}
