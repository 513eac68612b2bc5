//! `standin ask` — One question, answer streamed to stdout.

use std::io::Write;

use standin_config::AppConfig;
use standin_core::TurnEvent;
use tracing::debug;

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    debug!(
        backend = %config.retrieval.backend,
        model = %config.generation.model,
        "Configuration loaded"
    );

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export STANDIN_API_KEY='gsk_...'");
        eprintln!("    export GROQ_API_KEY='gsk_...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    if question.trim().is_empty() {
        return Err("Question must not be empty.".into());
    }

    let pipeline = standin_gateway::build_pipeline(&config).await?;

    let mut rx = pipeline.handle(question.trim());
    let mut stdout = std::io::stdout();

    while let Some(event) = rx.recv().await {
        match event {
            TurnEvent::Chunk { content } => {
                print!("{content}");
                stdout.flush()?;
            }
            TurnEvent::Error { message } => {
                println!();
                return Err(format!("Generation failed: {message}").into());
            }
        }
    }
    println!();

    Ok(())
}
