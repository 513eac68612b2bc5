//! standin CLI — the main entry point.
//!
//! Commands:
//! - `init`  — Write a default config file
//! - `ask`   — Ask one question and stream the answer to stdout
//! - `serve` — Start the HTTP gateway

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "standin",
    about = "standin — a retrieval-backed personal assistant that answers as you",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.standin/config.toml
    Init,

    /// Ask a single question and stream the answer
    Ask {
        /// The question to ask
        question: String,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run()?,
        Commands::Ask { question } => commands::ask::run(&question).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
    }

    Ok(())
}
