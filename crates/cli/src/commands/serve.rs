//! `standin serve` — Start the HTTP gateway.

use standin_config::AppConfig;
use tracing::info;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    info!(
        host = %config.gateway.host,
        port = config.gateway.port,
        backend = %config.retrieval.backend,
        model = %config.generation.model,
        "Starting gateway"
    );

    standin_gateway::start(config).await?;

    Ok(())
}
