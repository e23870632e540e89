//! Local Code Agent - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the chat relay and tool API.

use local_code_agent::{
    api,
    config::{load_env_file, Config},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_code_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    if let Some(path) = load_env_file() {
        info!("Loaded environment from {}", path.display());
    }
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: llm={} model={}",
        config.llm.base_url, config.llm.model
    );

    info!("Starting server on {}:{}", config.host, config.port);
    api::serve(config).await?;

    Ok(())
}
