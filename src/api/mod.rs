//! HTTP API for the local code agent.
//!
//! - `GET /health` - liveness and the LLM endpoint in use
//! - `POST /chat` - relay a conversation to the LLM
//! - `POST /execute_tool` - run one tool call and return its text result

mod routes;
pub mod types;

use std::sync::Arc;

pub use routes::{router, AppState};

use crate::config::Config;

/// Start the HTTP server and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
