//! HTTP server for faultline.
//!
//! A single stateless `/analyze` endpoint plus `/health` and `/info`, backed
//! by the same investigation and LLM pipeline the CLI drives interactively.

pub mod auth;
pub mod http;

use std::sync::Arc;

use faultline_core::config::FaultlineConfig;
use faultline_llm::GeminiClient;

/// Shared, read-only server state. `FaultlineConfig` is captured once at
/// startup -- env-driven access control is not re-read per request.
pub struct AppState {
    pub config: FaultlineConfig,
    pub client: GeminiClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: FaultlineConfig) -> Self {
        let client = GeminiClient::new(&config.llm);
        AppState { config, client }
    }
}

/// Starts the HTTP server on `port`, binding to all interfaces.
pub async fn serve(state: SharedState, port: u16) -> std::io::Result<()> {
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "faultline HTTP API listening");
    axum::serve(listener, app).await
}
