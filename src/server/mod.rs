//! HTTP server
//!
//! Exposes `POST /predict` plus health and metadata routes. Artifacts are
//! loaded before the listener is bound; if they fail to load the server never
//! accepts a connection.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::artifacts::{ArtifactPaths, InferenceContext};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "artifacts/model.json".to_string())
                .into(),
            scaler_path: std::env::var("SCALER_PATH")
                .unwrap_or_else(|_| "artifacts/scaler.json".to_string())
                .into(),
        }
    }
}

impl ServerConfig {
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_path, &self.scaler_path)
    }
}

async fn shutdown_signal(started_at: chrono::DateTime<chrono::Utc>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install CTRL+C handler; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    let stop_time = chrono::Utc::now();
    let uptime = stop_time.signed_duration_since(started_at);
    info!(
        stopped_at = %stop_time.to_rfc3339(),
        uptime_secs = uptime.num_seconds(),
        "Shutdown signal received, stopping server gracefully"
    );
}

/// Load artifacts, then serve until ctrl+c
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let context = InferenceContext::load(&config.artifact_paths())?;
    let state = Arc::new(AppState::new(context));
    let started_at = state.started_at;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        started_at = %started_at.to_rfc3339(),
        "Server listening and ready to accept connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(started_at))
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
