//! HTTP surface: the home page and the two conversion endpoints.
//!
//! | Method | Path            | Body                                 |
//! |--------|-----------------|--------------------------------------|
//! | GET    | `/`             |                                      |
//! | POST   | `/convert-url`  | urlencoded form with a `url` field   |
//! | POST   | `/convert-file` | multipart form with a `file` field   |
//!
//! Conversions answer with a `jobs.xlsx` attachment; failures answer with a
//! JSON body `{"error": {"kind": ..., "message": ...}}`.

mod handlers;
mod response;

use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};
use crate::fetcher::Fetcher;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use response::status_for;

/// State shared by all handlers. Cloned per request; holds no mutable data.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub fetcher: Fetcher,
}

/// Builds the application router from an explicit configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client used for remote fetches cannot be built.
pub fn router(config: ServerConfig) -> AppResult<Router> {
    let fetcher = Fetcher::new(&config)?;
    let body_limit = config.max_upload_bytes;
    let state = AppState {
        config: Arc::new(config),
        fetcher,
    };

    Ok(Router::new()
        .route("/", get(handlers::home))
        .route("/convert-url", post(handlers::convert_url))
        .route("/convert-file", post(handlers::convert_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state))
}

/// Binds the configured address and serves until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound, or if the
/// server stops with an I/O failure.
pub async fn serve(config: ServerConfig) -> AppResult<()> {
    let address = config.bind_address()?;
    let app = router(config)?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::IoError(format!("Failed to bind {address}: {e}")))?;
    info!(address = %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::IoError(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}
