//! HTTP server: router construction and the serve loop.
//!
//! # Routes
//!
//! ```text
//! GET  /                 UI page
//! GET  /static/*path     UI assets
//! GET  /health           liveness check
//! GET  /models           { models, selected }
//! POST /set_model        { model }        → { success, model }
//! POST /set_instruction  { instruction }  → { success, instruction }
//! POST /set_temperature  { temperature }  → { success, temperature }
//! POST /prompt           { prompt }       → { content }
//! GET  /config           { instruction, temperature }
//! ```
//!
//! Each request runs on its own Tokio task (axum's default).  Handlers share
//! one [`AppState`]: a cloned handle to the [`RelayService`] and the static
//! asset source.  There is no global state.

pub mod assets;
pub mod error;
pub mod handlers;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::RelayService;
use crate::domain::config::ServerConfig;

pub use assets::StaticAssets;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: RelayService,
    pub assets: Arc<StaticAssets>,
}

/// Builds the complete router for `service`, serving UI assets from
/// `assets`.
pub fn build_router(service: RelayService, assets: StaticAssets) -> Router {
    let state = AppState {
        service,
        assets: Arc::new(assets),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/static/*path", get(handlers::static_asset))
        .route("/health", get(handlers::health))
        .route("/models", get(handlers::list_models))
        .route("/set_model", post(handlers::set_model))
        .route("/set_instruction", post(handlers::set_instruction))
        .route("/set_temperature", post(handlers::set_temperature))
        .route("/prompt", post(handlers::prompt))
        .route("/config", get(handlers::config))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.bind_addr` and serves until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after `shutdown` resolves;
/// no new connections are accepted.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server<F>(config: &ServerConfig, service: RelayService, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    let local_addr = listener
        .local_addr()
        .context("failed to read listener address")?;
    info!("prompt relay listening on http://{local_addr}");

    let app = build_router(service, StaticAssets::new(&config.static_dir));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
