//! Inbound HTTP surface: routes, shared state and the serve loop.

mod handlers;

pub use handlers::{ARTIFACT_FIELD, NO_DINOSAURS_FOUND};

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::dinosaurs::DinosaurIndex;
use crate::domain::ports::ProjectProvider;
use crate::utils::error::Result;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state.
pub struct AppState {
    pub provider: Arc<dyn ProjectProvider>,
    pub dinosaurs: Arc<DinosaurIndex>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ProjectProvider>, dinosaurs: Arc<DinosaurIndex>) -> Self {
        Self {
            provider,
            dinosaurs,
        }
    }
}

/// Creates the relay router. Every origin is allowed.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Upstream project operations
        .route("/list", get(handlers::list_projects))
        .route("/create", post(handlers::create_project))
        .route("/delete/{project_id}", delete(handlers::delete_project))
        .route(
            "/deploy/{project_id}",
            post(handlers::deploy_project).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Static dataset
        .route("/api", get(handlers::list_dinosaurs))
        .route("/api/{dinosaur}", get(handlers::get_dinosaur))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(
    state: Arc<AppState>,
    bind_address: SocketAddr,
    max_upload_bytes: usize,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!(address = %bind_address, "Relay listening");

    axum::serve(listener, router(state, max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Relay shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
