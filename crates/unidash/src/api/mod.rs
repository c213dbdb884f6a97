pub mod routes;
pub mod state;

use std::net::SocketAddr;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/options", get(routes::options))
        .route("/api/dashboard", get(routes::dashboard))
        .route("/api/totals", get(routes::totals_view))
        .route("/api/mean-by-year", get(routes::mean_by_year_view))
        .route("/api/departments", get(routes::departments_view))
        .route("/api/terms", get(routes::terms_view))
        .with_state(state)
}

/// Serves the read-only API until ctrl-c.
pub async fn serve(state: AppState, bind: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
