//! HTTP shell exposing `analyze` over JSON.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::data::DictionaryIndex;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<DictionaryIndex>,
}

/// Routes over a shared, read-only index.
pub fn router(index: Arc<DictionaryIndex>) -> Router {
    Router::new()
        .route("/analyze", post(routes::analyze))
        .route("/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { index })
}

pub async fn serve(index: Arc<DictionaryIndex>, host: String, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving foodlens API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(index).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
