use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

mod app_state;
mod config;
mod controller;
mod session;

use app_state::AppState;
use config::{load_settings, log_filter};

#[derive(Debug, Deserialize)]
struct WsQuery {
    topic: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .init();

    let settings = load_settings();
    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(
        default_topic = %settings.default_topic,
        tick_interval_ms = settings.tick_interval_ms,
        "controller settings loaded"
    );

    let app = build_router(Arc::new(AppState::new(settings)));

    info!(%addr, "controller listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(q): Query<WsQuery>,
) -> impl IntoResponse {
    let topic = q
        .topic
        .filter(|topic| !topic.trim().is_empty())
        .unwrap_or_else(|| state.settings.default_topic.clone());
    ws.on_upgrade(move |socket| session::run_session(state, socket, topic))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
