mod chat;
mod error;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::Html;
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use catena_config::{init_tracing, AppConfig};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use upstream::MagisteriumClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: MagisteriumClient,
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Operational probe; no auth required.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let api_key = state.config.api_key.as_deref();
    Json(serde_json::json!({
        "status": "ok",
        "serverTime": Utc::now().to_rfc3339(),
        "apiKeyConfigured": api_key.is_some(),
        "apiKeyLength": api_key.map_or(0, str::len),
        "environment": state.config.environment,
    }))
}

/// Diagnostic loopback.
async fn echo(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "receivedAt": Utc::now().to_rfc3339(),
        "receivedData": body,
        "echo": true,
    }))
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/echo", post(echo))
        .merge(chat::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "catena-gateway", environment = %config.environment, "starting");

    if config.api_key.is_none() {
        tracing::warn!("MAGISTERIUM_API_KEY is not set; /api/chat will reject all requests");
    }

    let upstream = MagisteriumClient::new(&config.upstream_base_url, config.upstream_timeout_secs)
        .expect("failed to build upstream client");

    let state = AppState {
        config: Arc::new(config),
        upstream,
    };

    let addr: SocketAddr = state
        .config
        .bind_addr()
        .parse()
        .expect("invalid bind address");

    let app = build_router(state);

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
