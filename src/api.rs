// HTTP routes: health, metrics, and the inbound chat command endpoint.
//
// The gateway adapter that sits on the chat connection forwards every message
// here and relays whatever comes back.

use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::commands::{execute, Command};
use crate::metrics;
use crate::render::Renderer;
use crate::upstream::RecordSource;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub content: String,
    #[serde(default)]
    pub author_is_bot: bool,
}

// ── Shared application state ─────────────────────────────────────────

pub struct AppState<S> {
    pub source: S,
    pub renderer: Renderer,
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router<S>(source: S, renderer: Renderer) -> Router
where
    S: RecordSource + 'static,
{
    let state = Arc::new(AppState { source, renderer });

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text))
        .route("/api/commands", post(handle_command::<S>))
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "tapsim-bot" }))
}

async fn metrics_text() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Run a chat command and return the message to send back.
///
/// Messages from bots, or that are not commands, get `204 No Content`.
async fn handle_command<S: RecordSource>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CommandRequest>,
) -> Response {
    if req.author_is_bot {
        return StatusCode::NO_CONTENT.into_response();
    }
    let Some(command) = Command::parse(&req.content) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let reply = execute(&state.source, &command).await;
    Json(state.renderer.render(&reply)).into_response()
}
