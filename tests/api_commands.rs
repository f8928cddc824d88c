// Router-level tests for the chat command endpoint.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::ScriptedSource;
use tapsim_bot::api::router;
use tapsim_bot::render::Renderer;

fn app(source: ScriptedSource) -> Router {
    router(source, Renderer::new(":click:", ":token:"))
}

async fn post_command(app: Router, body: Value) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/commands")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let response = app(ScriptedSource::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = app(ScriptedSource::new())
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_command_is_ignored() {
    let source = ScriptedSource::new();
    let (status, body) = post_command(app(source.clone()), json!({"content": "hello there"})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_bot_authors_are_ignored() {
    let source = ScriptedSource::new();
    let (status, _) = post_command(
        app(source.clone()),
        json!({"content": "!topvalues", "author_is_bot": true}),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_help_embed() {
    let (status, body) = post_command(app(ScriptedSource::new()), json!({"content": "!help"})).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["embeds"][0]["title"], "📌 Tap Sim Bot Commands");
    assert!(body.get("content").is_none());
}

#[tokio::test]
async fn test_search_embed() {
    let source = ScriptedSource::new().with_payload(
        "items",
        json!({"rows": [{"name": "Huge Cat", "value": 2500}, {"name": "Dog", "value": 3}]}),
    );
    let (status, body) = post_command(app(source), json!({"content": "!search cat"})).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["embeds"][0]["title"], "🔎 Tap Sim — Search Results");
    assert_eq!(
        body["embeds"][0]["description"],
        "**Huge Cat** → :token: **2,500**"
    );
}

#[tokio::test]
async fn test_upstream_failure_text() {
    let (status, body) = post_command(app(ScriptedSource::new()), json!({"content": "!hatches"})).await;
    assert_eq!(status, StatusCode::OK);
    let content = body.unwrap()["content"].as_str().unwrap().to_string();
    assert!(content.contains("API error fetching eggs"));
}
