//! # Alert and Assistant API Tests
//!
//! Alert CRUD over the in-memory store, and the assistant relay against
//! both a stub provider and a local chat-completions server.

mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use common::*;
use process_mining::config::AppConfig;
use process_mining::services::{AssistantProvider, AssistantService};
use process_mining::web::create_app;

#[tokio::test]
async fn test_alert_lifecycle() {
    let app = seeded_app();

    let created = post_json(&app, "/api/alerts/", r#"{"message": "Backlog above 40 cases"}"#).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["severity"], "info");
    assert_eq!(created.body["state"], "open");
    let id = created.body["id"].as_str().unwrap().to_string();

    let fetched = get(&app, &format!("/api/alerts/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["message"], "Backlog above 40 cases");

    let listed = get(&app, "/api/alerts/").await;
    assert_eq!(listed.count(), 1);

    let deleted = delete(&app, &format!("/api/alerts/{id}")).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    let gone = get(&app, &format!("/api/alerts/{id}")).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let deleted_again = delete(&app, &format!("/api/alerts/{id}")).await;
    assert_eq!(deleted_again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_alert_with_explicit_severity_and_state() {
    let app = seeded_app();
    let created = post_json(
        &app,
        "/api/alerts/",
        r#"{"message": "SLA breached", "severity": "Critical", "state": "acknowledged"}"#,
    )
    .await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["severity"], "critical");
    assert_eq!(created.body["state"], "acknowledged");
}

#[tokio::test]
async fn test_invalid_alert_requests() {
    let app = seeded_app();

    for body in [
        r#"{"message": "   "}"#,
        r#"{"message": "x", "severity": "urgent"}"#,
        r#"{"message": "x", "state": "snoozed"}"#,
        r#"{"severity": "info"}"#,
        r#"not json"#,
    ] {
        let response = post_json(&app, "/api/alerts/", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.error_code(), "BAD_REQUEST", "{body}");
    }

    let bad_id = get(&app, "/api/alerts/not-a-uuid").await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[derive(Debug)]
struct CannedProvider;

#[async_trait]
impl AssistantProvider for CannedProvider {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn complete(&self, prompt: &str) -> process_mining::Result<String> {
        Ok(format!("You asked: {prompt}"))
    }
}

#[tokio::test]
async fn test_assistant_relays_the_reply() {
    let app = app_with_assistant(AssistantService::new(Arc::new(CannedProvider)));
    let response = post_json(&app, "/api/assistant/", r#"{"prompt": "Which variant is slowest?"}"#).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"response": "You asked: Which variant is slowest?"}));
}

#[tokio::test]
async fn test_assistant_rejects_empty_prompt_and_reports_disabled() {
    let enabled = app_with_assistant(AssistantService::new(Arc::new(CannedProvider)));
    let empty = post_json(&enabled, "/api/assistant/", r#"{"prompt": ""}"#).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let disabled = seeded_app();
    let response = post_json(&disabled, "/api/assistant/", r#"{"prompt": "hello"}"#).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code(), "SERVICE_UNAVAILABLE");
}

/// Local stand-in for a chat-completions provider
async fn spawn_provider() -> String {
    let router = Router::new()
        .route(
            "/ok",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["messages"]
                    .as_array()
                    .and_then(|m| m.last())
                    .and_then(|m| m["content"].as_str())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": format!("echo {prompt}")}}]
                }))
            }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": []}))
            }),
        )
        .route("/malformed", post(|| async { Json(json!({"unexpected": true})) }))
        .route(
            "/failing",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

fn app_for_endpoint(endpoint: String) -> Router {
    let mut config = AppConfig::default();
    config.assistant.enabled = true;
    config.assistant.endpoint = endpoint;
    config.assistant.timeout_ms = 200;
    create_app(state_with(config, seeded_store()))
}

#[tokio::test]
async fn test_http_provider_round_trip() {
    let base = spawn_provider().await;
    let app = app_for_endpoint(format!("{base}/ok"));

    let response = post_json(&app, "/api/assistant/", r#"{"prompt": "count cases"}"#).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["response"], "echo count cases");
}

#[tokio::test]
async fn test_http_provider_failures_map_to_gateway_errors() {
    let base = spawn_provider().await;

    let slow = app_for_endpoint(format!("{base}/slow"));
    let timed_out = post_json(&slow, "/api/assistant/", r#"{"prompt": "hi"}"#).await;
    assert_eq!(timed_out.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(timed_out.error_code(), "UPSTREAM_TIMEOUT");

    let malformed = app_for_endpoint(format!("{base}/malformed"));
    let bad_reply = post_json(&malformed, "/api/assistant/", r#"{"prompt": "hi"}"#).await;
    assert_eq!(bad_reply.status, StatusCode::BAD_GATEWAY);

    let failing = app_for_endpoint(format!("{base}/failing"));
    let upstream_error = post_json(&failing, "/api/assistant/", r#"{"prompt": "hi"}"#).await;
    assert_eq!(upstream_error.status, StatusCode::BAD_GATEWAY);
    assert_eq!(upstream_error.error_code(), "UPSTREAM_ERROR");
}
