use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures::stream;
use mindease_api::{
    build_router,
    config::Config,
    state::{AppState, StoreBackend},
};
use mindease_core::CompletionGateway;
use mindease_llm::{ChatClient, ChatRequest, ChatResponse, EventStream, StreamEvent};
use mindease_persist::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Where a canned reply breaks, if at all
#[derive(Clone, Copy, PartialEq)]
enum Failure {
    Never,
    BeforeStream,
    MidStream,
}

/// Replies with fixed fragments to every request
struct CannedClient {
    fragments: Vec<&'static str>,
    failure: Failure,
}

#[async_trait]
impl ChatClient for CannedClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
        if self.failure != Failure::Never {
            return Err(anyhow!("upstream returned 502"));
        }
        Ok(ChatResponse {
            content: Some(format!("  {}  ", self.fragments.concat())),
            finish_reason: Some("stop".to_string()),
        })
    }

    async fn chat_stream(&self, _request: ChatRequest) -> Result<EventStream> {
        if self.failure == Failure::BeforeStream {
            return Err(anyhow!("upstream returned 502"));
        }

        let mut events: Vec<Result<StreamEvent>> = self
            .fragments
            .iter()
            .map(|f| Ok(StreamEvent::Message { content: f.to_string() }))
            .collect();
        if self.failure == Failure::MidStream {
            events.truncate(1);
            events.push(Err(anyhow!("connection reset by peer")));
        } else {
            events.push(Ok(StreamEvent::Done {
                finish_reason: Some("stop".to_string()),
            }));
        }
        Ok(Box::pin(stream::iter(events)))
    }
}

fn app_with(gateway: CompletionGateway) -> Router {
    let state = AppState::new(
        Config::default(),
        gateway,
        Arc::new(MemoryStore::new()),
        StoreBackend::Memory,
    );
    build_router(Arc::new(state))
}

fn unconfigured_app() -> Router {
    app_with(CompletionGateway::unconfigured("test-model"))
}

fn app_failing(failure: Failure) -> Router {
    let client = Arc::new(CannedClient {
        fragments: vec!["Take a ", "deep breath."],
        failure,
    });
    app_with(CompletionGateway::new(client, "test-model"))
}

fn configured_app() -> Router {
    app_failing(Failure::Never)
}

fn request(method: &str, uri: &str, uid: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(uid) = uid {
        builder = builder
            .header("x-user-id", uid)
            .header("x-user-email", format!("{}@example.com", uid));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_backend_and_llm_status() {
    let app = unconfigured_app();

    let (status, body) = send_json(&app, request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["memory"], "in-memory");
    assert_eq!(body["services"]["llm"], "not_configured");
}

#[tokio::test]
async fn chat_without_credential_is_503_plain_text() {
    let app = unconfigured_app();
    let payload = json!({ "messages": [{ "role": "user", "content": "hi" }] });

    let (status, body) = send(&app, request("POST", "/api/chat", None, Some(payload))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "GROQ_API_KEY is not set – add it to your environment");
}

#[tokio::test]
async fn journal_prompt_without_credential_is_503() {
    let app = unconfigured_app();

    let (status, body) = send(&app, request("POST", "/api/journal-prompt", None, Some(json!({})))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.starts_with("GROQ_API_KEY is not set"));
}

#[tokio::test]
async fn chat_streams_sse_fragments() {
    let app = configured_app();
    let payload = json!({
        "messages": [
            { "role": "assistant", "content": "Hello! How are you feeling today?" },
            { "role": "user", "content": "A bit anxious" }
        ],
        "userData": { "name": "Ana", "fears": ["exams"] }
    });

    let (status, body) = send(&app, request("POST", "/api/chat", None, Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("event: message"));
    assert!(body.contains(r#"{"content":"Take a "}"#));
    assert!(body.contains(r#"{"content":"deep breath."}"#));
    assert!(body.contains("event: done"));
    assert!(!body.contains("event: error"));
}

#[tokio::test]
async fn authenticated_chat_is_recorded() {
    let app = configured_app();
    let payload = json!({ "messages": [{ "role": "user", "content": "Can't sleep" }] });

    let (status, _) = send(&app, request("POST", "/api/chat", Some("u1"), Some(payload))).await;
    assert_eq!(status, StatusCode::OK);

    let mut messages = Vec::new();
    for _ in 0..200 {
        let (_, body) = send_json(&app, request("GET", "/api/chat/history", Some("u1"), None)).await;
        messages = body["messages"].as_array().cloned().unwrap_or_default();
        if messages.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(messages.len(), 2);
    let contents: Vec<_> = messages.iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["Can't sleep", "Take a deep breath."]);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");

    let (_, other) = send_json(&app, request("GET", "/api/chat/history", Some("u2"), None)).await;
    assert!(other["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_before_first_fragment_is_500_plain_text() {
    let app = app_failing(Failure::BeforeStream);
    let payload = json!({ "messages": [{ "role": "user", "content": "hello?" }] });

    let (status, body) = send(&app, request("POST", "/api/chat", None, Some(payload))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error processing chat request");
}

#[tokio::test]
async fn mid_stream_failure_emits_error_event_and_records_no_reply() {
    let app = app_failing(Failure::MidStream);
    let payload = json!({ "messages": [{ "role": "user", "content": "Still there?" }] });

    let (status, body) = send(&app, request("POST", "/api/chat", Some("u1"), Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"{"content":"Take a "}"#));
    assert!(body.contains("event: error"));
    assert!(body.contains("Error processing chat request"));
    assert!(!body.contains("event: done"));

    let mut messages = Vec::new();
    for _ in 0..200 {
        let (_, body) = send_json(&app, request("GET", "/api/chat/history", Some("u1"), None)).await;
        messages = body["messages"].as_array().cloned().unwrap_or_default();
        if !messages.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    // Give a stray assistant write the chance to land before checking
    tokio::time::sleep(Duration::from_millis(50)).await;
    let (_, body) = send_json(&app, request("GET", "/api/chat/history", Some("u1"), None)).await;
    let messages_after = body["messages"].as_array().cloned().unwrap_or_default();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages_after.len(), 1);
    assert_eq!(messages_after[0]["role"], "user");
    assert_eq!(messages_after[0]["content"], "Still there?");
}

#[tokio::test]
async fn journal_prompt_upstream_failure_is_500_plain_text() {
    let app = app_failing(Failure::BeforeStream);

    let (status, body) = send(&app, request("POST", "/api/journal-prompt", None, Some(json!({})))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error generating prompt");
}

#[tokio::test]
async fn malformed_history_is_rejected() {
    let app = configured_app();

    let empty = json!({ "messages": [] });
    let (status, _) = send(&app, request("POST", "/api/chat", None, Some(empty))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let trailing_assistant = json!({
        "messages": [
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "hello" }
        ]
    });
    let (status, _) = send(&app, request("POST", "/api/chat", None, Some(trailing_assistant))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn journal_prompt_is_trimmed() {
    let app = configured_app();

    let (status, body) = send_json(
        &app,
        request("POST", "/api/journal-prompt", None, Some(json!({ "userData": { "hobbies": ["chess"] } }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt"], "Take a deep breath.");
}

#[tokio::test]
async fn history_requires_identity() {
    let app = unconfigured_app();

    let (status, body) = send_json(&app, request("GET", "/api/chat/history", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing x-user-id header");
}

#[tokio::test]
async fn profile_is_created_then_updated() {
    let app = unconfigured_app();

    let (status, created) = send_json(&app, request("GET", "/api/profile", Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["uid"], "u1");
    assert_eq!(created["email"], "u1@example.com");
    assert_eq!(created["age"], 0);

    let patch = json!({ "name": " Ana ", "stressFactors": ["work", ""] });
    let (status, updated) = send_json(&app, request("PATCH", "/api/profile", Some("u1"), Some(patch))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana");
    assert_eq!(updated["stressFactors"], json!(["work"]));
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, again) = send_json(&app, request("GET", "/api/profile", Some("u1"), None)).await;
    assert_eq!(again["name"], "Ana");

    let (status, _) = send_json(&app, request("PATCH", "/api/profile", Some("u1"), Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn journal_entries_carry_sentiment() {
    let app = unconfigured_app();

    let entry = json!({ "content": "Today I felt happy and grateful", "prompt": "What went well?" });
    let (status, saved) = send_json(&app, request("POST", "/api/journal", Some("u1"), Some(entry))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["sentiment"], "positive");
    assert!(saved["suggestion"].as_str().unwrap().starts_with("Keep up the positive mindset"));

    let second = json!({ "content": "Tired." });
    send_json(&app, request("POST", "/api/journal", Some("u1"), Some(second))).await;

    let (status, list) = send_json(&app, request("GET", "/api/journal", Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = list["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["content"], "Tired.");

    let blank = json!({ "content": "  " });
    let (status, _) = send_json(&app, request("POST", "/api/journal", Some("u1"), Some(blank))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mood_scale_is_enforced() {
    let app = unconfigured_app();

    for bad in [1, 11, -3] {
        let (status, _) = send_json(
            &app,
            request("POST", "/api/mood", Some("u1"), Some(json!({ "mood": bad }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "mood {}", bad);
    }

    let (status, saved) = send_json(
        &app,
        request("POST", "/api/mood", Some("u1"), Some(json!({ "mood": 8, "notes": "sunny" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["label"], "Happy");

    let (_, list) = send_json(&app, request("GET", "/api/mood", Some("u1"), None)).await;
    assert_eq!(list["entries"].as_array().unwrap().len(), 1);
    assert!(list["suggestion"].as_str().unwrap().starts_with("Great mood"));
    assert_eq!(list["scale"].as_array().unwrap().len(), 5);

    let (_, empty) = send_json(&app, request("GET", "/api/mood", Some("u2"), None)).await;
    assert!(empty["suggestion"].as_str().unwrap().starts_with("Track your mood"));
}

#[tokio::test]
async fn static_directory_and_openapi() {
    let app = unconfigured_app();

    let (status, therapists) = send_json(&app, request("GET", "/api/therapists", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(therapists.as_array().unwrap().len(), 3);
    assert_eq!(therapists[0]["name"], "Dr. Asha Verma");

    let (status, doc) = send_json(&app, request("GET", "/api/openapi.json", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/chat").is_some());
    assert!(doc["paths"].get("/api/mood").is_some());
}
