#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream;
use mindease_core::{ChatEngine, CompletionGateway};
use mindease_llm::{ChatClient, ChatRequest, ChatResponse, EventStream, StreamEvent};
use mindease_persist::{
    ChatPayload, ChatRole, MemoryStore, PersistError, Record, RecordStore, SortOrder,
};

/// One canned reply: fragments, optionally cut short by a transport error
#[derive(Clone)]
pub struct Script {
    pub fragments: Vec<&'static str>,
    pub fail_after: Option<usize>,
}

impl Script {
    pub fn ok(fragments: Vec<&'static str>) -> Self {
        Self { fragments, fail_after: None }
    }

    pub fn broken(fragments: Vec<&'static str>, fail_after: usize) -> Self {
        Self { fragments, fail_after: Some(fail_after) }
    }
}

/// ChatClient that replays scripts in order and records every request
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<VecDeque<Script>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_script(&self, request: ChatRequest) -> Script {
        self.requests.lock().unwrap().push(request);
        self.scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::ok(vec!["..."]))
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let script = self.next_script(request);
        Ok(ChatResponse {
            content: Some(script.fragments.concat()),
            finish_reason: Some("stop".to_string()),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let script = self.next_script(request);

        let mut events: Vec<Result<StreamEvent>> = Vec::new();
        for (i, fragment) in script.fragments.iter().enumerate() {
            if script.fail_after == Some(i) {
                events.push(Err(anyhow!("connection reset by peer")));
                return Ok(Box::pin(stream::iter(events)));
            }
            events.push(Ok(StreamEvent::Message {
                content: fragment.to_string(),
            }));
        }
        events.push(Ok(StreamEvent::Done {
            finish_reason: Some("stop".to_string()),
        }));

        Ok(Box::pin(stream::iter(events)))
    }
}

/// Transcript store whose writes always fail
pub struct FailingStore;

#[async_trait]
impl RecordStore<ChatPayload> for FailingStore {
    async fn append_at(
        &self,
        _uid: &str,
        _created_at: DateTime<Utc>,
        _payload: ChatPayload,
    ) -> mindease_persist::Result<Record<ChatPayload>> {
        Err(PersistError::Connection("database unreachable".to_string()))
    }

    async fn list(
        &self,
        _uid: &str,
        _limit: usize,
        _order: SortOrder,
    ) -> mindease_persist::Result<Vec<Record<ChatPayload>>> {
        Err(PersistError::Connection("database unreachable".to_string()))
    }
}

/// Memory-backed transcript store that holds user-role writes back, so a
/// reply's write can land before the question it answers
pub struct SlowUserWrites {
    pub inner: Arc<MemoryStore>,
    pub delay: Duration,
}

#[async_trait]
impl RecordStore<ChatPayload> for SlowUserWrites {
    async fn append_at(
        &self,
        uid: &str,
        created_at: DateTime<Utc>,
        payload: ChatPayload,
    ) -> mindease_persist::Result<Record<ChatPayload>> {
        if payload.role == ChatRole::User {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.append_at(uid, created_at, payload).await
    }

    async fn list(
        &self,
        uid: &str,
        limit: usize,
        order: SortOrder,
    ) -> mindease_persist::Result<Vec<Record<ChatPayload>>> {
        RecordStore::<ChatPayload>::list(self.inner.as_ref(), uid, limit, order).await
    }
}

pub fn engine(client: Arc<ScriptedClient>) -> ChatEngine {
    ChatEngine::new(CompletionGateway::new(client, "test-model"))
}

/// Wait for detached transcript writes to land
pub async fn wait_for_records(store: &MemoryStore, uid: &str, expected: usize) -> Vec<Record<ChatPayload>> {
    for _ in 0..200 {
        let records = RecordStore::<ChatPayload>::list(store, uid, 100, SortOrder::Ascending)
            .await
            .unwrap();
        if records.len() >= expected {
            return records;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {} transcript records for {}", expected, uid);
}
