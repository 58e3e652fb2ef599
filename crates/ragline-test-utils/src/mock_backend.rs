// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted backend facade for deterministic tests.
//!
//! `MockBackend` implements `RagBackend` with per-endpoint reply queues.
//! When a queue is empty a canned success body is returned. A gated backend
//! parks every call until the test releases it, which makes in-flight state
//! observable.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ragline_core::{RagBackend, RaglineError, UploadFile};
use serde_json::{Value, json};
use tokio::sync::Semaphore;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A 2xx response with this body.
    Json(Value),
    /// A non-2xx response with this status.
    Status(u16),
    /// No response at all.
    Transport(String),
}

/// A call as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Query(String),
    /// File names in part order.
    Upload(Vec<String>),
    Inspect,
    Clear(Option<String>),
    Logs(u32),
}

#[derive(Default)]
struct Script {
    query: VecDeque<MockReply>,
    upload: VecDeque<MockReply>,
    inspect: VecDeque<MockReply>,
    clear: VecDeque<MockReply>,
    logs: VecDeque<MockReply>,
}

/// A mock backend that records calls and returns scripted replies.
pub struct MockBackend {
    script: Mutex<Script>,
    calls: Mutex<Vec<MockCall>>,
    gate: Option<Semaphore>,
}

impl MockBackend {
    /// A backend that answers immediately.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script::default()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// A backend that holds every call until [`release`](Self::release) is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Lets `n` parked (or future) calls proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn push_query(&self, reply: MockReply) {
        self.script().query.push_back(reply);
    }

    pub fn push_upload(&self, reply: MockReply) {
        self.script().upload.push_back(reply);
    }

    pub fn push_inspect(&self, reply: MockReply) {
        self.script().inspect.push_back(reply);
    }

    pub fn push_clear(&self, reply: MockReply) {
        self.script().clear.push_back(reply);
    }

    pub fn push_logs(&self, reply: MockReply) {
        self.script().logs.push_back(reply);
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Questions sent to `/query`, in order.
    pub fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Query(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    /// Yields until at least `n` calls have arrived.
    ///
    /// Panics if they never do, so a broken test fails instead of hanging.
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..100_000 {
            if self.call_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {n} backend calls, saw {}", self.call_count());
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn answer(
        &self,
        call: MockCall,
        pick: impl FnOnce(&mut Script) -> Option<MockReply>,
        default: Value,
    ) -> Result<Value, RaglineError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        let reply = pick(&mut *self.script()).unwrap_or(MockReply::Json(default));

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match reply {
            MockReply::Json(body) => Ok(body),
            MockReply::Status(status) => Err(RaglineError::HttpStatus {
                status,
                status_text: reason(status).to_string(),
            }),
            MockReply::Transport(message) => Err(RaglineError::Transport {
                message,
                source: None,
            }),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Error",
    }
}

#[async_trait]
impl RagBackend for MockBackend {
    async fn query(&self, question: &str) -> Result<Value, RaglineError> {
        self.answer(
            MockCall::Query(question.to_string()),
            |s| s.query.pop_front(),
            json!({"answer": "mock answer"}),
        )
        .await
    }

    async fn upload_documents(&self, files: &[UploadFile]) -> Result<Value, RaglineError> {
        let names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();
        let count = names.len();
        self.answer(
            MockCall::Upload(names),
            |s| s.upload.pop_front(),
            json!({"message": "Upload accepted", "files_processed": count}),
        )
        .await
    }

    async fn inspect_structure(&self) -> Result<Value, RaglineError> {
        self.answer(
            MockCall::Inspect,
            |s| s.inspect.pop_front(),
            json!({"collections": {}}),
        )
        .await
    }

    async fn clear_index(&self, index_name: Option<&str>) -> Result<Value, RaglineError> {
        self.answer(
            MockCall::Clear(index_name.map(str::to_string)),
            |s| s.clear.pop_front(),
            json!({"message": "Clear operation completed"}),
        )
        .await
    }

    async fn recent_logs(&self, lines: u32) -> Result<Value, RaglineError> {
        self.answer(
            MockCall::Logs(lines),
            |s| s.logs.pop_front(),
            json!({"logs": []}),
        )
        .await
    }
}
