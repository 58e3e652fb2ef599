// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the CRAG backend.
//!
//! Provides [`BackendClient`] which handles URL construction, JSON and
//! multipart request encoding, and the mapping of failures onto the two
//! facade error kinds. Requests are never retried and carry no timeout.

use ragline_core::{RaglineError, UploadFile};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{ClearIndexRequest, QueryRequest, UPLOAD_FIELD};

/// Low-level HTTP client bound to one backend base address.
///
/// Holds no per-call state, so a single instance (or its clones, which share
/// the connection pool) can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url` (e.g. `http://127.0.0.1:8002`).
    pub fn new(base_url: &str) -> Result<Self, RaglineError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed)
            .map_err(|e| RaglineError::Config(format!("invalid backend base URL `{base_url}`: {e}")))?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RaglineError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Returns the base address all paths are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /query`.
    pub async fn query(&self, question: &str) -> Result<Value, RaglineError> {
        let request = self
            .client
            .post(self.url("/query"))
            .json(&QueryRequest { query: question });
        self.execute("/query", request).await
    }

    /// `POST /ingest` with one multipart `files` part per document.
    pub async fn ingest(&self, files: &[UploadFile]) -> Result<Value, RaglineError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    RaglineError::Upload(format!(
                        "invalid content type `{}` for {}: {e}",
                        file.content_type, file.file_name
                    ))
                })?;
            form = form.part(UPLOAD_FIELD, part);
        }

        let request = self.client.post(self.url("/ingest")).multipart(form);
        self.execute("/ingest", request).await
    }

    /// `GET /inspect`.
    pub async fn inspect(&self) -> Result<Value, RaglineError> {
        let request = self.client.get(self.url("/inspect"));
        self.execute("/inspect", request).await
    }

    /// `DELETE /clear`.
    pub async fn clear(&self, index_name: Option<&str>) -> Result<Value, RaglineError> {
        let request = self
            .client
            .delete(self.url("/clear"))
            .json(&ClearIndexRequest { index_name });
        self.execute("/clear", request).await
    }

    /// `GET /logs?lines=N`.
    pub async fn logs(&self, lines: u32) -> Result<Value, RaglineError> {
        let request = self.client.get(self.url(&format!("/logs?lines={lines}")));
        self.execute("/logs", request).await
    }

    /// Sends one request and decodes the body as loosely-typed JSON.
    ///
    /// A body that is not valid JSON comes back as a JSON string holding the
    /// raw text; the caller's normalizer decides whether that is usable.
    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Value, RaglineError> {
        let response = request.send().await.map_err(|e| RaglineError::Transport {
            message: format!("request to {path} failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(path, status = %status, "backend response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path, status = %status, body = %body, "backend returned error status");
            return Err(status_error(status));
        }

        let body = response.text().await.map_err(|e| RaglineError::Transport {
            message: format!("failed to read response body from {path}: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(decode_body(body))
    }
}

fn status_error(status: StatusCode) -> RaglineError {
    RaglineError::HttpStatus {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string(),
    }
}

fn decode_body(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "response body is not JSON, keeping raw text");
            Value::String(body)
        }
    }
}
