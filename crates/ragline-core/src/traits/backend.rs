// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend facade trait for the retrieval/answer service.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RaglineError;
use crate::types::UploadFile;

/// The calls the client can make against a CRAG backend.
///
/// Every method issues exactly one request with no retry and no timeout.
/// Success bodies come back as loosely-typed JSON; callers must treat every
/// field as untrusted. Failures are either [`RaglineError::Transport`] or
/// [`RaglineError::HttpStatus`].
#[async_trait]
pub trait RagBackend: Send + Sync + 'static {
    /// `POST /query` with `{"query": question}`.
    async fn query(&self, question: &str) -> Result<Value, RaglineError>;

    /// `POST /ingest` as multipart with one `files` part per document.
    async fn upload_documents(&self, files: &[UploadFile]) -> Result<Value, RaglineError>;

    /// `GET /inspect`.
    async fn inspect_structure(&self) -> Result<Value, RaglineError>;

    /// `DELETE /clear` with `{"index_name": name | null}`; `None` clears everything.
    async fn clear_index(&self, index_name: Option<&str>) -> Result<Value, RaglineError>;

    /// `GET /logs?lines=N`, the backend's own application log tail.
    async fn recent_logs(&self, lines: u32) -> Result<Value, RaglineError>;
}
