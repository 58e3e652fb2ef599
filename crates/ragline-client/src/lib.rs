// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP facade for the CRAG retrieval/answer backend.
//!
//! This crate implements [`RagBackend`] over plain HTTP: JSON for query,
//! inspect, clear, and log tail; multipart for document ingestion.

pub mod client;
pub mod types;

use async_trait::async_trait;
use ragline_config::RaglineConfig;
use ragline_core::{RagBackend, RaglineError, UploadFile};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::BackendClient;

/// The backend facade used by the session layer and the CLI.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RagClient {
    client: BackendClient,
}

impl RagClient {
    /// Creates a facade for the backend named in `config.backend.base_url`.
    pub fn new(config: &RaglineConfig) -> Result<Self, RaglineError> {
        let client = BackendClient::new(&config.backend.base_url)?;
        info!(base_url = client.base_url(), "backend client initialized");
        Ok(Self { client })
    }

    /// Creates a facade for an explicit base address.
    pub fn with_base_url(base_url: &str) -> Result<Self, RaglineError> {
        Ok(Self {
            client: BackendClient::new(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl RagBackend for RagClient {
    async fn query(&self, question: &str) -> Result<Value, RaglineError> {
        debug!(chars = question.chars().count(), "sending query");
        self.client.query(question).await
    }

    async fn upload_documents(&self, files: &[UploadFile]) -> Result<Value, RaglineError> {
        debug!(
            files = files.len(),
            bytes = files.iter().map(|f| f.bytes.len()).sum::<usize>(),
            "uploading documents"
        );
        self.client.ingest(files).await
    }

    async fn inspect_structure(&self) -> Result<Value, RaglineError> {
        debug!("inspecting vector store structure");
        self.client.inspect().await
    }

    async fn clear_index(&self, index_name: Option<&str>) -> Result<Value, RaglineError> {
        debug!(index = index_name.unwrap_or("ALL"), "clearing index");
        self.client.clear(index_name).await
    }

    async fn recent_logs(&self, lines: u32) -> Result<Value, RaglineError> {
        debug!(lines, "fetching backend log tail");
        self.client.logs(lines).await
    }
}
