// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive reshaping of backend response bodies.
//!
//! The backend's field shapes have drifted between versions (sources as a
//! list or as one newline-joined string, metadata as text or as an object).
//! Every shape check lives here so the rest of the crate only ever sees the
//! canonical types below.

use ragline_core::RaglineError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Answer text used when the backend sends no usable `answer`.
pub const NO_ANSWER_PLACEHOLDER: &str = "no answer received";

/// Metadata text used when the backend sends no `metadata_used`.
pub const NO_METADATA_SENTINEL: &str = "No metadata";

const DEFAULT_INGEST_MESSAGE: &str = "Upload accepted";
const DEFAULT_CLEAR_MESSAGE: &str = "Clear operation completed";

/// A query response reduced to the fields an assistant message needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswer {
    pub answer: String,
    pub sources: Vec<String>,
    pub metadata: String,
    /// `Some` only when the backend sent a well-formed log batch.
    pub logs: Option<Vec<String>>,
}

/// Normalizes a `POST /query` body.
///
/// Fails only when the body is not a JSON object at all; every individual
/// field falls back to a safe default instead.
pub fn normalize_query_response(raw: &Value) -> Result<NormalizedAnswer, RaglineError> {
    let body = as_object(raw, "query")?;

    let answer = match body.get("answer") {
        Some(Value::String(text)) => text.clone(),
        _ => NO_ANSWER_PLACEHOLDER.to_string(),
    };

    Ok(NormalizedAnswer {
        answer,
        sources: normalize_sources(body.get("sources")),
        metadata: normalize_metadata(body.get("metadata_used"))?,
        logs: normalize_logs(body.get("logs")),
    })
}

/// List of text → as-is; one text blob → its non-empty lines; anything else → empty.
pub fn normalize_sources(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(blob)) => blob
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => string_array(other).unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Text → as-is; absent or `null` → [`NO_METADATA_SENTINEL`]; anything else → pretty JSON.
pub fn normalize_metadata(value: Option<&Value>) -> Result<String, RaglineError> {
    match value {
        None | Some(Value::Null) => Ok(NO_METADATA_SENTINEL.to_string()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => serde_json::to_string_pretty(other)
            .map_err(|e| RaglineError::Normalize(format!("failed to render metadata: {e}"))),
    }
}

/// A list of text replaces the session's log batch; any other shape leaves it alone.
pub fn normalize_logs(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(string_array)
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn as_object<'a>(raw: &'a Value, endpoint: &str) -> Result<&'a Map<String, Value>, RaglineError> {
    raw.as_object().ok_or_else(|| {
        RaglineError::Normalize(format!(
            "expected a JSON object from /{endpoint}, got {}",
            shape_name(raw)
        ))
    })
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn count_field(body: &Map<String, Value>, key: &str) -> Option<u64> {
    body.get(key).and_then(Value::as_u64)
}

fn message_field(body: Option<&Map<String, Value>>, fallback: &str) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

// --- Admin receipts ---

/// What the backend said about an ingestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    pub message: String,
    pub files_processed: Option<u64>,
}

/// Reads `{message, files_processed?}`, counting a `files` array when the
/// explicit count is missing.
pub fn ingest_receipt(raw: &Value) -> IngestReceipt {
    let body = raw.as_object();
    let files_processed = body.and_then(|b| {
        count_field(b, "files_processed")
            .or_else(|| b.get("files").and_then(Value::as_array).map(|f| f.len() as u64))
    });

    IngestReceipt {
        message: message_field(body, DEFAULT_INGEST_MESSAGE),
        files_processed,
    }
}

/// What the backend said about a clear request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearReceipt {
    pub message: String,
    pub deleted_objects: Option<u64>,
}

/// Reads `{message, deleted_objects?}`, falling back to `total_documents_deleted`.
pub fn clear_receipt(raw: &Value) -> ClearReceipt {
    let body = raw.as_object();
    let deleted_objects = body.and_then(|b| {
        count_field(b, "deleted_objects").or_else(|| count_field(b, "total_documents_deleted"))
    });

    ClearReceipt {
        message: message_field(body, DEFAULT_CLEAR_MESSAGE),
        deleted_objects,
    }
}

// --- Backend log tail ---

/// One line of the backend's application log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Reads `{logs: [...]}` from `GET /logs`.
///
/// Entries may be objects (`timestamp`, `level`, `message`, `raw`) or bare
/// strings; anything else is skipped.
pub fn log_entries(raw: &Value) -> Vec<LogEntry> {
    let Some(entries) = raw.get("logs").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(line) => Some(LogEntry {
                timestamp: String::new(),
                level: String::new(),
                message: line.clone(),
            }),
            Value::Object(fields) => {
                let text = |key: &str| {
                    fields
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let message = match text("message") {
                    m if m.is_empty() => text("raw"),
                    m => m,
                };
                Some(LogEntry {
                    timestamp: text("timestamp"),
                    level: text("level"),
                    message,
                })
            }
            _ => None,
        })
        .collect()
}
