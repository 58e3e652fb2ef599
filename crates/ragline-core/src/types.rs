// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the backend facade, the session layer, and views.

use std::path::Path;

use serde::Serialize;
use strum::Display;

use crate::error::RaglineError;

/// Unique identifier for an in-memory conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random session identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Conversation messages ---

/// A single entry in the conversation history.
///
/// Only assistant messages carry sources and metadata, so the role is the
/// variant rather than a field. Messages are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    User(UserMessage),
    Assistant(AssistantMessage),
}

/// Text typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    content: String,
    timestamp: String,
}

/// An answer (or synthetic error reply) from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantMessage {
    content: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<String>,
}

impl Message {
    /// Builds a user message stamped with `timestamp`.
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Message::User(UserMessage {
            content: content.into(),
            timestamp: timestamp.into(),
        })
    }

    /// Builds an assistant message with its sources and metadata.
    pub fn assistant(
        content: impl Into<String>,
        timestamp: impl Into<String>,
        sources: Vec<String>,
        metadata: Option<String>,
    ) -> Self {
        Message::Assistant(AssistantMessage {
            content: content.into(),
            timestamp: timestamp.into(),
            sources,
            metadata,
        })
    }

    pub fn content(&self) -> &str {
        match self {
            Message::User(m) => &m.content,
            Message::Assistant(m) => &m.content,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Message::User(m) => &m.timestamp,
            Message::Assistant(m) => &m.timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Message::Assistant(_))
    }
}

impl UserMessage {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl AssistantMessage {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Source passages in display order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Free-form metadata text, possibly pretty-printed JSON.
    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }
}

// --- Admin operation state ---

/// How the last invocation of an admin operation settled.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Succeeded(T),
    Failed(String),
}

/// Busy flag plus last outcome for one admin operation.
///
/// Each admin operation owns exactly one of these; instances never share state.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T> {
    busy: bool,
    last: Option<OperationResult<T>>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            busy: false,
            last: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last(&self) -> Option<&OperationResult<T>> {
        self.last.as_ref()
    }

    /// Returns the last successful payload, if the last invocation succeeded.
    pub fn last_success(&self) -> Option<&T> {
        match &self.last {
            Some(OperationResult::Succeeded(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the last error text, if the last invocation failed.
    pub fn last_error(&self) -> Option<&str> {
        match &self.last {
            Some(OperationResult::Failed(message)) => Some(message),
            _ => None,
        }
    }

    /// Marks the operation busy and forgets the previous outcome.
    ///
    /// Returns `false` (and changes nothing) if it was already busy.
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.last = None;
        true
    }

    /// Records the outcome and clears the busy flag.
    pub fn settle(&mut self, result: OperationResult<T>) {
        self.busy = false;
        self.last = Some(result);
    }
}

// --- Uploads ---

/// A document selected for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Builds an upload from in-memory bytes, inferring the content type
    /// from the file name's extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Reads a file from disk, rejecting extensions outside `allowed_extensions`.
    pub fn from_path(path: &Path, allowed_extensions: &[String]) -> Result<Self, RaglineError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RaglineError::Upload(format!("{} has no file name", path.display())))?
            .to_string();

        let extension = extension_of(&file_name).unwrap_or_default();
        if !allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(RaglineError::Upload(format!(
                "{file_name}: unsupported file type (allowed: {})",
                allowed_extensions.join(", ")
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| RaglineError::Upload(format!("failed to read {}: {e}", path.display())))?;

        Ok(Self::from_bytes(file_name, bytes))
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Content type sent for a given file name.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

// --- Notifications ---

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient, non-blocking notification raised by the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
