// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ragline client.

use thiserror::Error;

/// The primary error type used across the backend facade and the session layer.
#[derive(Debug, Error)]
pub enum RaglineError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response arrived with a status outside the success range.
    #[error("backend returned {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// A success response whose shape cannot be turned into a message.
    #[error("malformed backend response: {0}")]
    Normalize(String),

    /// A local file could not be prepared for upload.
    #[error("upload error: {0}")]
    Upload(String),

    /// Configuration errors (invalid base URL, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RaglineError {
    /// Returns true for the two kinds that originate at the HTTP facade.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            RaglineError::Transport { .. } | RaglineError::HttpStatus { .. }
        )
    }
}
