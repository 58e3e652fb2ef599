// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ragline client.
//!
//! This crate provides the conversation data model, the error type, and the
//! seam traits (backend facade, notifier, view hooks) that the session layer
//! is written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RaglineError;
pub use types::{
    AssistantMessage, Message, Notice, NoticeLevel, OperationResult, OperationState, SessionId,
    UploadFile, UserMessage,
};

pub use traits::view::NoopView;
pub use traits::{Notifier, RagBackend, SessionView};
