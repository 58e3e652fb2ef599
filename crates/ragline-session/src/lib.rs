// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session layer for the Ragline client.
//!
//! Holds the in-memory conversation, drives queries through the backend
//! facade, and runs the administrative operations. Everything here is
//! written against the seam traits in `ragline-core`, so it runs the same
//! behind the interactive shell, the one-shot commands, and the tests.

pub mod admin;
pub mod conversation;
pub mod normalize;
pub mod orchestrator;

pub use admin::{AdminController, Invocation};
pub use conversation::Session;
pub use normalize::{ClearReceipt, IngestReceipt, LogEntry, NormalizedAnswer};
pub use orchestrator::{QueryOrchestrator, QueryState, SendOutcome, SendRejection};
