// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ragline.
//!
//! Provides a scripted backend and recording view hooks so the session layer
//! can be tested without a running CRAG service.
//!
//! # Components
//!
//! - [`MockBackend`] - Backend facade with per-endpoint scripted replies and an optional gate
//! - [`RecordingNotifier`] - Captures every notice raised
//! - [`RecordingView`] - Captures scroll and focus hooks in order

pub mod mock_backend;
pub mod recording;

pub use mock_backend::{MockBackend, MockCall, MockReply};
pub use recording::{RecordingNotifier, RecordingView, ViewEvent};
