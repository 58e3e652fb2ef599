// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier and view implementations that record what they were told.

use std::sync::Mutex;

use ragline_core::{Message, Notice, Notifier, SessionView};

/// Captures every notice in the order raised.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}

/// A view hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// `scroll_to_latest`, with the newest message at that moment.
    Scrolled(Option<Message>),
    Focused,
}

/// Captures view hooks in the order invoked.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl SessionView for RecordingView {
    fn scroll_to_latest(&self, latest: Option<&Message>) {
        self.record(ViewEvent::Scrolled(latest.cloned()));
    }

    fn focus_input(&self) {
        self.record(ViewEvent::Focused);
    }
}
