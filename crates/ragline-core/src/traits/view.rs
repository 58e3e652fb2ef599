// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presentation hooks the session layer drives after state changes.

use crate::types::{Message, Notice};

/// Receives transient notifications (toasts in a GUI, stderr lines in a shell).
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notice: Notice);
}

/// View side effects that follow conversation mutations.
pub trait SessionView: Send + Sync + 'static {
    /// Called after every conversation mutation with the newest entry, or
    /// `None` when the conversation was just cleared.
    fn scroll_to_latest(&self, latest: Option<&Message>);

    /// Called once a query has settled, successfully or not.
    fn focus_input(&self);
}

/// A view that ignores every hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopView;

impl SessionView for NoopView {
    fn scroll_to_latest(&self, _latest: Option<&Message>) {}

    fn focus_input(&self) {}
}
