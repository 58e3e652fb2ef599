// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store.

use ragline_core::{Message, SessionId};

/// Ordered message history plus the most recent query's log batch.
///
/// Messages are append-only; the only other mutation is a full clear.
/// The log batch is never appended to, only replaced or reset.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    logs: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::generate(),
            messages: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The newest message, if any.
    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub(crate) fn replace_logs(&mut self, logs: Vec<String>) {
        self.logs = logs;
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
        self.logs.clear();
    }
}
