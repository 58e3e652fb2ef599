// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier and view hooks that write to the terminal.

use std::io::Write;

use ragline_core::{Message, Notice, NoticeLevel, Notifier, SessionView};

use crate::render::{render_message, render_notice};

/// Prints notices to stderr so they never mix with answers piped from stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", render_notice(&notice));
    }
}

/// Prints each new assistant message as it lands.
///
/// User messages are not echoed; the user just typed them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalView;

impl SessionView for TerminalView {
    fn scroll_to_latest(&self, latest: Option<&Message>) {
        if let Some(message) = latest.filter(|m| m.is_assistant()) {
            println!("{}\n", render_message(message));
        }
    }

    fn focus_input(&self) {
        std::io::stdout().flush().ok();
    }
}

/// Forwards only error notices.
///
/// One-shot commands print their own results to stdout, so success notices
/// would only repeat them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorNotifier;

impl Notifier for ErrorNotifier {
    fn notify(&self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            eprintln!("{}", render_notice(&notice));
        }
    }
}
