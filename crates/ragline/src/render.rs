// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for messages, notices, and admin results.

use colored::Colorize;
use ragline_core::{AssistantMessage, Message, Notice, NoticeLevel, UserMessage};
use ragline_session::{ClearReceipt, IngestReceipt, LogEntry};
use serde_json::Value;

pub fn render_message(message: &Message) -> String {
    match message {
        Message::User(user) => render_user(user),
        Message::Assistant(answer) => render_assistant(answer),
    }
}

fn render_user(message: &UserMessage) -> String {
    format!(
        "{} {} {}",
        message.timestamp().dimmed(),
        "you>".cyan().bold(),
        message.content()
    )
}

fn render_assistant(message: &AssistantMessage) -> String {
    let mut out = format!(
        "{} {}\n{}",
        message.timestamp().dimmed(),
        "ragline>".green().bold(),
        message.content()
    );

    if !message.sources().is_empty() {
        out.push_str(&format!("\n\n{}", "Sources".yellow().bold()));
        for (i, source) in message.sources().iter().enumerate() {
            out.push_str(&format!("\n  [{}] {source}", i + 1));
        }
    }

    if let Some(metadata) = message.metadata() {
        out.push_str(&format!("\n\n{}\n{}", "Metadata".yellow().bold(), metadata.dimmed()));
    }

    out
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("{} {}", "ok".green().bold(), notice.text),
        NoticeLevel::Info => format!("{} {}", "note".blue().bold(), notice.text),
        NoticeLevel::Error => format!("{}: {}", "error".red().bold(), notice.text),
    }
}

/// The current query's workflow log batch, one step per line.
pub fn render_log_batch(logs: &[String]) -> String {
    if logs.is_empty() {
        return "(no workflow logs yet)".dimmed().to_string();
    }
    logs.iter()
        .enumerate()
        .map(|(i, line)| format!("{:>3}. {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rows from the backend's application log tail.
pub fn render_log_entries(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "(backend returned no log lines)".dimmed().to_string();
    }
    entries
        .iter()
        .map(|entry| {
            let level = match entry.level.as_str() {
                "ERROR" | "CRITICAL" => entry.level.red().to_string(),
                "WARNING" | "WARN" => entry.level.yellow().to_string(),
                _ => entry.level.normal().to_string(),
            };
            if entry.timestamp.is_empty() && entry.level.is_empty() {
                entry.message.clone()
            } else {
                format!("{} {level:<8} {}", entry.timestamp.dimmed(), entry.message)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed index structure as returned by the backend.
pub fn render_structure(structure: &Value) -> String {
    serde_json::to_string_pretty(structure).unwrap_or_else(|_| structure.to_string())
}

pub fn render_ingest_receipt(receipt: &IngestReceipt) -> String {
    match receipt.files_processed {
        Some(n) => format!("{} ({n} file(s))", receipt.message),
        None => receipt.message.clone(),
    }
}

pub fn render_clear_receipt(receipt: &ClearReceipt) -> String {
    match receipt.deleted_objects {
        Some(n) => format!("{} ({n} object(s) deleted)", receipt.message),
        None => receipt.message.clone(),
    }
}
