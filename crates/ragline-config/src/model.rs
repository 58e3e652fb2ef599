// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ragline client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ragline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RaglineConfig {
    /// Where the CRAG backend lives.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Interactive shell and logging settings.
    #[serde(default)]
    pub shell: ShellConfig,

    /// Document upload settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Backend log tail settings.
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base address every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8002".to_string()
}

/// Shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `chrono` format string used to stamp conversation messages.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Readline history file. `None` keeps history in memory only.
    #[serde(default = "default_history_file")]
    pub history_file: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            timestamp_format: default_timestamp_format(),
            history_file: default_history_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}

fn default_history_file() -> Option<String> {
    dirs::data_dir().map(|p| p.join("ragline").join("history.txt").display().to_string())
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// File extensions (without the dot) accepted for ingestion.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "txt".to_string(), "docx".to_string()]
}

/// Backend log tail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogsConfig {
    /// Default number of lines requested from `GET /logs`.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: u32,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            tail_lines: default_tail_lines(),
        }
    }
}

fn default_tail_lines() -> u32 {
    50
}

/// Highest line count the backend will serve from its log tail.
pub const MAX_TAIL_LINES: u32 = 500;
