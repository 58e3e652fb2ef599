// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, log level names, and the backend's log tail range.

use crate::diagnostic::ConfigError;
use crate::model::{MAX_TAIL_LINES, RaglineConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RaglineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "backend.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("backend.base_url `{base_url}` must start with http:// or https://"),
        });
    } else if base_url.trim_end_matches('/').ends_with("://") {
        errors.push(ConfigError::Validation {
            message: format!("backend.base_url `{base_url}` has no host"),
        });
    }

    let level = config.shell.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "shell.log_level `{}` is not one of {}",
                config.shell.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.shell.timestamp_format.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "shell.timestamp_format must not be empty".to_string(),
        });
    }

    if let Some(history) = &config.shell.history_file {
        if history.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "shell.history_file must not be empty when set".to_string(),
            });
        }
    }

    if config.upload.allowed_extensions.is_empty() {
        errors.push(ConfigError::Validation {
            message: "upload.allowed_extensions must list at least one extension".to_string(),
        });
    }

    for (i, ext) in config.upload.allowed_extensions.iter().enumerate() {
        if ext.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("upload.allowed_extensions[{i}] must not be empty"),
            });
        } else if ext.starts_with('.') {
            errors.push(ConfigError::Validation {
                message: format!(
                    "upload.allowed_extensions[{i}] `{ext}` must not start with a dot"
                ),
            });
        }
    }

    if config.logs.tail_lines == 0 || config.logs.tail_lines > MAX_TAIL_LINES {
        errors.push(ConfigError::Validation {
            message: format!(
                "logs.tail_lines must be between 1 and {MAX_TAIL_LINES}, got {}",
                config.logs.tail_lines
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
