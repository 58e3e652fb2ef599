// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ragline.toml` > `~/.config/ragline/ragline.toml` > `/etc/ragline/ragline.toml`
//! with environment variable overrides via `RAGLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RaglineConfig;

/// Path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ragline/ragline.toml";

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ragline.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ragline/ragline.toml` (system-wide)
/// 3. `~/.config/ragline/ragline.toml` (user XDG config)
/// 4. `./ragline.toml` (local directory)
/// 5. `RAGLINE_*` environment variables
pub fn load_config() -> Result<RaglineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RaglineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RaglineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RaglineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RaglineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RaglineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Location of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("ragline").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `RAGLINE_BACKEND_BASE_URL` must map to `backend.base_url`,
/// not `backend.base.url`.
fn env_provider() -> Env {
    Env::prefixed("RAGLINE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: RAGLINE_SHELL_LOG_LEVEL -> "shell_log_level"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("backend_", "backend.", 1)
            .replacen("shell_", "shell.", 1)
            .replacen("upload_", "upload.", 1)
            .replacen("logs_", "logs.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RAGLINE_BACKEND_BASE_URL", "http://rag:9000");
            jail.set_env("RAGLINE_SHELL_LOG_LEVEL", "debug");
            jail.set_env("RAGLINE_LOGS_TAIL_LINES", "120");

            let config: RaglineConfig = Figment::new()
                .merge(Serialized::defaults(RaglineConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.backend.base_url, "http://rag:9000");
            assert_eq!(config.shell.log_level, "debug");
            assert_eq!(config.logs.tail_lines, 120);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[backend]
base_url = "http://from-local-file:8002"
"#,
            )?;

            let config: RaglineConfig = Figment::new()
                .merge(Serialized::defaults(RaglineConfig::default()))
                .merge(Toml::file(LOCAL_CONFIG_FILE))
                .extract()?;

            assert_eq!(config.backend.base_url, "http://from-local-file:8002");
            assert_eq!(config.logs.tail_lines, 50);
            Ok(())
        });
    }
}
