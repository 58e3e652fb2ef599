// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: `ask`, `ingest`, `inspect`, `clear-index`, `logs`, `config`.
//!
//! Each builds the same session-layer objects the shell uses, runs a single
//! operation, prints the result to stdout, and maps the outcome to an exit code.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ragline_client::RagClient;
use ragline_config::RaglineConfig;
use ragline_config::model::MAX_TAIL_LINES;
use ragline_core::{RagBackend, RaglineError};
use ragline_session::normalize::log_entries;
use ragline_session::{AdminController, Invocation, QueryOrchestrator, SendOutcome};

use crate::console::{ErrorNotifier, TerminalNotifier, TerminalView};
use crate::render::{
    render_clear_receipt, render_ingest_receipt, render_log_entries, render_structure,
};

pub(crate) fn connect(config: &RaglineConfig) -> Result<Arc<dyn RagBackend>, RaglineError> {
    Ok(Arc::new(RagClient::new(config)?))
}

/// Clamps a requested tail length into the range the backend serves.
pub(crate) fn tail_lines(config: &RaglineConfig, requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(config.logs.tail_lines)
        .clamp(1, MAX_TAIL_LINES)
}

fn exit_code(invocation: Invocation) -> ExitCode {
    match invocation {
        Invocation::Completed => ExitCode::SUCCESS,
        Invocation::Failed | Invocation::AlreadyRunning | Invocation::NothingToSubmit => {
            ExitCode::FAILURE
        }
    }
}

pub async fn run_ask(config: &RaglineConfig, question: &str) -> Result<ExitCode, RaglineError> {
    let orchestrator = QueryOrchestrator::from_config(
        config,
        connect(config)?,
        Arc::new(TerminalNotifier),
        Arc::new(TerminalView),
    );

    Ok(match orchestrator.send(question).await {
        SendOutcome::Answered => ExitCode::SUCCESS,
        SendOutcome::Failed => ExitCode::FAILURE,
        SendOutcome::Rejected(_) => {
            return Err(RaglineError::Internal("question is empty".to_string()));
        }
    })
}

pub async fn run_ingest(
    config: &RaglineConfig,
    paths: &[PathBuf],
) -> Result<ExitCode, RaglineError> {
    let admin = AdminController::from_config(config, connect(config)?, Arc::new(ErrorNotifier));
    for path in paths {
        admin.add_path(path).await?;
    }

    let invocation = admin.upload().await;
    if let Some(receipt) = admin.upload_state().await.last_success() {
        println!("{}", render_ingest_receipt(receipt));
    }
    Ok(exit_code(invocation))
}

pub async fn run_inspect(config: &RaglineConfig) -> Result<ExitCode, RaglineError> {
    let admin = AdminController::from_config(config, connect(config)?, Arc::new(ErrorNotifier));

    let invocation = admin.inspect().await;
    if let Some(structure) = admin.inspect_state().await.last_success() {
        println!("{}", render_structure(structure));
    }
    Ok(exit_code(invocation))
}

pub async fn run_clear_index(
    config: &RaglineConfig,
    name: Option<String>,
) -> Result<ExitCode, RaglineError> {
    let admin = AdminController::from_config(config, connect(config)?, Arc::new(ErrorNotifier));
    admin.set_index_name(name.unwrap_or_default()).await;

    let invocation = admin.clear_index().await;
    if let Some(receipt) = admin.clear_state().await.last_success() {
        println!("{}", render_clear_receipt(receipt));
    }
    Ok(exit_code(invocation))
}

pub async fn run_logs(config: &RaglineConfig, lines: Option<u32>) -> Result<ExitCode, RaglineError> {
    let backend = connect(config)?;
    let raw = backend.recent_logs(tail_lines(config, lines)).await?;
    println!("{}", render_log_entries(&log_entries(&raw)));
    Ok(ExitCode::SUCCESS)
}

/// Prints the effective configuration as TOML.
pub fn run_config(config: &RaglineConfig) -> Result<ExitCode, RaglineError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| RaglineError::Internal(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(ExitCode::SUCCESS)
}
