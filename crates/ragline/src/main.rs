// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ragline - a terminal client for a corrective RAG backend.
//!
//! This is the binary entry point: argument parsing, configuration loading,
//! tracing setup, and dispatch to the shell or a one-shot command.

mod commands;
mod console;
mod render;
mod shell;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Ragline - chat with your documents through a CRAG backend.
#[derive(Parser, Debug)]
#[command(name = "ragline", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session (the default).
    Shell,
    /// Ask one question and print the answer.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Upload documents for ingestion.
    Ingest {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },
    /// Print the vector store structure.
    Inspect,
    /// Clear one index, or every index when no name is given.
    ClearIndex { name: Option<String> },
    /// Print the tail of the backend's application log.
    Logs {
        /// Number of lines to fetch (1-500).
        #[arg(short = 'n', long)]
        lines: Option<u32>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ragline_config::load_and_validate_path(path),
        None => ragline_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            ragline_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.shell.log_level);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run_shell(config).await.map(|()| ExitCode::SUCCESS),
        Commands::Ask { question } => commands::run_ask(&config, &question.join(" ")).await,
        Commands::Ingest { paths } => commands::run_ingest(&config, &paths).await,
        Commands::Inspect => commands::run_inspect(&config).await,
        Commands::ClearIndex { name } => commands::run_clear_index(&config, name).await,
        Commands::Logs { lines } => commands::run_logs(&config, lines).await,
        Commands::Config => commands::run_config(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ragline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
