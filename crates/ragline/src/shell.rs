// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ragline shell` command implementation.
//!
//! Launches an interactive REPL with colored output and readline history.
//! Plain lines are questions; slash commands drive the admin operations,
//! which run in the background so the prompt stays usable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use ragline_config::RaglineConfig;
use ragline_core::{RagBackend, RaglineError};
use ragline_session::normalize::log_entries;
use ragline_session::{AdminController, Invocation, QueryOrchestrator};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::{connect, tail_lines};
use crate::console::{TerminalNotifier, TerminalView};
use crate::render::{
    render_clear_receipt, render_ingest_receipt, render_log_batch, render_log_entries,
    render_structure,
};

const HELP: &str = "\
  <question>            ask the backend
  /upload PATH...       upload documents (background)
  /inspect              show the vector store structure (background)
  /clear-index [NAME]   clear one index, or all of them (background)
  /logs                 workflow log of the last answer
  /tail [N]             last N lines of the backend's own log
  /clear                clear the conversation
  /status               show what is running
  /help                 this text
  /quit, /exit          leave";

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Ask(String),
    Quit,
    ClearSession,
    ShowLogs,
    Tail(Option<u32>),
    Upload(Vec<PathBuf>),
    Inspect,
    ClearIndex(Option<String>),
    Status,
    Help,
    Empty,
    /// A slash command that could not be understood, with the reason.
    Invalid(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ShellCommand::Ask(trimmed.to_string());
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "quit" | "exit" => ShellCommand::Quit,
        "clear" => ShellCommand::ClearSession,
        "logs" => ShellCommand::ShowLogs,
        "tail" if args.is_empty() => ShellCommand::Tail(None),
        "tail" => match args.parse::<u32>() {
            Ok(n) => ShellCommand::Tail(Some(n)),
            Err(_) => ShellCommand::Invalid(format!("/tail expects a line count, got `{args}`")),
        },
        "upload" if args.is_empty() => {
            ShellCommand::Invalid("/upload needs at least one file path".to_string())
        }
        "upload" => ShellCommand::Upload(args.split_whitespace().map(PathBuf::from).collect()),
        "inspect" => ShellCommand::Inspect,
        "clear-index" => ShellCommand::ClearIndex((!args.is_empty()).then(|| args.to_string())),
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        other => ShellCommand::Invalid(format!("unknown command `/{other}`, try /help")),
    }
}

struct Shell {
    config: RaglineConfig,
    backend: Arc<dyn RagBackend>,
    orchestrator: Arc<QueryOrchestrator>,
    admin: Arc<AdminController>,
    background: Vec<JoinHandle<()>>,
}

/// Runs the `ragline shell` interactive REPL.
pub async fn run_shell(config: RaglineConfig) -> Result<(), RaglineError> {
    let backend = connect(&config)?;
    let notifier = Arc::new(TerminalNotifier);
    let orchestrator = Arc::new(QueryOrchestrator::from_config(
        &config,
        backend.clone(),
        notifier.clone(),
        Arc::new(TerminalView),
    ));
    let admin = Arc::new(AdminController::from_config(&config, backend.clone(), notifier));

    let mut rl = DefaultEditor::new()
        .map_err(|e| RaglineError::Internal(format!("failed to initialize readline: {e}")))?;
    let history = config.shell.history_file.clone().map(PathBuf::from);
    if let Some(path) = &history {
        if let Err(e) = rl.load_history(path) {
            debug!(path = %path.display(), error = %e, "no readline history loaded");
        }
    }

    println!("{}", "ragline shell".bold().green());
    println!(
        "Connected to {}. Type {} for commands, {} to exit.\n",
        config.backend.base_url.cyan(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let mut shell = Shell {
        config,
        backend,
        orchestrator,
        admin,
        background: Vec::new(),
    };

    let prompt = format!("{}> ", "ragline".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_command(&line);
                if command == ShellCommand::Empty {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());
                if command == ShellCommand::Quit {
                    break;
                }
                shell.handle(command).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    if let Some(path) = &history {
        save_history(&mut rl, path);
    }

    shell.drain().await;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn save_history(rl: &mut DefaultEditor, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(path = %parent.display(), error = %e, "cannot create history directory");
            return;
        }
    }
    if let Err(e) = rl.save_history(path) {
        warn!(path = %path.display(), error = %e, "failed to save readline history");
    }
}

impl Shell {
    async fn handle(&mut self, command: ShellCommand) {
        self.background.retain(|task| !task.is_finished());

        match command {
            ShellCommand::Ask(question) => {
                eprintln!("{}", "thinking...".dimmed());
                self.orchestrator.send(&question).await;
            }
            ShellCommand::ClearSession => self.orchestrator.clear_session().await,
            ShellCommand::ShowLogs => {
                println!("{}", render_log_batch(&self.orchestrator.logs().await));
            }
            ShellCommand::Tail(lines) => {
                let lines = tail_lines(&self.config, lines);
                match self.backend.recent_logs(lines).await {
                    Ok(raw) => println!("{}", render_log_entries(&log_entries(&raw))),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            ShellCommand::Upload(paths) => self.upload(paths).await,
            ShellCommand::Inspect => self.spawn_inspect(),
            ShellCommand::ClearIndex(name) => {
                self.admin.set_index_name(name.unwrap_or_default()).await;
                self.spawn_clear();
            }
            ShellCommand::Status => self.print_status().await,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Invalid(reason) => eprintln!("{}: {reason}", "error".red()),
            ShellCommand::Empty | ShellCommand::Quit => {}
        }
    }

    async fn upload(&mut self, paths: Vec<PathBuf>) {
        for path in &paths {
            if let Err(e) = self.admin.add_path(path).await {
                eprintln!("{}: {e}", "error".red());
            }
        }
        if self.admin.selected_files().await.is_empty() {
            return;
        }

        let admin = self.admin.clone();
        self.background.push(tokio::spawn(async move {
            match admin.upload().await {
                Invocation::Completed => {
                    if let Some(receipt) = admin.upload_state().await.last_success() {
                        eprintln!("{}", render_ingest_receipt(receipt).dimmed());
                    }
                }
                Invocation::AlreadyRunning => {
                    eprintln!("upload already in progress; the files stay selected for the next /upload");
                }
                Invocation::Failed | Invocation::NothingToSubmit => {}
            }
        }));
    }

    fn spawn_inspect(&mut self) {
        let admin = self.admin.clone();
        self.background.push(tokio::spawn(async move {
            match admin.inspect().await {
                Invocation::Completed => {
                    if let Some(structure) = admin.inspect_state().await.last_success() {
                        println!("{}\n{}", "Vector store".yellow().bold(), render_structure(structure));
                    }
                }
                Invocation::AlreadyRunning => eprintln!("inspect already in progress"),
                Invocation::Failed | Invocation::NothingToSubmit => {}
            }
        }));
    }

    fn spawn_clear(&mut self) {
        let admin = self.admin.clone();
        self.background.push(tokio::spawn(async move {
            match admin.clear_index().await {
                Invocation::Completed => {
                    if let Some(receipt) = admin.clear_state().await.last_success() {
                        eprintln!("{}", render_clear_receipt(receipt).dimmed());
                    }
                }
                Invocation::AlreadyRunning => eprintln!("clear already in progress"),
                Invocation::Failed | Invocation::NothingToSubmit => {}
            }
        }));
    }

    async fn print_status(&self) {
        let flag = |busy: bool| {
            if busy {
                "running".yellow().to_string()
            } else {
                "idle".dimmed().to_string()
            }
        };

        let session = self.orchestrator.session().await;
        println!("session   {} ({} messages)", session.id(), session.len());
        println!("query     {}", self.orchestrator.state().await);
        println!("upload    {}", flag(self.admin.upload_state().await.is_busy()));
        println!("inspect   {}", flag(self.admin.inspect_state().await.is_busy()));
        println!("clear     {}", flag(self.admin.clear_state().await.is_busy()));

        let selected = self.admin.selected_files().await;
        if !selected.is_empty() {
            println!("selected  {}", selected.join(", "));
        }
    }

    /// Waits for background admin operations so their results are not lost on exit.
    async fn drain(&mut self) {
        let pending: Vec<_> = self
            .background
            .drain(..)
            .filter(|task| !task.is_finished())
            .collect();
        if pending.is_empty() {
            return;
        }

        eprintln!(
            "{}",
            format!("waiting for {} background operation(s)...", pending.len()).dimmed()
        );
        for result in futures::future::join_all(pending).await {
            if let Err(e) = result {
                warn!(error = %e, "background operation panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_questions() {
        assert_eq!(
            parse_command("  what is CRAG?  "),
            ShellCommand::Ask("what is CRAG?".to_string())
        );
        assert_eq!(parse_command("   "), ShellCommand::Empty);
    }

    #[test]
    fn slash_commands_parse_their_arguments() {
        assert_eq!(parse_command("/quit"), ShellCommand::Quit);
        assert_eq!(parse_command("/exit"), ShellCommand::Quit);
        assert_eq!(parse_command("/tail"), ShellCommand::Tail(None));
        assert_eq!(parse_command("/tail 20"), ShellCommand::Tail(Some(20)));
        assert_eq!(
            parse_command("/upload a.pdf  b.txt"),
            ShellCommand::Upload(vec![PathBuf::from("a.pdf"), PathBuf::from("b.txt")])
        );
        assert_eq!(parse_command("/clear-index"), ShellCommand::ClearIndex(None));
        assert_eq!(
            parse_command("/clear-index docs"),
            ShellCommand::ClearIndex(Some("docs".to_string()))
        );
    }

    #[test]
    fn malformed_commands_are_reported() {
        assert!(matches!(parse_command("/tail many"), ShellCommand::Invalid(_)));
        assert!(matches!(parse_command("/upload"), ShellCommand::Invalid(_)));
        assert!(matches!(
            parse_command("/frobnicate"),
            ShellCommand::Invalid(ref m) if m.contains("/frobnicate")
        ));
    }
}
