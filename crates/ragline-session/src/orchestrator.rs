// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query orchestration: the send/settle state machine around one session.
//!
//! A query moves `Idle -> Sending -> Idle`. The user message is appended as
//! soon as a send is accepted, so it is visible while the request is in
//! flight. Exactly one assistant message follows each accepted send: either
//! the normalized answer or a fixed apology when anything went wrong.

use std::fmt::Write as _;
use std::sync::Arc;

use ragline_config::RaglineConfig;
use ragline_core::{Message, Notice, Notifier, RagBackend, RaglineError, SessionId, SessionView};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::conversation::Session;
use crate::normalize::{NormalizedAnswer, normalize_query_response};

/// Assistant text appended when a query fails for any reason.
pub const APOLOGY_TEXT: &str =
    "Sorry, I couldn't get an answer from the server. Please try again.";

/// Notice raised after the conversation is cleared.
pub const CLEARED_NOTICE: &str = "Chat history cleared";

const FALLBACK_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Whether a query is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Sending,
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryState::Idle => write!(f, "idle"),
            QueryState::Sending => write!(f, "sending"),
        }
    }
}

/// Why a send was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    /// The text was empty or whitespace only.
    EmptyInput,
    /// Another query has not settled yet.
    InFlight,
}

/// How a send call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered and the answer was appended.
    Answered,
    /// The query failed; the apology message was appended.
    Failed,
    /// Nothing was sent and the session is unchanged.
    Rejected(SendRejection),
}

struct Inner {
    session: Session,
    state: QueryState,
    draft: String,
}

/// Owns one conversation and serializes queries against it.
///
/// All entry points take `&self`; share it behind an `Arc` to drive it from
/// several tasks. The state lock is never held across the backend call.
pub struct QueryOrchestrator {
    backend: Arc<dyn RagBackend>,
    notifier: Arc<dyn Notifier>,
    view: Arc<dyn SessionView>,
    timestamp_format: String,
    inner: Mutex<Inner>,
}

impl QueryOrchestrator {
    pub fn new(
        backend: Arc<dyn RagBackend>,
        notifier: Arc<dyn Notifier>,
        view: Arc<dyn SessionView>,
    ) -> Self {
        Self {
            backend,
            notifier,
            view,
            timestamp_format: FALLBACK_TIMESTAMP_FORMAT.to_string(),
            inner: Mutex::new(Inner {
                session: Session::new(),
                state: QueryState::Idle,
                draft: String::new(),
            }),
        }
    }

    /// Builds an orchestrator using the `[shell]` settings from `config`.
    pub fn from_config(
        config: &RaglineConfig,
        backend: Arc<dyn RagBackend>,
        notifier: Arc<dyn Notifier>,
        view: Arc<dyn SessionView>,
    ) -> Self {
        Self::new(backend, notifier, view).with_timestamp_format(&config.shell.timestamp_format)
    }

    /// Sets the `chrono` format used to stamp new messages.
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = format.to_string();
        self
    }

    // --- Draft input buffer ---

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.inner.lock().await.draft = text.into();
    }

    pub async fn draft(&self) -> String {
        self.inner.lock().await.draft.clone()
    }

    /// Sends the draft input buffer.
    ///
    /// On acceptance the draft is cleared; on rejection it is left as is.
    pub async fn submit(&self) -> SendOutcome {
        let accepted = {
            let mut inner = self.inner.lock().await;
            let draft = inner.draft.clone();
            let accepted = self.accept(&mut inner, &draft);
            if accepted.is_ok() {
                inner.draft.clear();
            }
            accepted
        };
        self.run(accepted).await
    }

    /// Sends `text` directly, bypassing the draft buffer.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let accepted = {
            let mut inner = self.inner.lock().await;
            self.accept(&mut inner, text)
        };
        self.run(accepted).await
    }

    /// Empties the conversation and the log batch.
    ///
    /// Allowed while a query is in flight; that query's answer still lands
    /// in the (now empty) session when it settles.
    pub async fn clear_session(&self) {
        let id = {
            let mut inner = self.inner.lock().await;
            inner.session.clear();
            inner.session.id().clone()
        };
        info!(session_id = %id, "session cleared");
        self.view.scroll_to_latest(None);
        self.notifier.notify(Notice::success(CLEARED_NOTICE));
    }

    // --- Snapshots ---

    pub async fn state(&self) -> QueryState {
        self.inner.lock().await.state
    }

    pub async fn session_id(&self) -> SessionId {
        self.inner.lock().await.session.id().clone()
    }

    /// A copy of the conversation as it is right now.
    pub async fn session(&self) -> Session {
        self.inner.lock().await.session.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.session.messages().to_vec()
    }

    pub async fn logs(&self) -> Vec<String> {
        self.inner.lock().await.session.logs().to_vec()
    }

    // --- Internals ---

    /// Check-and-set under the caller's lock. On success the user message is
    /// already in the session and the state is `Sending`.
    fn accept(&self, inner: &mut Inner, text: &str) -> Result<Accepted, SendRejection> {
        if inner.state == QueryState::Sending {
            return Err(SendRejection::InFlight);
        }
        let question = text.trim();
        if question.is_empty() {
            return Err(SendRejection::EmptyInput);
        }

        let message = Message::user(question, self.timestamp());
        inner.session.push(message.clone());
        inner.state = QueryState::Sending;

        Ok(Accepted {
            session_id: inner.session.id().clone(),
            question: question.to_string(),
            message,
        })
    }

    async fn run(&self, accepted: Result<Accepted, SendRejection>) -> SendOutcome {
        let accepted = match accepted {
            Ok(accepted) => accepted,
            Err(rejection) => {
                debug!(?rejection, "send rejected");
                return SendOutcome::Rejected(rejection);
            }
        };

        self.view.scroll_to_latest(Some(&accepted.message));
        info!(session_id = %accepted.session_id, "query sent");

        let result = self
            .backend
            .query(&accepted.question)
            .await
            .and_then(|raw| normalize_query_response(&raw));

        let (outcome, latest, failure) = {
            let mut inner = self.inner.lock().await;
            let (outcome, message, failure) = match result {
                Ok(answer) => (SendOutcome::Answered, self.settle_answer(&mut inner, answer), None),
                Err(e) => {
                    let message = Message::assistant(APOLOGY_TEXT, self.timestamp(), Vec::new(), None);
                    (SendOutcome::Failed, message, Some(e))
                }
            };
            inner.session.push(message.clone());
            inner.state = QueryState::Idle;
            (outcome, message, failure)
        };

        match failure {
            None => info!(session_id = %accepted.session_id, "query answered"),
            Some(e) => {
                warn!(session_id = %accepted.session_id, error = %e, "query failed");
                self.notifier.notify(failure_notice(&e));
            }
        }

        self.view.scroll_to_latest(Some(&latest));
        self.view.focus_input();
        outcome
    }

    fn settle_answer(&self, inner: &mut Inner, answer: NormalizedAnswer) -> Message {
        if let Some(logs) = answer.logs {
            inner.session.replace_logs(logs);
        }
        Message::assistant(
            answer.answer,
            self.timestamp(),
            answer.sources,
            Some(answer.metadata),
        )
    }

    fn timestamp(&self) -> String {
        let now = chrono::Local::now();
        let mut stamp = String::new();
        if write!(stamp, "{}", now.format(&self.timestamp_format)).is_err() {
            stamp = now.format(FALLBACK_TIMESTAMP_FORMAT).to_string();
        }
        stamp
    }
}

struct Accepted {
    session_id: SessionId,
    question: String,
    message: Message,
}

fn failure_notice(error: &RaglineError) -> Notice {
    Notice::error(format!("query failed: {error}"))
}
