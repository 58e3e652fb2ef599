// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: the real HTTP facade and session layer against a
//! `wiremock` backend, plus the compiled binary's one-shot commands.
//!
//! Each test starts its own mock server and is independent of the others.

use std::path::PathBuf;
use std::process::Output;
use std::sync::Arc;

use ragline_client::RagClient;
use ragline_core::{Message, NoopView, NoticeLevel};
use ragline_session::orchestrator::APOLOGY_TEXT;
use ragline_session::{AdminController, Invocation, QueryOrchestrator, SendOutcome};
use ragline_test_utils::RecordingNotifier;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Arc<RagClient> {
    Arc::new(RagClient::with_base_url(&server.uri()).expect("mock server URI is valid"))
}

// ---- Query pipeline ----

#[tokio::test]
async fn test_query_answer_is_normalized_into_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"query": "What is CRAG?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Corrective RAG grades retrieved documents.",
            "sources": "passage one\n\npassage two\n",
            "metadata_used": {"retrieval": "web"},
            "logs": ["retrieve", "grade", "generate"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = QueryOrchestrator::new(client(&server), notifier.clone(), Arc::new(NoopView));

    assert_eq!(orchestrator.send("What is CRAG?").await, SendOutcome::Answered);

    let messages = orchestrator.messages().await;
    assert_eq!(messages.len(), 2);
    match &messages[1] {
        Message::Assistant(answer) => {
            assert_eq!(answer.content(), "Corrective RAG grades retrieved documents.");
            assert_eq!(answer.sources(), ["passage one".to_string(), "passage two".to_string()]);
            assert_eq!(answer.metadata(), Some("{\n  \"retrieval\": \"web\"\n}"));
        }
        Message::User(_) => panic!("expected an assistant message"),
    }
    assert_eq!(orchestrator.logs().await, vec!["retrieve", "grade", "generate"]);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_query_server_error_becomes_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Traceback ..."))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = QueryOrchestrator::new(client(&server), notifier.clone(), Arc::new(NoopView));

    assert_eq!(orchestrator.send("hello").await, SendOutcome::Failed);

    let messages = orchestrator.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content(), APOLOGY_TEXT);
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].text.contains("500"), "got: {}", notices[0].text);
}

// ---- Admin operations ----

#[tokio::test]
async fn test_upload_sends_selected_files_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(body_string_contains("name=\"files\"; filename=\"notes.txt\""))
        .and(body_string_contains("name=\"files\"; filename=\"paper.pdf\""))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "message": "Files uploaded successfully",
            "files": [
                {"filename": "notes.txt", "status": "processing"},
                {"filename": "paper.pdf", "status": "processing"},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    let paper = dir.path().join("paper.pdf");
    std::fs::write(&notes, b"plain text").unwrap();
    std::fs::write(&paper, b"%PDF-1.4").unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let admin = AdminController::new(client(&server), notifier.clone());
    admin.add_path(&notes).await.unwrap();
    admin.add_path(&paper).await.unwrap();

    assert_eq!(admin.upload().await, Invocation::Completed);

    let state = admin.upload_state().await;
    let receipt = state.last_success().expect("receipt recorded");
    assert_eq!(receipt.files_processed, Some(2));
    assert!(admin.selected_files().await.is_empty());
    assert_eq!(notifier.notices()[0].text, "Files uploaded successfully");
}

#[tokio::test]
async fn test_clear_with_blank_name_targets_all_indexes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/clear"))
        .and(body_json(json!({"index_name": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Cleared 2 collections",
            "total_documents_deleted": 40,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let admin = AdminController::new(client(&server), Arc::new(RecordingNotifier::new()));
    admin.set_index_name("  ").await;

    assert_eq!(admin.clear_index().await, Invocation::Completed);
    let state = admin.clear_state().await;
    assert_eq!(state.last_success().and_then(|r| r.deleted_objects), Some(40));
}

#[tokio::test]
async fn test_query_and_admin_operations_run_side_by_side() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"answer": "slow answer"}))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"collections": {"Docs": 3}})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = client(&server);
    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = QueryOrchestrator::new(backend.clone(), notifier.clone(), Arc::new(NoopView));
    let admin = AdminController::new(backend, notifier);

    let (answered, inspected) = tokio::join!(orchestrator.send("q"), admin.inspect());

    assert_eq!(answered, SendOutcome::Answered);
    assert_eq!(inspected, Invocation::Completed);
    assert_eq!(
        admin.inspect_state().await.last_success(),
        Some(&json!({"collections": {"Docs": 3}}))
    );
}

// ---- Binary ----

async fn run_ragline(server: &MockServer, args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());

    tokio::process::Command::new(env!("CARGO_BIN_EXE_ragline"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .await
        .expect("ragline binary should start")
}

fn write_config(dir: &tempfile::TempDir, base_url: &str) -> PathBuf {
    let path = dir.path().join("ragline.toml");
    std::fs::write(&path, format!("[backend]\nbase_url = \"{base_url}\"\n")).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[tokio::test]
async fn test_binary_ask_prints_the_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"query": "what is in the index"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Three documents.",
            "sources": ["doc one"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_ragline(&server, &["ask", "what", "is", "in", "the", "index"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Three documents."), "stdout: {out}");
    assert!(out.contains("[1] doc one"), "stdout: {out}");
}

#[tokio::test]
async fn test_binary_clear_index_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/clear"))
        .and(body_json(json!({"index_name": "Docs"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_ragline(&server, &["clear-index", "Docs"]).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("clear failed"), "stderr: {}", stderr(&output));
}

#[tokio::test]
async fn test_binary_logs_requests_the_given_line_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("lines", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [{
                "timestamp": "2026-01-01 10:00:00",
                "level": "INFO",
                "message": "Application startup complete",
                "raw": "2026-01-01 10:00:00 - INFO - Application startup complete",
            }],
            "total_lines": 1,
            "requested_lines": 5,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_ragline(&server, &["logs", "--lines", "5"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Application startup complete"));
}

#[tokio::test]
async fn test_binary_config_prints_effective_settings() {
    let server = MockServer::start().await;

    let output = run_ragline(&server, &["config"]).await;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[backend]"));
    assert!(out.contains(&server.uri()), "stdout: {out}");
}

#[tokio::test]
async fn test_binary_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ragline.toml");
    std::fs::write(&config, "[backend]\nbase_url = \"ftp://nowhere\"\n").unwrap();

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_ragline"))
        .arg("--config")
        .arg(&config)
        .arg("config")
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("backend.base_url"));
}
