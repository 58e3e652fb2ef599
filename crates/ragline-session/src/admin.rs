// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrative operations: document upload, index inspection, index clear.
//!
//! Each operation has its own busy flag and last outcome. The three are
//! independent of each other and of queries; only re-invoking the same
//! operation while it runs is refused.

use std::path::Path;
use std::sync::Arc;

use ragline_config::RaglineConfig;
use ragline_config::model::UploadConfig;
use ragline_core::{
    Notice, Notifier, OperationResult, OperationState, RagBackend, RaglineError, UploadFile,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::normalize::{ClearReceipt, IngestReceipt, clear_receipt, ingest_receipt};

/// How an admin invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Completed,
    Failed,
    /// The same operation was already running; nothing was sent.
    AlreadyRunning,
    /// Upload only: the selection was empty; nothing was sent.
    NothingToSubmit,
}

#[derive(Default)]
struct UploadSlot {
    state: OperationState<IngestReceipt>,
    selection: Vec<UploadFile>,
}

#[derive(Default)]
struct ClearSlot {
    state: OperationState<ClearReceipt>,
    index_name: String,
}

/// Runs the three admin operations against a shared backend.
pub struct AdminController {
    backend: Arc<dyn RagBackend>,
    notifier: Arc<dyn Notifier>,
    allowed_extensions: Vec<String>,
    upload: Mutex<UploadSlot>,
    inspect: Mutex<OperationState<Value>>,
    clear: Mutex<ClearSlot>,
}

impl AdminController {
    pub fn new(backend: Arc<dyn RagBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            allowed_extensions: UploadConfig::default().allowed_extensions,
            upload: Mutex::new(UploadSlot::default()),
            inspect: Mutex::new(OperationState::default()),
            clear: Mutex::new(ClearSlot::default()),
        }
    }

    /// Builds a controller that accepts the extensions listed in `[upload]`.
    pub fn from_config(
        config: &RaglineConfig,
        backend: Arc<dyn RagBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut controller = Self::new(backend, notifier);
        controller.allowed_extensions = config.upload.allowed_extensions.clone();
        controller
    }

    // --- Upload ---

    /// Replaces the current file selection.
    pub async fn select_files(&self, files: Vec<UploadFile>) {
        self.upload.lock().await.selection = files;
    }

    pub async fn add_file(&self, file: UploadFile) {
        self.upload.lock().await.selection.push(file);
    }

    /// Reads `path` and adds it to the selection if its extension is allowed.
    pub async fn add_path(&self, path: &Path) -> Result<(), RaglineError> {
        let file = UploadFile::from_path(path, &self.allowed_extensions)?;
        self.add_file(file).await;
        Ok(())
    }

    /// File names in the current selection.
    pub async fn selected_files(&self) -> Vec<String> {
        self.upload
            .lock()
            .await
            .selection
            .iter()
            .map(|f| f.file_name.clone())
            .collect()
    }

    /// Uploads the current selection.
    ///
    /// The selection is consumed by the attempt whatever its outcome.
    pub async fn upload(&self) -> Invocation {
        let files = {
            let mut slot = self.upload.lock().await;
            if slot.state.is_busy() {
                return Invocation::AlreadyRunning;
            }
            if slot.selection.is_empty() {
                return Invocation::NothingToSubmit;
            }
            slot.state.begin();
            std::mem::take(&mut slot.selection)
        };

        info!(files = files.len(), "uploading documents");
        let result = self.backend.upload_documents(&files).await;

        let mut slot = self.upload.lock().await;
        match result {
            Ok(raw) => {
                let receipt = ingest_receipt(&raw);
                info!(files_processed = ?receipt.files_processed, "upload completed");
                self.notifier.notify(Notice::success(receipt.message.clone()));
                slot.state.settle(OperationResult::Succeeded(receipt));
                Invocation::Completed
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                self.notifier.notify(Notice::error(format!("upload failed: {e}")));
                slot.state.settle(OperationResult::Failed(e.to_string()));
                Invocation::Failed
            }
        }
    }

    pub async fn upload_state(&self) -> OperationState<IngestReceipt> {
        self.upload.lock().await.state.clone()
    }

    // --- Inspect ---

    /// Fetches the index structure and keeps it verbatim.
    pub async fn inspect(&self) -> Invocation {
        if !self.inspect.lock().await.begin() {
            return Invocation::AlreadyRunning;
        }

        let result = self.backend.inspect_structure().await;

        let mut state = self.inspect.lock().await;
        match result {
            Ok(structure) => {
                info!("index structure fetched");
                state.settle(OperationResult::Succeeded(structure));
                Invocation::Completed
            }
            Err(e) => {
                warn!(error = %e, "inspect failed");
                self.notifier.notify(Notice::error(format!("inspect failed: {e}")));
                state.settle(OperationResult::Failed(e.to_string()));
                Invocation::Failed
            }
        }
    }

    pub async fn inspect_state(&self) -> OperationState<Value> {
        self.inspect.lock().await.clone()
    }

    // --- Clear ---

    pub async fn set_index_name(&self, name: impl Into<String>) {
        self.clear.lock().await.index_name = name.into();
    }

    pub async fn index_name(&self) -> String {
        self.clear.lock().await.index_name.clone()
    }

    /// Clears the named index, or every index when the name is blank.
    ///
    /// The name field is reset only on success.
    pub async fn clear_index(&self) -> Invocation {
        let target = {
            let mut slot = self.clear.lock().await;
            if !slot.state.begin() {
                return Invocation::AlreadyRunning;
            }
            let name = slot.index_name.trim();
            (!name.is_empty()).then(|| name.to_string())
        };

        info!(index = target.as_deref().unwrap_or("<all>"), "clearing index");
        let result = self.backend.clear_index(target.as_deref()).await;

        let mut slot = self.clear.lock().await;
        match result {
            Ok(raw) => {
                let receipt = clear_receipt(&raw);
                info!(deleted_objects = ?receipt.deleted_objects, "index cleared");
                self.notifier.notify(Notice::success(receipt.message.clone()));
                slot.index_name.clear();
                slot.state.settle(OperationResult::Succeeded(receipt));
                Invocation::Completed
            }
            Err(e) => {
                warn!(error = %e, "clear failed");
                self.notifier.notify(Notice::error(format!("clear failed: {e}")));
                slot.state.settle(OperationResult::Failed(e.to_string()));
                Invocation::Failed
            }
        }
    }

    pub async fn clear_state(&self) -> OperationState<ClearReceipt> {
        self.clear.lock().await.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_core::NoticeLevel;
    use ragline_test_utils::{MockBackend, MockCall, MockReply, RecordingNotifier};
    use serde_json::json;

    fn controller(backend: &Arc<MockBackend>) -> (Arc<AdminController>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let admin = Arc::new(AdminController::new(backend.clone(), notifier.clone()));
        (admin, notifier)
    }

    fn txt(name: &str) -> UploadFile {
        UploadFile::from_bytes(name, b"body".to_vec())
    }

    #[tokio::test]
    async fn upload_with_empty_selection_sends_nothing() {
        let backend = Arc::new(MockBackend::new());
        let (admin, notifier) = controller(&backend);

        assert_eq!(admin.upload().await, Invocation::NothingToSubmit);
        assert_eq!(backend.call_count(), 0);
        assert!(!admin.upload_state().await.is_busy());
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn upload_success_records_receipt_and_resets_selection() {
        let backend = Arc::new(MockBackend::new());
        backend.push_upload(MockReply::Json(json!({
            "message": "Files uploaded successfully",
            "files": [{"filename": "a.txt", "status": "processing"}, {"filename": "b.txt", "status": "processing"}],
        })));
        let (admin, notifier) = controller(&backend);

        admin.select_files(vec![txt("a.txt"), txt("b.txt")]).await;
        assert_eq!(admin.selected_files().await, vec!["a.txt", "b.txt"]);
        assert_eq!(admin.upload().await, Invocation::Completed);

        assert_eq!(
            backend.calls(),
            vec![MockCall::Upload(vec!["a.txt".into(), "b.txt".into()])]
        );
        let state = admin.upload_state().await;
        assert!(!state.is_busy());
        let receipt = state.last_success().expect("receipt recorded");
        assert_eq!(receipt.message, "Files uploaded successfully");
        assert_eq!(receipt.files_processed, Some(2));
        assert!(admin.selected_files().await.is_empty());
        assert_eq!(
            notifier.notices(),
            vec![Notice::success("Files uploaded successfully")]
        );
    }

    #[tokio::test]
    async fn upload_failure_records_error_and_resets_selection() {
        let backend = Arc::new(MockBackend::new());
        backend.push_upload(MockReply::Status(500));
        let (admin, notifier) = controller(&backend);

        admin.add_file(txt("a.txt")).await;
        assert_eq!(admin.upload().await, Invocation::Failed);

        let state = admin.upload_state().await;
        assert!(!state.is_busy());
        assert!(state.last_error().is_some_and(|e| e.contains("500")));
        assert!(admin.selected_files().await.is_empty());
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn add_path_enforces_allowed_extensions() {
        let backend = Arc::new(MockBackend::new());
        let (admin, _notifier) = controller(&backend);
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("notes.txt");
        let bad = dir.path().join("image.png");
        std::fs::write(&good, b"hello").unwrap();
        std::fs::write(&bad, b"png").unwrap();

        admin.add_path(&good).await.unwrap();
        assert!(matches!(
            admin.add_path(&bad).await,
            Err(RaglineError::Upload(_))
        ));
        assert_eq!(admin.selected_files().await, vec!["notes.txt"]);
    }

    #[tokio::test]
    async fn inspect_stores_structure_verbatim() {
        let backend = Arc::new(MockBackend::new());
        let structure = json!({"collections": {"docs": {"count": 3, "properties": ["text"]}}});
        backend.push_inspect(MockReply::Json(structure.clone()));
        let (admin, notifier) = controller(&backend);

        assert_eq!(admin.inspect().await, Invocation::Completed);
        assert_eq!(admin.inspect_state().await.last_success(), Some(&structure));
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn inspect_failure_notifies() {
        let backend = Arc::new(MockBackend::new());
        backend.push_inspect(MockReply::Transport("connection refused".into()));
        let (admin, notifier) = controller(&backend);

        assert_eq!(admin.inspect().await, Invocation::Failed);
        assert!(admin.inspect_state().await.last_error().is_some());
        assert!(notifier.notices()[0].text.contains("connection refused"));
    }

    #[tokio::test]
    async fn blank_index_name_clears_everything() {
        let backend = Arc::new(MockBackend::new());
        let (admin, _notifier) = controller(&backend);

        admin.set_index_name("   ").await;
        assert_eq!(admin.clear_index().await, Invocation::Completed);
        assert_eq!(backend.calls(), vec![MockCall::Clear(None)]);
    }

    #[tokio::test]
    async fn clear_success_resets_the_name() {
        let backend = Arc::new(MockBackend::new());
        backend.push_clear(MockReply::Json(json!({
            "message": "Cleared docs",
            "total_documents_deleted": 12,
        })));
        let (admin, notifier) = controller(&backend);

        admin.set_index_name(" docs ").await;
        assert_eq!(admin.clear_index().await, Invocation::Completed);

        assert_eq!(backend.calls(), vec![MockCall::Clear(Some("docs".into()))]);
        assert_eq!(admin.index_name().await, "");
        let state = admin.clear_state().await;
        assert_eq!(state.last_success().and_then(|r| r.deleted_objects), Some(12));
        assert_eq!(notifier.notices(), vec![Notice::success("Cleared docs")]);
    }

    #[tokio::test]
    async fn clear_failure_keeps_the_name() {
        let backend = Arc::new(MockBackend::new());
        backend.push_clear(MockReply::Status(404));
        let (admin, notifier) = controller(&backend);

        admin.set_index_name("docs").await;
        assert_eq!(admin.clear_index().await, Invocation::Failed);
        assert_eq!(admin.index_name().await, "docs");
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn operations_run_independently() {
        let backend = Arc::new(MockBackend::gated());
        let (admin, _notifier) = controller(&backend);
        admin.add_file(txt("a.txt")).await;

        let upload = {
            let admin = admin.clone();
            tokio::spawn(async move { admin.upload().await })
        };
        let inspect = {
            let admin = admin.clone();
            tokio::spawn(async move { admin.inspect().await })
        };
        backend.wait_for_calls(2).await;

        assert!(admin.upload_state().await.is_busy());
        assert!(admin.inspect_state().await.is_busy());
        assert!(!admin.clear_state().await.is_busy());

        // Re-invoking a running operation is refused without a request.
        admin.add_file(txt("b.txt")).await;
        assert_eq!(admin.upload().await, Invocation::AlreadyRunning);
        assert_eq!(admin.inspect().await, Invocation::AlreadyRunning);
        assert_eq!(backend.call_count(), 2);

        backend.release(2);
        assert_eq!(upload.await.unwrap(), Invocation::Completed);
        assert_eq!(inspect.await.unwrap(), Invocation::Completed);
        assert!(!admin.upload_state().await.is_busy());
        assert_eq!(admin.selected_files().await, vec!["b.txt"]);
    }
}
