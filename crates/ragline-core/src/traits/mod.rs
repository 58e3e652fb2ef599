// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the session layer and its collaborators.
//!
//! The backend seam uses `#[async_trait]` so the session layer can hold it
//! as `Arc<dyn RagBackend>` and tests can swap in a scripted double.

pub mod backend;
pub mod view;

pub use backend::RagBackend;
pub use view::{Notifier, SessionView};
