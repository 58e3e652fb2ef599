// SPDX-FileCopyrightText: 2026 Ragline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request bodies for the backend's JSON endpoints.
//!
//! Responses are deliberately not typed here; they are decoded as
//! `serde_json::Value` and reshaped by the session layer's normalizer.

use serde::Serialize;

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

/// Body of `DELETE /clear`. `None` serializes as `null` (all collections).
#[derive(Debug, Clone, Serialize)]
pub struct ClearIndexRequest<'a> {
    pub index_name: Option<&'a str>,
}

/// Multipart field name used for every uploaded document.
pub const UPLOAD_FIELD: &str = "files";
