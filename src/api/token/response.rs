// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Body of `GET /token/{card,dashboard}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of `GET /embed-url/{card,dashboard}`.
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiJ9...",
///   "iframeUrl": "https://bi.example.com/embed/question/eyJ...#bordered=true&titled=true",
///   "expiresAt": 1700000600
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedUrlResponse {
    pub token: String,
    pub iframe_url: String,
    pub expires_at: i64,
}
