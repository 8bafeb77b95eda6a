// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use crate::version;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// GET /health handler
///
/// Always 200. `status` is `"degraded"` when some endpoint is known to fail
/// for lack of configuration; `issues` then says which.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let issues = state.config.issues();
    let status = if issues.is_empty() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        issues: if issues.is_empty() { None } else { Some(issues) },
    })
}
