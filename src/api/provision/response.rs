// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::provisioner::ProvisionOutcome;
use serde::{Deserialize, Serialize};

/// Response body for POST /provision/card
///
/// ```json
/// {
///   "success": true,
///   "id": 17,
///   "message": "Card created and embedding enabled successfully",
///   "embeddingEnabled": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionCardResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
    pub embedding_enabled: bool,
}

impl From<ProvisionOutcome> for ProvisionCardResponse {
    fn from(outcome: ProvisionOutcome) -> Self {
        Self {
            success: true,
            id: outcome.card_id,
            message: outcome.message,
            embedding_enabled: outcome.embedding_enabled,
        }
    }
}
