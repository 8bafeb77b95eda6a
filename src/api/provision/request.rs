// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request body for POST /provision/card

use crate::api::ApiError;
use crate::provisioner::{is_empty_payload, ProvisionRequest, MSG_PAYLOAD_REQUIRED};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for POST /provision/card
///
/// # Fields
/// - `card_payload`: Metabase card definition, forwarded as-is (required)
/// - `enable_embedding`: Turn on signed embedding after creation (default: true)
/// - `dashboard_id`: Dashboard the card is created in (optional)
/// - `card_width` / `card_height`: Layout hints of any JSON type, logged but
///   not forwarded
///
/// # Example
/// ```json
/// {
///   "cardPayload": { "name": "Revenue", "display": "line", "dataset_query": {} },
///   "enableEmbedding": true,
///   "dashboardId": 3
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionCardRequest {
    #[serde(default)]
    pub card_payload: Option<Value>,

    #[serde(default)]
    pub enable_embedding: Option<bool>,

    #[serde(default)]
    pub dashboard_id: Option<i64>,

    #[serde(default)]
    pub card_width: Option<Value>,

    #[serde(default)]
    pub card_height: Option<Value>,
}

impl ProvisionCardRequest {
    /// Validates the body and converts it into a pipeline request.
    ///
    /// # Validation Rules
    /// 1. **cardPayload**: must be present and not empty (`null`, `false`,
    ///    `0` and `""` count as empty)
    pub fn validate(self) -> Result<ProvisionRequest, ApiError> {
        let card_payload = match self.card_payload {
            Some(payload) if !is_empty_payload(&payload) => payload,
            _ => return Err(ApiError::InvalidRequest(MSG_PAYLOAD_REQUIRED.to_string())),
        };

        Ok(ProvisionRequest {
            card_payload,
            enable_embedding: self.enable_embedding.unwrap_or(true),
            dashboard_id: self.dashboard_id,
            card_width: self.card_width,
            card_height: self.card_height,
        })
    }
}
