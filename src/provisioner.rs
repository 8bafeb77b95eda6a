// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Card provisioning pipeline.
//!
//! Linear and single-shot: validate, authenticate, create, and optionally
//! enable embedding. The first failing step ends the call. Nothing is retried
//! or rolled back, so a card can be left created but not embeddable; the
//! error then carries the card id.

use crate::config::{ConfigError, MetabaseSettings};
use crate::metabase::{AnalyticsApi, MetabaseError};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MSG_CREATED_WITH_EMBEDDING: &str = "Card created and embedding enabled successfully";
pub const MSG_CREATED: &str = "Card created successfully";
pub const MSG_PAYLOAD_REQUIRED: &str = "Card payload is required";

/// `null`, `false`, `0` and `""` carry no card definition.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStage {
    Validation,
    Configuration,
    Authentication,
    CardCreation,
    SettingsRead,
    EmbeddingUpdate,
}

impl ProvisionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionStage::Validation => "validation",
            ProvisionStage::Configuration => "configuration",
            ProvisionStage::Authentication => "authentication",
            ProvisionStage::CardCreation => "card_creation",
            ProvisionStage::SettingsRead => "settings_read",
            ProvisionStage::EmbeddingUpdate => "embedding_update",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Failed to authenticate with Metabase")]
    Authentication(#[source] MetabaseError),

    #[error("Failed to create Metabase card: {}", creation_detail(.0))]
    CardCreation(#[source] MetabaseError),

    #[error("Failed to fetch card settings")]
    SettingsRead {
        card_id: i64,
        #[source]
        source: MetabaseError,
    },

    #[error("Failed to enable embedding for card")]
    EmbeddingUpdate {
        card_id: i64,
        #[source]
        source: MetabaseError,
    },
}

fn creation_detail(err: &MetabaseError) -> String {
    match err.upstream_body() {
        Some(body) => body.to_string(),
        None => err.to_string(),
    }
}

impl ProvisionError {
    pub fn stage(&self) -> ProvisionStage {
        match self {
            ProvisionError::InvalidRequest(_) => ProvisionStage::Validation,
            ProvisionError::Configuration(_) => ProvisionStage::Configuration,
            ProvisionError::Authentication(_) => ProvisionStage::Authentication,
            ProvisionError::CardCreation(_) => ProvisionStage::CardCreation,
            ProvisionError::SettingsRead { .. } => ProvisionStage::SettingsRead,
            ProvisionError::EmbeddingUpdate { .. } => ProvisionStage::EmbeddingUpdate,
        }
    }

    /// Id of a card that was created before the failure.
    pub fn card_id(&self) -> Option<i64> {
        match self {
            ProvisionError::SettingsRead { card_id, .. }
            | ProvisionError::EmbeddingUpdate { card_id, .. } => Some(*card_id),
            _ => None,
        }
    }

    pub fn upstream(&self) -> Option<&MetabaseError> {
        match self {
            ProvisionError::Authentication(source) | ProvisionError::CardCreation(source) => {
                Some(source)
            }
            ProvisionError::SettingsRead { source, .. }
            | ProvisionError::EmbeddingUpdate { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One provisioning call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRequest {
    pub card_payload: Value,
    pub enable_embedding: bool,
    pub dashboard_id: Option<i64>,
    pub card_width: Option<Value>,
    pub card_height: Option<Value>,
}

impl ProvisionRequest {
    pub fn new(card_payload: Value) -> Self {
        Self {
            card_payload,
            enable_embedding: true,
            dashboard_id: None,
            card_width: None,
            card_height: None,
        }
    }

    /// Body for `POST /api/card`: the payload, with `dashboard_id` merged in
    /// when a dashboard was requested.
    pub fn creation_body(&self) -> Result<Value, ProvisionError> {
        if is_empty_payload(&self.card_payload) {
            return Err(ProvisionError::InvalidRequest(MSG_PAYLOAD_REQUIRED.to_string()));
        }

        let Some(dashboard_id) = self.dashboard_id else {
            return Ok(self.card_payload.clone());
        };

        let mut body = self.card_payload.clone();
        match body.as_object_mut() {
            Some(object) => {
                object.insert("dashboard_id".to_string(), json!(dashboard_id));
                Ok(body)
            }
            None => Err(ProvisionError::InvalidRequest(
                "Card payload must be a JSON object when dashboardId is given".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionOutcome {
    pub card_id: i64,
    pub embedding_enabled: bool,
    pub message: String,
}

pub struct Provisioner {
    api: Arc<dyn AnalyticsApi>,
    settings: MetabaseSettings,
}

impl Provisioner {
    pub fn new(api: Arc<dyn AnalyticsApi>, settings: MetabaseSettings) -> Self {
        Self { api, settings }
    }

    pub async fn provision(
        &self,
        request: &ProvisionRequest,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        let body = request.creation_body()?;
        let credentials = self.settings.credentials()?;

        if request.card_width.is_some() || request.card_height.is_some() {
            debug!(
                "Card size hint {:?}x{:?} is not forwarded to Metabase",
                request.card_width, request.card_height
            );
        }

        // Fresh session per call; it is dropped when this function returns.
        let session = self
            .api
            .create_session(&credentials)
            .await
            .map_err(ProvisionError::Authentication)?;

        let card = self
            .api
            .create_card(&session, &body)
            .await
            .map_err(ProvisionError::CardCreation)?;
        let card_id = card.id;
        info!("Created Metabase card {}", card_id);

        if !request.enable_embedding {
            return Ok(ProvisionOutcome {
                card_id,
                embedding_enabled: false,
                message: MSG_CREATED.to_string(),
            });
        }

        self.api
            .get_card(&session, card_id)
            .await
            .map_err(|source| {
                warn!("Card {} created but its settings could not be read", card_id);
                ProvisionError::SettingsRead { card_id, source }
            })?;

        let changes = json!({
            "enable_embedding": true,
            "embedding_params": {},
        });
        self.api
            .update_card(&session, card_id, &changes)
            .await
            .map_err(|source| {
                warn!("Card {} created but embedding could not be enabled", card_id);
                ProvisionError::EmbeddingUpdate { card_id, source }
            })?;

        info!("Enabled embedding for card {}", card_id);
        Ok(ProvisionOutcome {
            card_id,
            embedding_enabled: true,
            message: MSG_CREATED_WITH_EMBEDDING.to_string(),
        })
    }
}
