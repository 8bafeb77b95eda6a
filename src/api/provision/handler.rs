// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use super::request::ProvisionCardRequest;
use super::response::ProvisionCardResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::provisioner::Provisioner;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info};

/// POST /provision/card handler
///
/// Creates a card in Metabase and, unless `enableEmbedding` is false, turns on
/// signed embedding for it. A fresh Metabase session is opened per call.
///
/// # Errors
/// - 400 `invalid_request`: body is not JSON or `cardPayload` is missing
/// - 500 `configuration_error`: Metabase credentials not configured
/// - 500 `upstream_auth_error`: Metabase rejected the credentials
/// - 500 `upstream_request_error`: a card call was rejected; `details.card_id`
///   is set when the card was already created
pub async fn provision_card_handler(
    State(state): State<AppState>,
    body: Result<Json<ProvisionCardRequest>, JsonRejection>,
) -> Result<Json<ProvisionCardResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
    let request = body.validate()?;
    debug!(
        "Provisioning card (embedding: {}, dashboard: {:?})",
        request.enable_embedding, request.dashboard_id
    );

    let provisioner = Provisioner::new(state.analytics.clone(), state.config.metabase.clone());
    let outcome = provisioner.provision(&request).await?;

    info!("Provisioned card {}: {}", outcome.card_id, outcome.message);
    Ok(Json(outcome.into()))
}
