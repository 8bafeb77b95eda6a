// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Token and embed-URL handlers.
//!
//! Every handler reads the raw query pairs so filter parameters pass through
//! under the names the caller used. The identifier is checked before the secret, so
//! a bad request is reported as such even on a misconfigured gateway.

use super::response::{EmbedUrlResponse, TokenResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::embedding::{EmbedRequest, EmbedUrlBuilder, IssuedToken, ResourceKind, TokenIssuer};
use axum::extract::{Query, State};
use axum::Json;
use tracing::{debug, info};

type QueryPairs = Query<Vec<(String, String)>>;

/// GET /token/card handler
///
/// # Request
/// `?cardId=<integer>&<filter>=<value>...`
///
/// # Response
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..." }
/// ```
///
/// # Errors
/// - 400 `invalid_request`: `cardId` missing or not an integer
/// - 500 `configuration_error`: signing secret not configured
pub async fn card_token_handler(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = sign(&state, ResourceKind::Card, pairs)?;
    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// GET /token/dashboard handler
///
/// Same contract as [`card_token_handler`] keyed on `dashboardId`.
pub async fn dashboard_token_handler(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = sign(&state, ResourceKind::Dashboard, pairs)?;
    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// GET /embed-url/card handler
///
/// Signs a card token and returns it with the iframe URL and expiry.
///
/// # Errors
/// As [`card_token_handler`], plus 500 `configuration_error` when the public
/// site URL is not configured.
pub async fn card_embed_url_handler(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<EmbedUrlResponse>, ApiError> {
    embed_url(&state, ResourceKind::Card, pairs).map(Json)
}

/// GET /embed-url/dashboard handler
pub async fn dashboard_embed_url_handler(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<EmbedUrlResponse>, ApiError> {
    embed_url(&state, ResourceKind::Dashboard, pairs).map(Json)
}

fn sign(
    state: &AppState,
    kind: ResourceKind,
    pairs: Vec<(String, String)>,
) -> Result<IssuedToken, ApiError> {
    let request = EmbedRequest::from_query(kind, pairs)?;
    let issuer = TokenIssuer::from_secret(state.config.embedding.secret_key.as_deref())?;
    let issued = issuer.issue(&request)?;

    info!(
        "Issued {} token for id {} (params: {:?})",
        kind,
        request.resource_id,
        request.params.keys().collect::<Vec<_>>()
    );
    Ok(issued)
}

fn embed_url(
    state: &AppState,
    kind: ResourceKind,
    pairs: Vec<(String, String)>,
) -> Result<EmbedUrlResponse, ApiError> {
    let issued = sign(state, kind, pairs)?;
    let builder = EmbedUrlBuilder::new(
        state.config.embedding.public_site_url.as_deref(),
        state.config.embedding.display.clone(),
    )?;
    let iframe_url = builder.iframe_url(kind, &issued.token);
    debug!("Built {} embed URL", kind);

    Ok(EmbedUrlResponse {
        token: issued.token,
        iframe_url,
        expires_at: issued.expires_at,
    })
}
