// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{
    card_embed_url_handler, card_token_handler, dashboard_embed_url_handler,
    dashboard_token_handler, health_handler, provision_card_handler, ApiError,
};
use crate::config::GatewayConfig;
use crate::metabase::{AnalyticsApi, MetabaseClient};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub analytics: Arc<dyn AnalyticsApi>,
}

impl AppState {
    pub fn new(config: GatewayConfig, analytics: Arc<dyn AnalyticsApi>) -> Self {
        Self {
            config: Arc::new(config),
            analytics,
        }
    }

    /// State backed by a real Metabase client.
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let client = MetabaseClient::new()?;
        Ok(Self::new(config, Arc::new(client)))
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Signed embedding tokens
        .route("/token/card", get(card_token_handler))
        .route("/token/dashboard", get(dashboard_token_handler))
        // Token plus iframe URL
        .route("/embed-url/card", get(card_embed_url_handler))
        .route("/embed-url/dashboard", get(dashboard_embed_url_handler))
        // Card provisioning
        .route("/provision/card", post(provision_card_handler))
        .fallback(not_found_handler)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

pub async fn start_server(config: GatewayConfig) -> anyhow::Result<()> {
    for issue in config.issues() {
        warn!("{}", issue);
    }

    let addr = config.listen_addr.parse::<SocketAddr>()?;
    let state = AppState::from_config(config)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Embed gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Embed gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
