// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod provision;
pub mod token;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
pub use provision::{provision_card_handler, ProvisionCardRequest, ProvisionCardResponse};
pub use token::{
    card_embed_url_handler, card_token_handler, dashboard_embed_url_handler,
    dashboard_token_handler, EmbedUrlResponse, TokenResponse,
};
