// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding token endpoints
//!
//! - `GET /token/card?cardId=..` and `GET /token/dashboard?dashboardId=..`
//!   return a signed token.
//! - `GET /embed-url/card` and `GET /embed-url/dashboard` also return the
//!   ready-to-use iframe URL.

pub mod handler;
pub mod response;

pub use handler::{
    card_embed_url_handler, card_token_handler, dashboard_embed_url_handler,
    dashboard_token_handler,
};
pub use response::{EmbedUrlResponse, TokenResponse};
