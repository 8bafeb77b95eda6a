// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod metabase;
pub mod provisioner;
pub mod version;

// Re-export main types
pub use api::{create_app, AppState};
pub use config::GatewayConfig;
pub use embedding::{EmbedClaims, EmbedRequest, IssuedToken, ResourceKind, TokenError, TokenIssuer};
pub use metabase::{AnalyticsApi, MetabaseClient, MetabaseError};
pub use provisioner::{ProvisionError, ProvisionOutcome, ProvisionRequest, Provisioner};
