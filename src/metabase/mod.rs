// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Boundary to the external analytics platform (Metabase).
//!
//! Only the four REST calls the provisioner needs are modelled. The trait is
//! the seam between the provisioning pipeline and the network so the pipeline
//! can be exercised without a live Metabase.

pub mod client;

pub use client::{MetabaseClient, SESSION_HEADER};

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetabaseError {
    #[error("upstream returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl MetabaseError {
    /// Upstream response body, verbatim, for rejections.
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            MetabaseError::Rejected { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Fully-resolved admin credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub site_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session obtained from `POST /api/session`, bound to the site it came from.
/// Lives for one provisioning call.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    site_url: String,
    id: String,
}

impl Session {
    pub fn new(site_url: &str, id: String) -> Self {
        Self {
            site_url: site_url.to_string(),
            id,
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("site_url", &self.site_url)
            .field("id", &"<redacted>")
            .finish()
    }
}

/// Card returned by `POST /api/card`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCard {
    pub id: i64,
}

impl CreatedCard {
    pub fn from_response(body: &Value) -> Option<Self> {
        let id = body.get("id")?.as_i64()?;
        Some(Self { id })
    }
}

#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `POST /api/session` with username/password.
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, MetabaseError>;

    /// `POST /api/card` with the payload as body.
    async fn create_card(&self, session: &Session, payload: &Value)
        -> Result<CreatedCard, MetabaseError>;

    /// `GET /api/card/{id}`.
    async fn get_card(&self, session: &Session, card_id: i64) -> Result<Value, MetabaseError>;

    /// `PUT /api/card/{id}` with a partial update.
    async fn update_card(
        &self,
        session: &Session,
        card_id: i64,
        changes: &Value,
    ) -> Result<(), MetabaseError>;
}
