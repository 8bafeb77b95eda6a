// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! reqwest-backed client for the Metabase REST API

use super::{AnalyticsApi, CreatedCard, Credentials, MetabaseError, Session};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying the session id on authenticated calls.
pub const SESSION_HEADER: &str = "X-Metabase-Session";

#[derive(Serialize)]
struct SessionRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
}

/// Stateless Metabase client. Holds no session; every [`Session`] is handed
/// back to the caller and dropped with it.
#[derive(Clone)]
pub struct MetabaseClient {
    client: Client,
}

impl MetabaseClient {
    /// Builds a client with reqwest's default transport settings (no request
    /// timeout).
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self { client })
    }

    fn endpoint(site_url: &str, path: &str) -> String {
        format!("{}{}", site_url.trim_end_matches('/'), path)
    }

    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, MetabaseError> {
        let response = request
            .send()
            .await
            .map_err(|source| MetabaseError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        debug!("{} responded with {}", endpoint, status);
        if status.is_success() {
            return Ok(response);
        }

        match response.text().await {
            Ok(body) => Err(MetabaseError::Rejected {
                status: status.as_u16(),
                body,
            }),
            Err(e) => {
                warn!("{} responded with {} but its body could not be read: {}", endpoint, status, e);
                Err(MetabaseError::Decode {
                    endpoint: endpoint.to_string(),
                    message: format!("status {} with unreadable body: {}", status.as_u16(), e),
                })
            }
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T, MetabaseError> {
        response
            .json::<T>()
            .await
            .map_err(|e| MetabaseError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl AnalyticsApi for MetabaseClient {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, MetabaseError> {
        let endpoint = Self::endpoint(&credentials.site_url, "/api/session");
        let request = self.client.post(&endpoint).json(&SessionRequest {
            username: &credentials.username,
            password: &credentials.password,
        });

        let response = self.send(&endpoint, request).await?;
        let session: SessionResponse = Self::read_json(&endpoint, response).await?;

        Ok(Session::new(&credentials.site_url, session.id))
    }

    async fn create_card(
        &self,
        session: &Session,
        payload: &Value,
    ) -> Result<CreatedCard, MetabaseError> {
        let endpoint = Self::endpoint(session.site_url(), "/api/card");
        let request = self
            .client
            .post(&endpoint)
            .header(SESSION_HEADER, session.id())
            .json(payload);

        let response = self.send(&endpoint, request).await?;
        let body: Value = Self::read_json(&endpoint, response).await?;
        CreatedCard::from_response(&body).ok_or_else(|| MetabaseError::Decode {
            endpoint,
            message: "card response has no integer 'id'".to_string(),
        })
    }

    async fn get_card(&self, session: &Session, card_id: i64) -> Result<Value, MetabaseError> {
        let endpoint = Self::endpoint(session.site_url(), &format!("/api/card/{}", card_id));
        let request = self
            .client
            .get(&endpoint)
            .header(SESSION_HEADER, session.id());

        let response = self.send(&endpoint, request).await?;
        Self::read_json(&endpoint, response).await
    }

    async fn update_card(
        &self,
        session: &Session,
        card_id: i64,
        changes: &Value,
    ) -> Result<(), MetabaseError> {
        let endpoint = Self::endpoint(session.site_url(), &format!("/api/card/{}", card_id));
        let request = self
            .client
            .put(&endpoint)
            .header(SESSION_HEADER, session.id())
            .json(changes);

        self.send(&endpoint, request).await?;
        Ok(())
    }
}
