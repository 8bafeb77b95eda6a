// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Stateless signing of embedding tokens.

use super::claims::{EmbedClaims, ResourceKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("{label} ID is required")]
    MissingIdentifier { label: &'static str },

    #[error("{label} ID must be an integer, got '{value}'")]
    InvalidIdentifier { label: &'static str, value: String },

    #[error("Metabase secret key not configured")]
    MissingSecret,

    #[error("Failed to generate token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Verification(#[source] jsonwebtoken::errors::Error),
}

/// A request for a signed token, built from one HTTP query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    pub kind: ResourceKind,
    pub resource_id: i64,
    pub params: BTreeMap<String, String>,
}

impl EmbedRequest {
    pub fn new(kind: ResourceKind, resource_id: i64) -> Self {
        Self {
            kind,
            resource_id,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Builds a request from raw query pairs.
    ///
    /// The first occurrence of the kind's id key is the identifier. Every other
    /// pair is a filter parameter passed through verbatim; later duplicates
    /// overwrite earlier ones.
    pub fn from_query<I, K, V>(kind: ResourceKind, pairs: I) -> Result<Self, TokenError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id_key = kind.id_param();
        let mut raw_id: Option<String> = None;
        let mut params = BTreeMap::new();

        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            if key == id_key {
                if raw_id.is_none() {
                    raw_id = Some(value);
                }
            } else {
                params.insert(key, value);
            }
        }

        let raw_id = match raw_id {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(TokenError::MissingIdentifier { label: kind.label() }),
        };

        let resource_id = raw_id
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidIdentifier {
                label: kind.label(),
                value: raw_id.clone(),
            })?;

        Ok(Self {
            kind,
            resource_id,
            params,
        })
    }
}

/// Result of a successful signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// HS256 signer bound to the shared embedding secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Fails with [`TokenError::MissingSecret`] when the secret is absent or empty.
    pub fn from_secret(secret: Option<&str>) -> Result<Self, TokenError> {
        match secret {
            Some(secret) if !secret.is_empty() => Ok(Self::new(secret)),
            _ => Err(TokenError::MissingSecret),
        }
    }

    /// Signs `request` as if issued at `now` (unix seconds).
    pub fn issue_at(&self, request: &EmbedRequest, now: i64) -> Result<IssuedToken, TokenError> {
        let claims = EmbedClaims::new(
            request.kind.resource(request.resource_id),
            request.params.clone(),
            now,
        );

        debug!(
            "Signing {} token for id {} with params {:?}",
            request.kind,
            request.resource_id,
            request.params.keys().collect::<Vec<_>>()
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn issue(&self, request: &EmbedRequest) -> Result<IssuedToken, TokenError> {
        self.issue_at(request, chrono::Utc::now().timestamp())
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn decode(&self, token: &str) -> Result<EmbedClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<EmbedClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Verification)
    }
}
