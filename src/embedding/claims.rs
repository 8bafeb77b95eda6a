// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Signed-embedding payload types.
//!
//! The viewer endpoint of the analytics platform expects a compact HS256 JWT
//! whose claims look like:
//!
//! ```json
//! { "resource": { "question": 42 }, "params": { "region": "emea" }, "exp": 1700000600 }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifetime of every issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 600;

/// Kind of resource a token grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Card,
    Dashboard,
}

impl ResourceKind {
    /// Query-string key carrying the resource identifier.
    pub fn id_param(&self) -> &'static str {
        match self {
            ResourceKind::Card => "cardId",
            ResourceKind::Dashboard => "dashboardId",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Card => "Card",
            ResourceKind::Dashboard => "Dashboard",
        }
    }

    /// Path segment of the platform's `/embed/{segment}/{token}` viewer.
    pub fn embed_segment(&self) -> &'static str {
        match self {
            ResourceKind::Card => "question",
            ResourceKind::Dashboard => "dashboard",
        }
    }

    pub fn resource(&self, id: i64) -> EmbedResource {
        match self {
            ResourceKind::Card => EmbedResource::Question(id),
            ResourceKind::Dashboard => EmbedResource::Dashboard(id),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Card => write!(f, "card"),
            ResourceKind::Dashboard => write!(f, "dashboard"),
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" | "question" => Ok(ResourceKind::Card),
            "dashboard" => Ok(ResourceKind::Dashboard),
            other => Err(format!(
                "unknown resource kind '{}', expected 'card' or 'dashboard'",
                other
            )),
        }
    }
}

/// `resource` claim. Externally tagged so it serializes as
/// `{"question": id}` or `{"dashboard": id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedResource {
    Question(i64),
    Dashboard(i64),
}

/// Full claim set of an embedding token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedClaims {
    pub resource: EmbedResource,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    pub exp: i64,
}

impl EmbedClaims {
    /// Claims for a token issued at `now` (unix seconds).
    pub fn new(resource: EmbedResource, params: BTreeMap<String, String>, now: i64) -> Self {
        Self {
            resource,
            params,
            exp: now + TOKEN_TTL_SECS,
        }
    }
}
