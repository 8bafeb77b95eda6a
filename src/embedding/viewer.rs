// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Builds the iframe `src` for the platform's embed viewer:
//! `{site}/embed/{question|dashboard}/{token}#bordered=true&titled=true`.

use super::claims::ResourceKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedUrlError {
    #[error("Metabase site URL not configured")]
    NotConfigured,

    #[error("Invalid Metabase site URL '{0}'")]
    Invalid(String),
}

/// Display flags appended to the viewer URL fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub bordered: bool,
    pub titled: bool,
    #[serde(default)]
    pub hide_parameters: Vec<String>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            bordered: true,
            titled: true,
            hide_parameters: Vec::new(),
        }
    }
}

impl DisplayOptions {
    pub fn fragment(&self) -> String {
        let mut fragment = format!("bordered={}&titled={}", self.bordered, self.titled);
        if !self.hide_parameters.is_empty() {
            fragment.push_str("&hide_parameters=");
            fragment.push_str(&self.hide_parameters.join(","));
        }
        fragment
    }
}

#[derive(Debug, Clone)]
pub struct EmbedUrlBuilder {
    site_url: String,
    display: DisplayOptions,
}

impl EmbedUrlBuilder {
    /// Validates the public site URL. Absent or empty is `NotConfigured`.
    pub fn new(site_url: Option<&str>, display: DisplayOptions) -> Result<Self, EmbedUrlError> {
        let site_url = match site_url {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ => return Err(EmbedUrlError::NotConfigured),
        };

        let parsed = Url::parse(site_url).map_err(|_| EmbedUrlError::Invalid(site_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EmbedUrlError::Invalid(site_url.to_string()));
        }

        Ok(Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            display,
        })
    }

    pub fn iframe_url(&self, kind: ResourceKind, token: &str) -> String {
        format!(
            "{}/embed/{}/{}#{}",
            self.site_url,
            kind.embed_segment(),
            token,
            self.display.fragment()
        )
    }
}
