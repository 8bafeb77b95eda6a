// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Gateway configuration.
//!
//! Every setting is a CLI flag with an environment fallback. Values stay
//! optional after parsing: a missing secret or credential is reported on the
//! request that needs it, not at startup.

use crate::embedding::DisplayOptions;
use crate::metabase::Credentials;
use clap::{ArgAction, Args};
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Metabase API configuration is missing: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },
}

/// Admin credentials for provisioning calls.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetabaseSettings {
    pub site_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl MetabaseSettings {
    /// Names of unset values, always in the order site URL, username, password.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("site URL", &self.site_url),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| is_unset(value))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials { missing });
        }
        Ok(Credentials {
            site_url: self.site_url.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        })
    }
}

impl fmt::Debug for MetabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetabaseSettings")
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Token signing and iframe settings.
#[derive(Clone, Default)]
pub struct EmbeddingSettings {
    pub secret_key: Option<String>,
    pub public_site_url: Option<String>,
    pub display: DisplayOptions,
}

impl fmt::Debug for EmbeddingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingSettings")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("public_site_url", &self.public_site_url)
            .field("display", &self.display)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: String,
    pub metabase: MetabaseSettings,
    pub embedding: EmbeddingSettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            metabase: MetabaseSettings::default(),
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl GatewayConfig {
    /// Startup warnings for settings every request of some kind will need.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.embedding.secret_key.is_none() {
            issues.push("METABASE_SECRET_KEY is not set; token requests will fail".to_string());
        }
        if self.embedding.public_site_url.is_none() {
            issues.push(
                "METABASE_PUBLIC_SITE_URL is not set; embed-url requests will fail".to_string(),
            );
        }
        let missing = self.metabase.missing();
        if !missing.is_empty() {
            issues.push(format!(
                "Metabase credentials missing ({}); provisioning will fail",
                missing.join(", ")
            ));
        }
        issues
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Loads `.env` (or the file at `path`), then sets each default whose variable
/// is still unset. The process environment wins over the file, and the file
/// wins over the defaults.
pub fn load_env(path: Option<&Path>, defaults: &[(&str, &str)]) {
    match path {
        Some(path) => {
            dotenv::from_path(path).ok();
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    for (key, value) in defaults {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
        }
    }
}

/// Treats empty and whitespace-only values as unset.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Metabase admin credentials.
#[derive(Args, Clone, Default)]
pub struct MetabaseArgs {
    /// Base URL of the Metabase instance used for API calls
    #[arg(long = "metabase-site-url", env = "METABASE_SITE_URL")]
    pub site_url: Option<String>,

    /// Metabase admin username
    #[arg(long = "metabase-username", env = "METABASE_USERNAME")]
    pub username: Option<String>,

    /// Metabase admin password
    #[arg(long = "metabase-password", env = "METABASE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl From<MetabaseArgs> for MetabaseSettings {
    fn from(args: MetabaseArgs) -> Self {
        Self {
            site_url: non_empty(args.site_url),
            username: non_empty(args.username),
            password: non_empty(args.password),
        }
    }
}

/// Token signing and iframe display options.
#[derive(Args, Clone)]
pub struct EmbeddingArgs {
    /// Shared secret used to sign embedding tokens
    #[arg(long = "metabase-secret-key", env = "METABASE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Browser-facing Metabase URL used to build iframe links
    #[arg(long, env = "METABASE_PUBLIC_SITE_URL")]
    pub public_site_url: Option<String>,

    /// Render the embed with a border
    #[arg(long, env = "EMBED_BORDERED", default_value_t = true, action = ArgAction::Set)]
    pub bordered: bool,

    /// Render the embed with its title
    #[arg(long, env = "EMBED_TITLED", default_value_t = true, action = ArgAction::Set)]
    pub titled: bool,

    /// Comma-separated filter parameters to hide in the embed
    #[arg(long, env = "EMBED_HIDE_PARAMETERS", value_delimiter = ',')]
    pub hide_parameters: Vec<String>,
}

impl From<EmbeddingArgs> for EmbeddingSettings {
    fn from(args: EmbeddingArgs) -> Self {
        Self {
            secret_key: non_empty(args.secret_key),
            public_site_url: non_empty(args.public_site_url),
            display: DisplayOptions {
                bordered: args.bordered,
                titled: args.titled,
                hide_parameters: args
                    .hide_parameters
                    .into_iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
            },
        }
    }
}
