// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::io::Write;
use tracing::info;

use crate::config::{non_empty, EmbeddingArgs, EmbeddingSettings};
use crate::embedding::{EmbedRequest, EmbedUrlBuilder, ResourceKind, TokenIssuer};

/// Resource to sign for.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Resource kind: card (alias question) or dashboard
    #[arg(long, default_value = "card")]
    pub kind: ResourceKind,

    /// Numeric card or dashboard id
    #[arg(long)]
    pub id: i64,

    /// Locked filter parameter, repeatable (key=value)
    #[arg(long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

impl TargetArgs {
    fn to_request(&self) -> EmbedRequest {
        self.params
            .iter()
            .fold(EmbedRequest::new(self.kind, self.id), |request, (k, v)| {
                request.with_param(k.as_str(), v.as_str())
            })
    }
}

/// Arguments for sign command
#[derive(Args)]
pub struct SignArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub embedding: EmbeddingArgs,
}

/// Arguments for embed-url command
#[derive(Args)]
pub struct EmbedUrlArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub embedding: EmbeddingArgs,
}

/// Arguments for inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Token to verify
    pub token: String,

    /// Shared secret the token was signed with
    #[arg(long = "metabase-secret-key", env = "METABASE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}

/// Splits `key=value`. The value may itself contain `=`.
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

pub fn sign(args: SignArgs) -> Result<()> {
    sign_to(args, &mut std::io::stdout().lock())
}

/// Writes only the token, so the output can be captured by a shell.
pub fn sign_to(args: SignArgs, out: &mut impl Write) -> Result<()> {
    let settings: EmbeddingSettings = args.embedding.into();
    let issuer = TokenIssuer::from_secret(settings.secret_key.as_deref())?;
    let issued = issuer.issue(&args.target.to_request())?;

    info!("Token expires at {}", issued.expires_at);
    writeln!(out, "{}", issued.token)?;
    Ok(())
}

pub fn embed_url(args: EmbedUrlArgs) -> Result<()> {
    embed_url_to(args, &mut std::io::stdout().lock())
}

pub fn embed_url_to(args: EmbedUrlArgs, out: &mut impl Write) -> Result<()> {
    let settings: EmbeddingSettings = args.embedding.into();
    let issuer = TokenIssuer::from_secret(settings.secret_key.as_deref())?;
    let builder = EmbedUrlBuilder::new(settings.public_site_url.as_deref(), settings.display)?;

    let issued = issuer.issue(&args.target.to_request())?;
    writeln!(out, "{}", builder.iframe_url(args.target.kind, &issued.token))?;
    Ok(())
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let secret = non_empty(args.secret_key)
        .ok_or_else(|| anyhow!("Secret key required. Use --metabase-secret-key or set METABASE_SECRET_KEY"))?;
    let claims = TokenIssuer::new(&secret).decode(args.token.trim())?;

    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}
