// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::MetabaseArgs;
use crate::metabase::MetabaseClient;
use crate::provisioner::{ProvisionRequest, Provisioner};

/// Arguments for provision command
#[derive(Args)]
pub struct ProvisionArgs {
    /// JSON file holding the Metabase card definition
    #[arg(long)]
    pub payload: PathBuf,

    /// Create the card without enabling embedding
    #[arg(long)]
    pub no_embedding: bool,

    /// Dashboard to create the card in
    #[arg(long)]
    pub dashboard_id: Option<i64>,

    #[command(flatten)]
    pub metabase: MetabaseArgs,
}

/// Reads a card definition from disk.
pub fn load_payload(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub async fn provision(args: ProvisionArgs) -> Result<()> {
    let mut request = ProvisionRequest::new(load_payload(&args.payload)?);
    request.enable_embedding = !args.no_embedding;
    request.dashboard_id = args.dashboard_id;

    let provisioner = Provisioner::new(Arc::new(MetabaseClient::new()?), args.metabase.into());
    info!("Provisioning card from {}", args.payload.display());
    let outcome = provisioner.provision(&request).await?;

    println!("{}", outcome.message);
    println!("Card ID: {}", outcome.card_id);
    Ok(())
}
