// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod provision;
pub mod token;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Metabase Embed Gateway CLI
#[derive(Parser)]
#[command(name = "embed-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Sign embedding tokens and provision cards without running the gateway", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a signed embedding token
    Sign(token::SignArgs),

    /// Print a ready-to-use iframe URL
    EmbedUrl(token::EmbedUrlArgs),

    /// Verify a token and print its claims
    Inspect(token::InspectArgs),

    /// Create a card and enable embedding for it
    Provision(provision::ProvisionArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sign(args) => token::sign(args),
        Commands::EmbedUrl(args) => token::embed_url(args),
        Commands::Inspect(args) => token::inspect(args),
        Commands::Provision(args) => provision::provision(args).await,
    }
}
