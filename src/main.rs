// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use metabase_embed_gateway::{
    api::start_server,
    config::{load_env, EmbeddingArgs, GatewayConfig, MetabaseArgs, DEFAULT_LISTEN_ADDR},
    version,
};

/// Metabase embedding gateway
#[derive(Parser)]
#[command(name = "metabase-embed-gateway")]
#[command(version = version::VERSION_NUMBER)]
#[command(about = "Issues signed Metabase embedding tokens and provisions embeddable cards", long_about = None)]
struct ServerArgs {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen_addr: String,

    #[command(flatten)]
    metabase: MetabaseArgs,

    #[command(flatten)]
    embedding: EmbeddingArgs,
}

impl From<ServerArgs> for GatewayConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            listen_addr: args.listen_addr,
            metabase: args.metabase.into(),
            embedding: args.embedding.into(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env(None, &[("RUST_LOG", "info")]);

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    let config: GatewayConfig = ServerArgs::parse().into();

    tracing::info!("Starting {}", version::get_version_string());
    tracing::info!("Build: {}", version::VERSION);

    start_server(config).await
}
