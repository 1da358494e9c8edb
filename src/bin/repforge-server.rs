// ABOUTME: Server binary: configuration, resource construction, and startup
// ABOUTME: Fails fast when the LLM credential or webhook secret is missing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Repforge API Server Binary
//!
//! Starts the workout-tracking API with its database, LLM provider, and
//! webhook handler. All configuration comes from the environment; a missing
//! LLM credential is a fatal startup error.

use anyhow::Result;
use clap::Parser;
use repforge::{
    config::environment::ServerConfig, database::Database, llm, logging,
    resources::ServerResources, server,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "repforge-server")]
#[command(about = "Repforge - AI-assisted workout tracking API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Repforge API");
    info!("{}", config.summary());

    let database = Arc::new(Database::new(&config.database.url).await?);
    info!("Database initialized: {}", config.database.url);

    // Fatal when the provider's API credential is absent
    let llm_provider = llm::provider_from_config(&config.llm)?;

    let resources = Arc::new(ServerResources::new(
        database,
        llm_provider,
        Arc::new(config),
    ));

    server::serve(resources).await
}
