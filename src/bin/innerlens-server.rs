// ABOUTME: Innerlens server binary
// ABOUTME: Loads configuration, connects the database, and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Innerlens server entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use innerlens_server::{
    config::ServerConfig, database::Database, logging, resources::ServerResources, server,
};

/// Innerlens platform backend
#[derive(Parser)]
#[command(name = "innerlens-server", version, about)]
struct Args {
    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }

    let database = Database::new(&config.database_url).await?;
    let resources = Arc::new(ServerResources::new(config, database));

    server::serve(resources).await?;
    Ok(())
}
