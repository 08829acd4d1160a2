//! Tic-tac-toe server CLI.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tictac_server::ServerConfig;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Config => print_default_config(),
    }
}

/// Run the HTTP game server
#[instrument]
async fn run_server(config: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    info!(host = %config.host(), port = *config.port(), "Starting tic-tac-toe server");
    tictac_server::serve(config).await
}

/// Print the default configuration
fn print_default_config() -> Result<()> {
    print!("{}", toml::to_string_pretty(&ServerConfig::default())?);
    Ok(())
}
