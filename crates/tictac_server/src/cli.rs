//! Command-line interface for tictac_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe server - live two-player games over HTTP and server-sent events
#[derive(Parser, Debug)]
#[command(name = "tictac_server")]
#[command(about = "Two-player tic-tac-toe server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to, overriding the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to, overriding the config file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the default configuration as TOML
    Config,
}
