//! CLI argument definitions using clap
//!
//! Commands:
//! - sqlgate init --config <path>
//! - sqlgate serve --config <path> [--port <port>]
//! - sqlgate register --config <path> --name <name> --method <method> --credential <key> --template <sql>
//! - sqlgate backup --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sqlgate - register SQL templates and invoke them over HTTP
#[derive(Parser, Debug)]
#[command(name = "sqlgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and the endpoint table
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlgate.json")]
        config: PathBuf,
    },

    /// Start the HTTP gateway
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlgate.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Register an endpoint without going through HTTP
    Register {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlgate.json")]
        config: PathBuf,

        /// Endpoint name
        #[arg(long)]
        name: String,

        /// HTTP method (case-insensitive)
        #[arg(long)]
        method: String,

        /// Shared secret callers must send in x-api-key
        #[arg(long)]
        credential: String,

        /// SQL template with $placeholder$ markers
        #[arg(long)]
        template: String,
    },

    /// Write a backup of the database now
    Backup {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlgate.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
