//! DR-Admin: Document Registry operator CLI
//!
//! Thin wrapper over `DocumentRegistryService`. Results go to stdout as
//! JSON, logs go to stderr.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// DR-Admin: Document Registry operator CLI
#[derive(Parser, Debug)]
#[command(name = "dr-admin")]
#[command(about = "Register, revoke and verify documents in the on-chain registry")]
pub struct Args {
    /// JSON configuration file (environment variables are used when absent)
    #[arg(short, long, env = "DR_ADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Anchor a document hash in the registry
    Register {
        /// Document id (0x + 64 hex characters)
        #[arg(long)]
        id: String,

        /// File to hash; alternative to --hash
        #[arg(long, conflicts_with = "hash", required_unless_present = "hash")]
        file: Option<PathBuf>,

        /// Precomputed SHA-256 of the document
        #[arg(long)]
        hash: Option<String>,

        /// Document type, e.g. "diploma"
        #[arg(long = "type")]
        document_type: String,

        /// Expiry as unix seconds
        #[arg(long)]
        expiry: Option<u64>,

        /// Off-chain metadata as key=value (repeatable)
        #[arg(long = "meta", value_parser = commands::parse_key_val)]
        metadata: Vec<(String, String)>,
    },

    /// Revoke a registered document
    Revoke {
        /// Document id
        #[arg(long)]
        id: String,

        /// Reason, recorded in the logs only
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Look up a document, optionally checking a file against it
    Verify {
        /// Document id
        #[arg(long)]
        id: String,

        /// Compare this file's SHA-256 with the anchored hash
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Report whether a transaction is pending, confirmed or failed
    Status {
        /// Transaction hash
        tx_hash: String,
    },

    /// Print the SHA-256 of a file
    Hash {
        file: PathBuf,
    },

    /// Print the sender address derived from the configured private key
    Address,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    commands::run(args).await
}
