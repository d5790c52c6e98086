//! Command-line arguments for the quote server.
use std::path::PathBuf;

use clap::Parser;
use elevator_common::net::{COMMAND_PORT, addr};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Elevator pre-invoice command server", long_about = None)]
pub struct Args {
    /// Address to accept command connections on.
    #[clap(long, default_value_t = addr("0.0.0.0", COMMAND_PORT))]
    pub bind: String,

    /// Catalog JSON file (current or legacy record shape). Catalog edits are written back to it.
    #[clap(long, default_value = "data/catalog.json")]
    pub catalog: PathBuf,

    /// Invoice store JSON file. Invoices are kept in memory only when omitted.
    #[clap(long)]
    pub store: Option<PathBuf>,

    /// Number of worker threads serving connections.
    #[clap(long, default_value_t = 4)]
    pub workers: usize,
}
