//! CLI module for the Ley 21.719 gateway
//!
//! - `serve`: run the HTTP API
//! - `snapshot`: verify, inspect or reset the semantic cache snapshot

pub mod serve;
pub mod snapshot;

use clap::{Parser, Subcommand};

/// Legal assistant for Ley 21.719 with a semantic answer cache
#[derive(Parser)]
#[command(name = "ley-rag-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Operate on the semantic cache snapshot files
    Snapshot(snapshot::SnapshotArgs),
}
