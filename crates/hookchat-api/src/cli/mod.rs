//! CLI command definitions for the `hkchat` binary.
//!
//! Uses clap derive macros for argument parsing. Running `hkchat` with no
//! subcommand starts an interactive chat.

pub mod chat;
pub mod config;
pub mod send;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with a webhook-backed assistant from the terminal.
#[derive(Parser)]
#[command(name = "hkchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Directory containing config.toml (default: ~/.hookchat).
    #[arg(long, global = true, env = "HOOKCHAT_DATA_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Relay submit endpoint (overrides config.toml).
    #[arg(long, global = true, env = "HOOKCHAT_SUBMIT_URL")]
    pub submit_url: Option<String>,

    /// Relay status endpoint base (default: <submit-url>/status).
    #[arg(long, global = true, env = "HOOKCHAT_STATUS_URL")]
    pub status_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation (default).
    Chat,

    /// Send one message and print the reply.
    Send {
        /// Message text (multiple words are joined with spaces).
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show the resolved configuration.
    Config,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
