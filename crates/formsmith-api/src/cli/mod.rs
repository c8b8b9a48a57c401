//! CLI command definitions and dispatch for the `formsmith` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod form;

use clap::{Parser, Subcommand};

/// Turn plain-language descriptions into shareable forms.
#[derive(Parser)]
#[command(name = "formsmith", version, about, long_about = None)]
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

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new form from a natural-language prompt.
    #[command(alias = "gen")]
    Generate {
        /// What the form should collect, in plain language.
        prompt: String,

        /// Form title (defaults to "Untitled Form").
        #[arg(long)]
        title: Option<String>,
    },

    /// List your forms.
    #[command(alias = "ls")]
    List,

    /// Print the API key, generating one on first use.
    #[command(name = "api-key")]
    ApiKey,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Log output format (text or json).
        #[arg(long, default_value = "text")]
        log_format: String,

        /// Export spans via OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },
}
