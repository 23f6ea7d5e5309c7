//! CLI module - Command-line interface for Flightdesk
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Flightdesk - caching proxy and search page for live flight data
#[derive(Parser)]
#[command(name = "flightdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the proxy and search page
    #[command(alias = "daemon")]
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Search flights by route (LHR-JFK), flight code (BA123) or number (123)
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Allow cached results instead of forcing a refresh
        #[arg(long)]
        cached: bool,
    },

    /// Check connectivity to the flight data service
    Check,

    /// Create default config file
    Init,
}

pub use commands::*;
