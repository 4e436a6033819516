//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for visitlog using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// visitlog - page-view tracking and analytics for the studio site
#[derive(Parser, Debug)]
#[command(name = "visitlog")]
#[command(version)]
#[command(about = "Page-view tracking and analytics service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Print the analytics summary computed from all recorded page views
    Summary {
        /// Output raw JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// List the most recent page views
    Recent {
        /// Number of page views to show
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate a sample config.toml
    Generate {
        /// Write to this path instead of stdout
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}
