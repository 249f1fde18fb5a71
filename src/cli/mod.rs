//! CLI module - Command-line interface for Lostarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Lostarr - Campus Lost & Found Tracker
/// Item intake, browsing and lifecycle management for a school front desk
#[derive(Parser)]
#[command(name = "lostarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web portal with the background sweep scheduler
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Archive stale lost items now and exit
    Sweep,

    /// List tracked items
    #[command(alias = "ls", alias = "l")]
    List {
        /// Filter by status: lost, collected or archived
        #[arg(long)]
        status: Option<String>,
    },

    /// Create a staff account
    AddTeacher {
        /// Username for the new account
        username: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
