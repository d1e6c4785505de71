//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendcast - Track expenses and forecast spending
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Self-hosted expense tracker with spending forecasts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendcast.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SPENDCAST_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing the web UI build (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Report the production environment from the health check
        #[arg(long)]
        production: bool,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Manage a user's expenses
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Forecast a user's spending for the next 30 days
    Predict {
        /// Email of the user to forecast for
        #[arg(short, long)]
        user: String,

        /// Print the raw prediction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's audit log
    Audit {
        /// Email of the user
        #[arg(short, long)]
        user: String,

        /// Maximum entries to show
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List all users
    List,

    /// Create a user
    Add {
        /// Email address (used to log in)
        #[arg(long)]
        email: String,

        /// Password (8-128 characters)
        #[arg(long)]
        password: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// Deactivate a user (blocks login and invalidates tokens)
    Deactivate {
        #[arg(long)]
        email: String,
    },

    /// Reactivate a deactivated user
    Activate {
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List a user's expenses, newest first
    List {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,
    },

    /// Record an expense
    Add {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,

        /// Category (e.g., Food, Rent)
        #[arg(short, long)]
        category: String,

        /// Amount (must be positive)
        #[arg(short, long)]
        amount: f64,

        #[arg(short, long)]
        description: Option<String>,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,

        /// Expense ID
        id: i64,
    },
}
