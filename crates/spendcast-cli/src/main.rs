//! Spendcast CLI - Expense tracker with spending forecasts
//!
//! Usage:
//!   spendcast init                             Initialize database
//!   spendcast users add --email E --password P Create a user
//!   spendcast expenses add --user E -c Food -a 12.50
//!   spendcast predict --user E                 Forecast the next 30 days
//!   spendcast serve --port 3000                Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
            production,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                production,
            )
            .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    email,
                    password,
                    first_name,
                    last_name,
                }) => commands::cmd_users_add(
                    &db,
                    &email,
                    &password,
                    first_name.as_deref(),
                    last_name.as_deref(),
                ),
                Some(UsersAction::Deactivate { email }) => {
                    commands::cmd_users_set_active(&db, &email, false)
                }
                Some(UsersAction::Activate { email }) => {
                    commands::cmd_users_set_active(&db, &email, true)
                }
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                ExpensesAction::List { user } => commands::cmd_expenses_list(&db, &user),
                ExpensesAction::Add {
                    user,
                    category,
                    amount,
                    description,
                    date,
                } => commands::cmd_expenses_add(
                    &db,
                    &user,
                    &category,
                    amount,
                    description.as_deref(),
                    date.as_deref(),
                ),
                ExpensesAction::Delete { user, id } => {
                    commands::cmd_expenses_delete(&db, &user, id)
                }
            }
        }
        Commands::Predict { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_predict(&db, &user, json)
        }
        Commands::Audit { user, limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_audit(&db, &user, limit)
        }
    }
}
