//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendcast_server::{Environment, ServerConfig, ALLOWED_ORIGINS_ENV, JWT_SECRET_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    production: bool,
) -> Result<()> {
    println!("🚀 Starting Spendcast web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let mut config = ServerConfig::from_env();
    if production {
        config.environment = Environment::Production;
    }

    println!("   Environment: {}", config.environment);
    println!("   🔐 Token lifetime: {} hours", config.token_ttl_hours);
    if std::env::var(JWT_SECRET_ENV).is_ok() {
        println!("   🔑 Signing secret: {}", JWT_SECRET_ENV);
    }
    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path must be valid UTF-8"))
        .transpose()?;
    spendcast_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
