//! User account command implementations

use anyhow::{Context, Result};
use spendcast_core::auth::{hash_password, validate_password};
use spendcast_core::db::Database;
use spendcast_core::NewUser;

use super::find_user;

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with:");
        println!("  spendcast users add --email you@example.com --password ...");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────────────────────");

    for user in users {
        let name = match (&user.first_name, &user.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        };
        let status = if user.is_active { "active" } else { "inactive" };
        let expenses = db.count_expenses(user.id)?;

        println!(
            "   [{}] {:<30} │ {:<8} │ {:>4} expenses │ {}",
            user.id, user.email, status, expenses, name
        );
    }

    Ok(())
}

pub fn cmd_users_add(
    db: &Database,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<()> {
    validate_password(password)?;
    let password_hash = hash_password(password).context("Failed to hash password")?;

    let id = db.create_user(&NewUser {
        email: email.to_string(),
        password_hash,
        first_name: first_name.map(String::from),
        last_name: last_name.map(String::from),
    })?;

    println!("✅ Created user {} (ID {})", email.trim().to_lowercase(), id);
    Ok(())
}

pub fn cmd_users_set_active(db: &Database, email: &str, active: bool) -> Result<()> {
    let user = find_user(db, email)?;

    if user.is_active == active {
        println!(
            "User {} is already {}",
            user.email,
            if active { "active" } else { "inactive" }
        );
        return Ok(());
    }

    db.set_user_active(user.id, active)?;

    if active {
        println!("✅ Reactivated {}", user.email);
    } else {
        println!("🚫 Deactivated {} (existing tokens stop working)", user.email);
    }
    Ok(())
}
