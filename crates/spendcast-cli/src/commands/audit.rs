//! Audit log command

use anyhow::Result;
use spendcast_core::db::Database;

use super::find_user;

pub fn cmd_audit(db: &Database, email: &str, limit: i64) -> Result<()> {
    let user = find_user(db, email)?;
    let entries = db.list_audit_log(&user.email, limit.clamp(1, 1000))?;

    if entries.is_empty() {
        println!("No audit entries for {}.", user.email);
        return Ok(());
    }

    println!();
    println!("📜 Audit log for {}", user.email);
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries {
        let target = match (entry.entity_type.as_deref(), entry.entity_id) {
            (Some(kind), Some(id)) => format!("{} #{}", kind, id),
            (Some(kind), None) => kind.to_string(),
            _ => String::new(),
        };
        println!(
            "   {} │ {:<8} │ {:<14} │ {}",
            entry.timestamp,
            entry.action,
            target,
            entry.details.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
