//! Expense command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use spendcast_core::db::Database;
use spendcast_core::NewExpense;

use super::{find_user, truncate};

pub fn cmd_expenses_list(db: &Database, email: &str) -> Result<()> {
    let user = find_user(db, email)?;
    let expenses = db.list_expenses(user.id)?;

    if expenses.is_empty() {
        println!("No expenses for {}. Add one with:", user.email);
        println!(
            "  spendcast expenses add --user {} --category Food --amount 12.50",
            user.email
        );
        return Ok(());
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    println!();
    println!("🧾 Expenses for {} ({} total)", user.email, expenses.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in &expenses {
        let date = expense
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| expense.timestamp.date_naive().to_string());

        println!(
            "   [{}] {} │ {:>10} │ {:<15} │ {}",
            expense.id,
            date,
            format!("${:.2}", expense.amount),
            truncate(&expense.category, 15),
            truncate(expense.description.as_deref().unwrap_or(""), 30)
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2}", total);

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    email: &str,
    category: &str,
    amount: f64,
    description: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let user = find_user(db, email)?;

    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)")?,
        None => Utc::now().date_naive(),
    };

    let mut expense = NewExpense::new(category, amount).with_date(date);
    if let Some(desc) = description {
        expense = expense.with_description(desc);
    }

    let id = db.insert_expense(user.id, &expense)?;
    db.log_audit(&user.email, "create", Some("expense"), Some(id), Some("cli"))?;

    println!(
        "✅ Added expense {} for {}: ${:.2} ({})",
        id,
        user.email,
        amount,
        category.trim()
    );
    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, email: &str, id: i64) -> Result<()> {
    let user = find_user(db, email)?;

    if !db.delete_expense(user.id, id)? {
        anyhow::bail!("Expense {} not found for {}", id, user.email);
    }
    db.log_audit(&user.email, "delete", Some("expense"), Some(id), Some("cli"))?;

    println!("🗑️  Deleted expense {}", id);
    Ok(())
}
