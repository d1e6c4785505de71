//! Expense operations
//!
//! Every query takes the owning user's ID; an expense belonging to another
//! user behaves exactly like a missing one.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Expense, NewExpense};
use crate::prediction::ExpenseRecord;

const EXPENSE_COLUMNS: &str = "id, user_id, category, amount, description, date, timestamp";

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let date_str: Option<String> = row.get(5)?;
    let timestamp_str: String = row.get(6)?;
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        date: date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        timestamp: parse_datetime(&timestamp_str),
    })
}

impl Database {
    /// Insert an expense for a user, returning the new ID
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<i64> {
        expense.validate()?;
        let conn = self.conn()?;

        let timestamp = expense.timestamp.unwrap_or_else(Utc::now);
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, category, amount, description, date, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.category.trim(),
                expense.amount,
                expense.description,
                expense.date.map(|d| d.to_string()),
                format_datetime(&timestamp),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's expenses, newest first
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY timestamp DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![user_id], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Get a single expense owned by the user
    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, user_id],
                row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Update an expense's fields; returns false if the user has no such expense
    ///
    /// The recording timestamp is kept unless the update supplies one.
    pub fn update_expense(&self, user_id: i64, id: i64, expense: &NewExpense) -> Result<bool> {
        expense.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE expenses
            SET category = ?, amount = ?, description = ?, date = ?,
                timestamp = COALESCE(?, timestamp)
            WHERE id = ? AND user_id = ?
            "#,
            params![
                expense.category.trim(),
                expense.amount,
                expense.description,
                expense.date.map(|d| d.to_string()),
                expense.timestamp.as_ref().map(format_datetime),
                id,
                user_id,
            ],
        )?;

        Ok(updated > 0)
    }

    /// Delete an expense; returns false if the user has no such expense
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// All of a user's expenses as engine input, oldest first
    pub fn expense_records(&self, user_id: i64) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT amount, category, timestamp FROM expenses WHERE user_id = ? ORDER BY timestamp, id",
        )?;

        let records = stmt
            .query_map(params![user_id], |row| {
                let timestamp_str: String = row.get(2)?;
                Ok(ExpenseRecord {
                    amount: row.get(0)?,
                    category: row.get(1)?,
                    occurred_at: parse_datetime(&timestamp_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count a user's expenses
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
