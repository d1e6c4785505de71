//! User operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{normalize_email, NewUser, User};

const USER_COLUMNS: &str = "id, email, first_name, last_name, created_at, is_active";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at_str: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
        is_active: row.get(5)?,
    })
}

impl Database {
    /// Create a user, returning the new ID
    ///
    /// Fails with `Error::InvalidData` for a malformed email or overlong name,
    /// and `Error::Conflict` if the email is already registered.
    pub fn create_user(&self, user: &NewUser) -> Result<i64> {
        user.validate()?;
        let conn = self.conn()?;
        let email = normalize_email(&user.email);

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(Error::Conflict(format!("Email already registered: {}", email)));
        }

        conn.execute(
            "INSERT INTO users (email, password_hash, first_name, last_name) VALUES (?, ?, ?, ?)",
            params![email, user.password_hash, user.first_name, user.last_name],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![normalize_email(email)],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get an active user together with their password hash, for login
    pub fn get_user_credentials(&self, email: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {}, password_hash FROM users WHERE email = ? AND is_active = 1",
                    USER_COLUMNS
                ),
                params![normalize_email(email)],
                |row| Ok((row_to_user(row)?, row.get::<_, String>(6)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Activate or deactivate a user
    pub fn set_user_active(&self, id: i64, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET is_active = ? WHERE id = ?",
            params![active, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", id)));
        }
        Ok(())
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY email",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
