//! Domain models for Spendcast

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prediction::ExpenseRecord;

/// Longest accepted category name
pub const MAX_CATEGORY_LEN: usize = 50;

/// Longest accepted expense description
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Longest accepted first/last name
pub const MAX_NAME_LEN: usize = 50;

/// A registered user
///
/// The password hash is never part of this struct; it is only read through
/// `Database::get_user_credentials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// New user for registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewUser {
    /// Check the email and optional names
    pub fn validate(&self) -> Result<()> {
        validate_email(&normalize_email(&self.email))?;
        for (label, name) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
            if let Some(name) = name {
                if name.chars().count() > MAX_NAME_LEN {
                    return Err(Error::InvalidData(format!(
                        "{} must be at most {} characters",
                        label, MAX_NAME_LEN
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check that an email looks like `local@domain.tld`
pub fn validate_email(email: &str) -> Result<()> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| Error::InvalidData("Email must contain '@'".to_string()))?;

    if local.is_empty() || domain.is_empty() {
        return Err(Error::InvalidData("Email is incomplete".to_string()));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(Error::InvalidData("Email domain is invalid".to_string()));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(Error::InvalidData(
            "Email must not contain whitespace".to_string(),
        ));
    }

    Ok(())
}

/// An expense as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    /// Calendar date the user attached to the expense
    pub date: Option<NaiveDate>,
    /// When the expense was recorded; this is what forecasting orders by
    pub timestamp: DateTime<Utc>,
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        ExpenseRecord {
            amount: expense.amount,
            category: expense.category.clone(),
            occurred_at: expense.timestamp,
        }
    }
}

/// New expense for insertion or update
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    /// Recording time; `None` means now
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(category: &str, amount: f64) -> Self {
        Self {
            category: category.to_string(),
            amount,
            description: None,
            date: None,
            timestamp: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Reject expenses the forecasting engine could not summarize
    pub fn validate(&self) -> Result<()> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::InvalidData("Category is required".to_string()));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(Error::InvalidData(format!(
                "Category must be at most {} characters",
                MAX_CATEGORY_LEN
            )));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData(
                "Amount must be a positive number".to_string(),
            ));
        }
        if let Some(desc) = &self.description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(Error::InvalidData(format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("alice@.com").is_err());
        assert!(validate_email("al ice@example.com").is_err());
    }

    #[test]
    fn test_new_user_validation() {
        let mut user = NewUser {
            email: " Alice@Example.com ".to_string(),
            password_hash: "hash".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: None,
        };
        assert!(user.validate().is_ok());

        user.last_name = Some("x".repeat(MAX_NAME_LEN + 1));
        assert!(user.validate().is_err());

        user.last_name = None;
        user.email = "not-an-email".to_string();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_new_expense_validation() {
        assert!(NewExpense::new("Food", 12.5).validate().is_ok());
        assert!(NewExpense::new("  ", 12.5).validate().is_err());
        assert!(NewExpense::new("Food", 0.0).validate().is_err());
        assert!(NewExpense::new("Food", -3.0).validate().is_err());
        assert!(NewExpense::new("Food", f64::NAN).validate().is_err());
        assert!(NewExpense::new("Food", f64::INFINITY).validate().is_err());
        assert!(NewExpense::new(&"x".repeat(51), 1.0).validate().is_err());

        let long_desc = NewExpense::new("Food", 1.0).with_description(&"d".repeat(201));
        assert!(long_desc.validate().is_err());
    }

    #[test]
    fn test_expense_to_record() {
        let ts = Utc::now();
        let expense = Expense {
            id: 1,
            user_id: 7,
            category: "Transport".to_string(),
            amount: 4.75,
            description: None,
            date: None,
            timestamp: ts,
        };

        let record = ExpenseRecord::from(&expense);
        assert_eq!(record.amount, 4.75);
        assert_eq!(record.category, "Transport");
        assert_eq!(record.occurred_at, ts);
    }
}
