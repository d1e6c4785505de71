//! Spendcast Core Library
//!
//! Shared functionality for the Spendcast expense tracker:
//! - Database access and migrations (users, expenses, audit log)
//! - Password hashing for user accounts
//! - Prediction engine for spending forecasts and analytics

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod prediction;

pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use models::{Expense, NewExpense, NewUser, User};
pub use prediction::{
    generate_prediction, AnalyticsSummary, Confidence, ExpenseRecord, PredictionEngine,
    PredictionResult,
};
