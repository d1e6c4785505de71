//! Prediction Engine - Spending Forecasts
//!
//! Turns a user's raw expense history into a forecast of the next month's
//! spending plus a descriptive analytics summary.
//!
//! ## Forecast
//!
//! - Fewer than 5 records: mean amount extrapolated over 30 days
//! - Otherwise: a 70/30 blend of the last 7 records' mean and the overall
//!   mean, extrapolated over 30 days
//!
//! ## Analytics
//!
//! - Four trailing weekly totals, category breakdown, totals and averages
//!
//! The engine is pure and never fails: bad input produces a result with
//! `Confidence::Error` instead of an `Err`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendcast_core::prediction::{generate_prediction, ExpenseRecord};
//!
//! let records: Vec<ExpenseRecord> = db.expense_records(user_id)?;
//! let result = generate_prediction(&records);
//! println!("{} ({})", result.prediction, result.confidence);
//! ```

pub mod engine;
pub mod types;

pub use engine::{generate_prediction, PredictionEngine, PredictionError};
pub use types::{
    AnalyticsSummary, Confidence, ExpenseRecord, PredictionResult, WeeklyAmount, WEEKS_IN_TREND,
};
