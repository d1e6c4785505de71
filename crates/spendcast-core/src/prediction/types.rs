//! Core types for the prediction engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of weekly buckets in the trend
pub const WEEKS_IN_TREND: usize = 4;

/// Spending pattern tag for summaries built from data
pub const PATTERN_STABLE: &str = "stable";

/// Spending pattern tag for the empty summary
pub const PATTERN_NO_DATA: &str = "no_data";

/// A single expense as seen by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub amount: f64,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn new(amount: f64, category: &str, occurred_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            category: category.to_string(),
            occurred_at,
        }
    }
}

/// How much the forecast can be trusted, driven by record count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// No records at all
    None,
    Low,
    Medium,
    High,
    /// The computation failed and the result is a safe default
    Error,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::Error => "error",
        }
    }

    /// Confidence for a weighted forecast over `count` records
    pub fn for_count(count: usize) -> Self {
        if count >= 20 {
            Confidence::High
        } else if count >= 10 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Confidence::None),
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            "error" => Ok(Confidence::Error),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

/// Spending inside one trailing week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAmount {
    /// "Week 1" (oldest) through "Week 4" (most recent)
    #[serde(rename = "week")]
    pub label: String,
    pub amount: f64,
}

/// Descriptive summary of a user's expense history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Mean amount per expense record (not per calendar day)
    pub daily_average: f64,
    pub weekly_trend: Vec<WeeklyAmount>,
    pub category_breakdown: BTreeMap<String, f64>,
    pub total_expenses: f64,
    pub transaction_count: usize,
    pub spending_pattern: String,
}

impl AnalyticsSummary {
    /// Summary used when there is no data or summarizing failed
    pub fn empty() -> Self {
        Self {
            daily_average: 0.0,
            weekly_trend: (0..WEEKS_IN_TREND)
                .map(|i| WeeklyAmount {
                    label: format!("Week {}", i + 1),
                    amount: 0.0,
                })
                .collect(),
            category_breakdown: BTreeMap::new(),
            total_expenses: 0.0,
            transaction_count: 0,
            spending_pattern: PATTERN_NO_DATA.to_string(),
        }
    }
}

/// Forecast plus analytics returned to the web layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Expected spend over the forecast period, rounded to cents
    pub prediction: f64,
    pub confidence: Confidence,
    pub message: String,
    pub analytics: AnalyticsSummary,
}

impl PredictionResult {
    /// Result for a user with no expenses
    pub fn no_data() -> Self {
        Self {
            prediction: 0.0,
            confidence: Confidence::None,
            message: "No expense data available. Start adding expenses!".to_string(),
            analytics: AnalyticsSummary::empty(),
        }
    }

    /// Safe default when the forecast could not be computed
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            prediction: 0.0,
            confidence: Confidence::Error,
            message: message.into(),
            analytics: AnalyticsSummary::empty(),
        }
    }
}
