//! Forecast and analytics computation

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{
    AnalyticsSummary, Confidence, ExpenseRecord, PredictionResult, WeeklyAmount, PATTERN_STABLE,
    WEEKS_IN_TREND,
};

/// Below this many records the forecast is a plain mean
const MIN_TREND_HISTORY: usize = 5;

/// Number of most recent records in the short-term mean
const RECENT_WINDOW: usize = 7;

/// Weight of the short-term mean in the blended forecast
const RECENT_WEIGHT: f64 = 0.7;

/// Reasons a forecast could not be computed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("invalid amount {amount} at record {index}")]
    InvalidAmount { index: usize, amount: f64 },

    #[error("total spending is not a finite number")]
    NonFiniteTotal,

    #[error("no records to average")]
    NothingToAverage,
}

/// Forecasts spending from a user's expense history
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    /// Number of days the forecast extrapolates over (default 30)
    forecast_days: u32,
}

impl PredictionEngine {
    pub fn new() -> Self {
        Self { forecast_days: 30 }
    }

    pub fn with_forecast_days(days: u32) -> Self {
        Self {
            forecast_days: days,
        }
    }

    pub fn forecast_days(&self) -> u32 {
        self.forecast_days
    }

    /// Forecast relative to the current time
    pub fn generate_prediction(&self, records: &[ExpenseRecord]) -> PredictionResult {
        self.generate_prediction_at(records, Utc::now())
    }

    /// Forecast relative to `now`, which anchors the weekly trend windows
    pub fn generate_prediction_at(
        &self,
        records: &[ExpenseRecord],
        now: DateTime<Utc>,
    ) -> PredictionResult {
        if records.is_empty() {
            debug!("No expense records, returning empty prediction");
            return PredictionResult::no_data();
        }

        match self.predict(records, now) {
            Ok(result) => {
                debug!(
                    count = records.len(),
                    prediction = result.prediction,
                    confidence = %result.confidence,
                    "Generated prediction"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, count = records.len(), "Prediction failed");
                PredictionResult::failed(format!("Error: {}", e))
            }
        }
    }

    fn predict(
        &self,
        records: &[ExpenseRecord],
        now: DateTime<Utc>,
    ) -> Result<PredictionResult, PredictionError> {
        validate(records)?;

        // sort_by_key is stable, so same-instant records keep their input order
        let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.occurred_at);

        let analytics = summarize(&sorted, now).unwrap_or_else(|e| {
            warn!(error = %e, "Analytics failed, using empty summary");
            AnalyticsSummary::empty()
        });

        let count = sorted.len();
        let overall_avg = mean(sorted.iter().map(|r| r.amount))?;
        let days = self.forecast_days as f64;

        let (prediction, confidence, message) = if count < MIN_TREND_HISTORY {
            (
                overall_avg * days,
                Confidence::Low,
                format!("Basic prediction based on {} expenses.", count),
            )
        } else {
            let recent = &sorted[count.saturating_sub(RECENT_WINDOW)..];
            let recent_avg = mean(recent.iter().map(|r| r.amount))?;
            let weighted = recent_avg * RECENT_WEIGHT + overall_avg * (1.0 - RECENT_WEIGHT);
            (
                weighted * days,
                Confidence::for_count(count),
                format!(
                    "AI prediction based on {} expenses with trend analysis.",
                    count
                ),
            )
        };

        if !prediction.is_finite() {
            return Err(PredictionError::NonFiniteTotal);
        }

        Ok(PredictionResult {
            prediction: round_cents(prediction),
            confidence,
            message,
            analytics,
        })
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Forecast with the default 30-day engine relative to the current time
pub fn generate_prediction(records: &[ExpenseRecord]) -> PredictionResult {
    PredictionEngine::new().generate_prediction(records)
}

fn validate(records: &[ExpenseRecord]) -> Result<(), PredictionError> {
    for (index, record) in records.iter().enumerate() {
        if !record.amount.is_finite() || record.amount < 0.0 {
            return Err(PredictionError::InvalidAmount {
                index,
                amount: record.amount,
            });
        }
    }
    Ok(())
}

/// Build the analytics summary from records sorted by time
fn summarize(
    sorted: &[&ExpenseRecord],
    now: DateTime<Utc>,
) -> Result<AnalyticsSummary, PredictionError> {
    let total: f64 = sorted.iter().map(|r| r.amount).sum();
    if !total.is_finite() {
        return Err(PredictionError::NonFiniteTotal);
    }
    let average = mean(sorted.iter().map(|r| r.amount))?;

    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    for record in sorted {
        *by_category.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }
    let category_breakdown = by_category
        .into_iter()
        .map(|(category, amount)| (category, round_cents(amount)))
        .collect();

    Ok(AnalyticsSummary {
        daily_average: round_cents(average),
        weekly_trend: weekly_trend(sorted, now),
        category_breakdown,
        total_expenses: round_cents(total),
        transaction_count: sorted.len(),
        spending_pattern: PATTERN_STABLE.to_string(),
    })
}

/// Totals for the four weeks before `now`, oldest first
///
/// Windows are closed on both ends, so a record exactly on a week boundary
/// counts toward both adjacent weeks.
fn weekly_trend(sorted: &[&ExpenseRecord], now: DateTime<Utc>) -> Vec<WeeklyAmount> {
    (0..WEEKS_IN_TREND)
        .rev()
        .map(|i| {
            let week_end = now - Duration::weeks(i as i64);
            let week_start = now - Duration::weeks(i as i64 + 1);
            let amount: f64 = sorted
                .iter()
                .filter(|r| r.occurred_at >= week_start && r.occurred_at <= week_end)
                .map(|r| r.amount)
                .sum();

            WeeklyAmount {
                label: format!("Week {}", WEEKS_IN_TREND - i),
                amount: round_cents(amount),
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Result<f64, PredictionError> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Err(PredictionError::NothingToAverage);
    }
    Ok(sum / count as f64)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn record(amount: f64, category: &str, days_ago: i64) -> ExpenseRecord {
        ExpenseRecord::new(amount, category, now() - Duration::days(days_ago))
    }

    /// `amounts` in chronological order, one per day ending yesterday
    fn history(amounts: &[f64]) -> Vec<ExpenseRecord> {
        let n = amounts.len() as i64;
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| record(a, "Food", n - i as i64))
            .collect()
    }

    fn engine() -> PredictionEngine {
        PredictionEngine::new()
    }

    #[test]
    fn test_empty_input() {
        let result = engine().generate_prediction_at(&[], now());

        assert_eq!(result.prediction, 0.0);
        assert_eq!(result.confidence, Confidence::None);
        assert_eq!(result.analytics.spending_pattern, "no_data");
        assert_eq!(result.analytics.transaction_count, 0);
        assert_eq!(result.analytics.weekly_trend.len(), WEEKS_IN_TREND);
    }

    #[test]
    fn test_basic_prediction_under_five_records() {
        let records = history(&[10.0, 20.0, 30.0]);
        let result = engine().generate_prediction_at(&records, now());

        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.prediction, 600.0);
        assert_eq!(result.message, "Basic prediction based on 3 expenses.");
        assert_eq!(result.analytics.spending_pattern, "stable");
    }

    #[test]
    fn test_weighted_prediction_medium_confidence() {
        // Oldest five average 3.0, newest seven average 15.0: overall 10.0
        let mut amounts = vec![3.0; 5];
        amounts.extend(vec![15.0; 7]);
        let records = history(&amounts);

        let result = engine().generate_prediction_at(&records, now());

        assert_eq!(result.confidence, Confidence::Medium);
        assert!((result.prediction - 405.0).abs() < 1e-9);
        assert_eq!(
            result.message,
            "AI prediction based on 12 expenses with trend analysis."
        );
        assert_eq!(result.analytics.daily_average, 10.0);
        assert_eq!(result.analytics.total_expenses, 120.0);
    }

    #[test]
    fn test_confidence_by_count() {
        let low = engine().generate_prediction_at(&history(&[5.0; 5]), now());
        assert_eq!(low.confidence, Confidence::Low);
        assert!(low.message.starts_with("AI prediction"));

        let medium = engine().generate_prediction_at(&history(&[5.0; 10]), now());
        assert_eq!(medium.confidence, Confidence::Medium);

        let high = engine().generate_prediction_at(&history(&[5.0; 20]), now());
        assert_eq!(high.confidence, Confidence::High);
        assert_eq!(high.prediction, 150.0);
    }

    #[test]
    fn test_recent_window_uses_time_order_not_input_order() {
        // Newest seven are 20.0, oldest three are 0.0, supplied newest-first
        let mut records = history(&[0.0, 0.0, 0.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0]);
        records.reverse();

        let result = engine().generate_prediction_at(&records, now());

        // recent 20.0, overall 14.0 -> 20*0.7 + 14*0.3 = 18.2 -> 546.0
        assert!((result.prediction - 546.0).abs() < 1e-9);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_transaction_count_matches_input() {
        for n in [1usize, 4, 5, 7, 13, 25] {
            let records = history(&vec![2.5; n]);
            let result = engine().generate_prediction_at(&records, now());
            assert_eq!(result.analytics.transaction_count, n);
        }
    }

    #[test]
    fn test_category_breakdown_sums_to_total() {
        let records = vec![
            record(12.345, "Food", 1),
            record(7.111, "Food", 2),
            record(99.999, "Rent", 3),
            record(0.015, "Misc", 4),
            record(3.3333, "Transport", 5),
            record(41.0, "Transport", 40),
        ];

        let result = engine().generate_prediction_at(&records, now());
        let analytics = &result.analytics;

        assert_eq!(analytics.category_breakdown.len(), 4);
        let sum: f64 = analytics.category_breakdown.values().sum();
        let tolerance = 0.01 * analytics.category_breakdown.len() as f64;
        assert!((sum - analytics.total_expenses).abs() <= tolerance);
        assert_eq!(analytics.category_breakdown["Food"], 19.46);
    }

    #[test]
    fn test_weekly_trend_buckets() {
        let records = vec![
            record(10.0, "Food", 1),  // Week 4
            record(20.0, "Food", 10), // Week 3
            record(30.0, "Food", 16), // Week 2
            record(40.0, "Food", 27), // Week 1
            record(50.0, "Food", 35), // outside the trend
        ];

        let result = engine().generate_prediction_at(&records, now());
        let trend = &result.analytics.weekly_trend;

        assert_eq!(trend.len(), 4);
        let labels: Vec<&str> = trend.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
        let amounts: Vec<f64> = trend.iter().map(|w| w.amount).collect();
        assert_eq!(amounts, vec![40.0, 30.0, 20.0, 10.0]);
        assert_eq!(result.analytics.total_expenses, 150.0);
    }

    #[test]
    fn test_weekly_trend_zero_filled_for_old_data() {
        let records = vec![record(10.0, "Food", 100), record(5.0, "Food", 200)];
        let result = engine().generate_prediction_at(&records, now());

        assert_eq!(result.analytics.weekly_trend.len(), 4);
        assert!(result.analytics.weekly_trend.iter().all(|w| w.amount == 0.0));
    }

    #[test]
    fn test_week_boundary_counts_in_both_weeks() {
        let records = vec![record(8.0, "Food", 7)];
        let result = engine().generate_prediction_at(&records, now());
        let trend = &result.analytics.weekly_trend;

        assert_eq!(trend[3].amount, 8.0);
        assert_eq!(trend[2].amount, 8.0);
    }

    #[test]
    fn test_invalid_amount_yields_error_result() {
        for bad in [f64::NAN, f64::INFINITY, -5.0] {
            let mut records = history(&[10.0, 20.0, 30.0]);
            records[1].amount = bad;

            let result = engine().generate_prediction_at(&records, now());

            assert_eq!(result.confidence, Confidence::Error);
            assert_eq!(result.prediction, 0.0);
            assert!(result.message.starts_with("Error: "));
            assert_eq!(result.analytics, AnalyticsSummary::empty());
        }
    }

    #[test]
    fn test_overflowing_total_yields_error_result() {
        let records = history(&[f64::MAX, f64::MAX, f64::MAX]);
        let result = engine().generate_prediction_at(&records, now());

        assert_eq!(result.confidence, Confidence::Error);
        assert_eq!(result.prediction, 0.0);
        assert_eq!(result.analytics.spending_pattern, "no_data");
    }

    #[test]
    fn test_idempotent_for_same_input() {
        let records = vec![
            record(12.0, "Food", 2),
            record(30.0, "Rent", 9),
            record(4.5, "Transport", 3),
            record(18.25, "Food", 20),
            record(7.0, "Misc", 1),
            record(60.0, "Bills", 14),
        ];
        let snapshot = records.clone();

        let first = engine().generate_prediction_at(&records, now());
        let second = engine().generate_prediction_at(&records, now());

        assert_eq!(first, second);
        assert_eq!(records, snapshot);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_custom_forecast_days() {
        let records = history(&[10.0, 20.0, 30.0]);
        let result = PredictionEngine::with_forecast_days(7).generate_prediction_at(&records, now());
        assert_eq!(result.prediction, 140.0);
    }

    #[test]
    fn test_generate_prediction_uses_current_time() {
        let records = vec![ExpenseRecord::new(
            25.0,
            "Food",
            Utc::now() - Duration::hours(1),
        )];

        let result = generate_prediction(&records);

        assert_eq!(result.prediction, 750.0);
        assert_eq!(result.analytics.weekly_trend[3].amount, 25.0);
    }

    #[test]
    fn test_rounding_to_cents() {
        let records = history(&[1.0 / 3.0, 1.0 / 3.0]);
        let result = engine().generate_prediction_at(&records, now());

        assert_eq!(result.prediction, 10.0);
        assert_eq!(result.analytics.daily_average, 0.33);
        assert_eq!(result.analytics.total_expenses, 0.67);
    }
}
