//! Integration tests for spendcast-core
//!
//! These tests exercise the full register → record → predict workflow.

use chrono::{DateTime, Duration, TimeZone, Utc};
use spendcast_core::{
    auth::{hash_password, verify_password},
    db::Database,
    models::{NewExpense, NewUser},
    Confidence, PredictionEngine,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

fn register(db: &Database, email: &str, password: &str) -> i64 {
    let hash = hash_password(password).expect("Failed to hash password");
    db.create_user(&NewUser {
        email: email.to_string(),
        password_hash: hash,
        first_name: None,
        last_name: None,
    })
    .expect("Failed to create user")
}

/// Record one expense per day, oldest first, ending `days_before_now` days ago
fn record_daily(db: &Database, user_id: i64, entries: &[(&str, f64)], days_before_now: i64) {
    let n = entries.len() as i64;
    for (i, (category, amount)) in entries.iter().enumerate() {
        let ts = now() - Duration::days(days_before_now + n - 1 - i as i64);
        db.insert_expense(user_id, &NewExpense::new(category, *amount).with_timestamp(ts))
            .expect("Failed to insert expense");
    }
}

// =============================================================================
// Account Tests
// =============================================================================

#[test]
fn test_register_then_login() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let id = register(&db, "Pat@Example.com", "correct horse");

    let (user, hash) = db
        .get_user_credentials("pat@example.com")
        .unwrap()
        .expect("Active user should have credentials");
    assert_eq!(user.id, id);
    assert!(verify_password("correct horse", &hash).unwrap());
    assert!(!verify_password("wrong horse", &hash).unwrap());
}

#[test]
fn test_deactivated_user_cannot_login() {
    let db = Database::in_memory().unwrap();
    let id = register(&db, "sam@example.com", "password123");

    db.set_user_active(id, false).unwrap();

    assert!(db.get_user_credentials("sam@example.com").unwrap().is_none());
}

// =============================================================================
// Prediction Workflow Tests
// =============================================================================

#[test]
fn test_prediction_with_no_history() {
    let db = Database::in_memory().unwrap();
    let id = register(&db, "new@example.com", "password123");

    let records = db.expense_records(id).unwrap();
    let result = PredictionEngine::new().generate_prediction_at(&records, now());

    assert_eq!(result.prediction, 0.0);
    assert_eq!(result.confidence, Confidence::None);
    assert_eq!(result.analytics.transaction_count, 0);
    assert_eq!(result.analytics.weekly_trend.len(), 4);
}

#[test]
fn test_basic_prediction_from_stored_expenses() {
    let db = Database::in_memory().unwrap();
    let id = register(&db, "basic@example.com", "password123");

    record_daily(&db, id, &[("Food", 10.0), ("Food", 20.0), ("Transport", 30.0)], 1);

    let records = db.expense_records(id).unwrap();
    let result = PredictionEngine::new().generate_prediction_at(&records, now());

    assert_eq!(result.prediction, 600.0);
    assert_eq!(result.confidence, Confidence::Low);
    assert_eq!(result.message, "Basic prediction based on 3 expenses.");
    assert_eq!(result.analytics.total_expenses, 60.0);
    assert_eq!(result.analytics.category_breakdown["Food"], 30.0);
    assert_eq!(result.analytics.category_breakdown["Transport"], 30.0);
    assert_eq!(result.analytics.weekly_trend[3].amount, 60.0);
}

#[test]
fn test_trend_prediction_uses_recording_order() {
    let db = Database::in_memory().unwrap();
    let id = register(&db, "trend@example.com", "password123");

    // Ten at 5.0 followed by the seven most recent at 20.0
    let mut entries = vec![("Coffee", 5.0); 10];
    entries.extend(vec![("Dining", 20.0); 7]);
    record_daily(&db, id, &entries, 1);

    let records = db.expense_records(id).unwrap();
    let result = PredictionEngine::new().generate_prediction_at(&records, now());

    // overall = 190 / 17, blended = 0.7 * 20 + 0.3 * overall
    let overall = 190.0 / 17.0;
    let expected = ((20.0 * 0.7 + overall * (1.0 - 0.7)) * 30.0 * 100.0_f64).round() / 100.0;
    assert_eq!(result.prediction, expected);
    assert_eq!(result.confidence, Confidence::Medium);
    assert_eq!(
        result.message,
        "AI prediction based on 17 expenses with trend analysis."
    );
    assert_eq!(result.analytics.transaction_count, 17);
}

#[test]
fn test_prediction_only_sees_own_expenses() {
    let db = Database::in_memory().unwrap();
    let alice = register(&db, "alice@example.com", "password123");
    let bob = register(&db, "bob@example.com", "password123");

    record_daily(&db, alice, &[("Rent", 1000.0)], 2);
    record_daily(&db, bob, &[("Food", 10.0), ("Food", 10.0)], 2);

    let records = db.expense_records(bob).unwrap();
    let result = PredictionEngine::new().generate_prediction_at(&records, now());

    assert_eq!(result.prediction, 300.0);
    assert_eq!(result.analytics.total_expenses, 20.0);
    assert!(!result.analytics.category_breakdown.contains_key("Rent"));
}

#[test]
fn test_deleted_expense_drops_out_of_prediction() {
    let db = Database::in_memory().unwrap();
    let id = register(&db, "del@example.com", "password123");

    let keep = db
        .insert_expense(
            id,
            &NewExpense::new("Food", 10.0).with_timestamp(now() - Duration::days(1)),
        )
        .unwrap();
    let gone = db
        .insert_expense(
            id,
            &NewExpense::new("Food", 50.0).with_timestamp(now() - Duration::days(2)),
        )
        .unwrap();
    assert_ne!(keep, gone);

    assert!(db.delete_expense(id, gone).unwrap());

    let records = db.expense_records(id).unwrap();
    let result = PredictionEngine::new().generate_prediction_at(&records, now());
    assert_eq!(result.prediction, 300.0);
    assert_eq!(result.analytics.transaction_count, 1);
}

#[test]
fn test_old_expenses_excluded_from_weekly_trend() {
    let db = Database::in_memory().unwrap();
    let id = register(&db, "old@example.com", "password123");

    db.insert_expense(
        id,
        &NewExpense::new("Travel", 400.0).with_timestamp(now() - Duration::days(60)),
    )
    .unwrap();
    db.insert_expense(
        id,
        &NewExpense::new("Food", 12.0).with_timestamp(now() - Duration::days(10)),
    )
    .unwrap();

    let records = db.expense_records(id).unwrap();
    let result = PredictionEngine::new().generate_prediction_at(&records, now());

    let trend_total: f64 = result.analytics.weekly_trend.iter().map(|w| w.amount).sum();
    assert_eq!(trend_total, 12.0);
    assert_eq!(result.analytics.weekly_trend[2].amount, 12.0);
    assert_eq!(result.analytics.total_expenses, 412.0);
}
