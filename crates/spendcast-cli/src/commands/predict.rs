//! Spending forecast command

use anyhow::Result;
use spendcast_core::db::Database;
use spendcast_core::{Confidence, PredictionEngine, PredictionResult};

use super::find_user;

/// Forecast the user's spending and return the result
pub fn run_prediction(db: &Database, email: &str) -> Result<PredictionResult> {
    let user = find_user(db, email)?;
    let records = db.expense_records(user.id)?;
    let result = PredictionEngine::new().generate_prediction(&records);

    db.log_audit(
        &user.email,
        "predict",
        Some("expense"),
        None,
        Some(&format!("count={}, source=cli", records.len())),
    )?;

    Ok(result)
}

pub fn cmd_predict(db: &Database, email: &str, json: bool) -> Result<()> {
    let result = run_prediction(db, email)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let icon = match result.confidence {
        Confidence::High => "🟢",
        Confidence::Medium => "🟡",
        Confidence::Low => "🟠",
        Confidence::None => "⚪",
        Confidence::Error => "🔴",
    };

    println!();
    println!("🔮 Spending Forecast (next 30 days)");
    println!("   ─────────────────────────────");
    println!("   Predicted: ${:.2}", result.prediction);
    println!("   {} Confidence: {}", icon, result.confidence);
    println!("   {}", result.message);

    let analytics = &result.analytics;
    if analytics.transaction_count == 0 {
        return Ok(());
    }

    println!();
    println!("📊 History");
    println!("   ─────────────────────────────");
    println!(
        "   {} expenses totalling ${:.2} (average ${:.2})",
        analytics.transaction_count, analytics.total_expenses, analytics.daily_average
    );

    println!();
    println!("   Last four weeks:");
    for week in &analytics.weekly_trend {
        println!("     {:<8} ${:>10.2}", week.label, week.amount);
    }

    println!();
    println!("   By category:");
    let mut categories: Vec<_> = analytics.category_breakdown.iter().collect();
    categories.sort_by(|a, b| b.1.total_cmp(a.1));
    for (category, amount) in categories {
        println!("     {:<20} ${:>10.2}", category, amount);
    }

    Ok(())
}
