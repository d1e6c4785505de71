//! Spending forecast handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::{error, warn};

use crate::{AppState, AuthUser};
use spendcast_core::PredictionResult;

/// GET /api/predict - Forecast the caller's spending
///
/// Always answers 200: a storage failure becomes an error-confidence result
/// rather than an HTTP error.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<PredictionResult> {
    let records = match state.db.expense_records(user.id) {
        Ok(records) => records,
        Err(e) => {
            error!(user = %user.email, error = %e, "Failed to load expense records");
            return Json(PredictionResult::failed("Failed to generate prediction"));
        }
    };

    let result = state.engine.generate_prediction(&records);

    if let Err(e) = state.db.log_audit(
        &user.email,
        "predict",
        Some("expense"),
        None,
        Some(&format!(
            "count={}, confidence={}",
            records.len(),
            result.confidence
        )),
    ) {
        warn!(error = %e, "Failed to write audit entry for prediction");
    }

    Json(result)
}
