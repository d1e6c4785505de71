//! Expense handlers
//!
//! All operations are scoped to the authenticated user. Another user's expense
//! is reported as not found.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, parse_body, parse_path};
use crate::{AppError, AppState, AuthUser};
use spendcast_core::{Expense, NewExpense};

/// Request body for creating or updating an expense
///
/// On update, omitted fields keep their current values.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    /// Calendar date as YYYY-MM-DD
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct ExpenseCreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match non_blank(value) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::bad_request("Invalid date format, expected YYYY-MM-DD")),
    }
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseCreatedResponse>), AppError> {
    let req = parse_body(payload)?;

    let (Some(category), Some(amount)) = (non_blank(req.category), req.amount) else {
        return Err(AppError::bad_request("Category and amount are required"));
    };
    let date = parse_date(req.date)?.unwrap_or_else(|| Utc::now().date_naive());

    let expense = NewExpense {
        category,
        amount,
        description: non_blank(req.description),
        date: Some(date),
        timestamp: None,
    };

    let id = state
        .db
        .insert_expense(user.id, &expense)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        &user.email,
        "create",
        Some("expense"),
        Some(id),
        Some(&format!("category={}, amount={}", expense.category, expense.amount)),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseCreatedResponse {
            message: "Expense added successfully",
            id,
        }),
    ))
}

/// GET /api/expenses - List the caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.db.list_expenses(user.id)?;

    state.db.log_audit(
        &user.email,
        "list",
        Some("expense"),
        None,
        Some(&format!("count={}", expenses.len())),
    )?;

    Ok(Json(expenses))
}

/// PUT /api/expenses/:id - Update an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, AppError> {
    let id = parse_path(id)?;
    let req = parse_body(payload)?;

    let current = state
        .db
        .get_expense(user.id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    let date = match req.date {
        Some(_) => parse_date(req.date)?,
        None => current.date,
    };
    let description = match req.description {
        Some(d) => non_blank(Some(d)),
        None => current.description,
    };

    let expense = NewExpense {
        category: non_blank(req.category).unwrap_or(current.category),
        amount: req.amount.unwrap_or(current.amount),
        description,
        date,
        timestamp: None,
    };

    let updated = state
        .db
        .update_expense(user.id, id, &expense)
        .map_err(AppError::from_core)?;
    if !updated {
        return Err(AppError::not_found("Expense not found"));
    }

    state
        .db
        .log_audit(&user.email, "update", Some("expense"), Some(id), None)?;

    let expense = state
        .db
        .get_expense(user.id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_path(id)?;
    if !state.db.delete_expense(user.id, id)? {
        return Err(AppError::not_found("Expense not found"));
    }

    state
        .db
        .log_audit(&user.email, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(MessageResponse {
        message: "Expense deleted successfully",
    }))
}
