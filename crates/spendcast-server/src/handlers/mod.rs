//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod auth;
pub mod expenses;
pub mod health;
pub mod predict;

// Re-export all handlers for use in router
pub use audit::*;
pub use auth::*;
pub use expenses::*;
pub use health::*;
pub use predict::*;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::AppError;

/// Unwrap a JSON body, turning malformed or mistyped input into a 400
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(AppError::bad_request("Invalid request body"))
        }
    }
}

/// Unwrap a path parameter, turning an unparseable segment into a 400
pub(crate) fn parse_path<T>(param: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    match param {
        Ok(Path(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected path parameter");
            Err(AppError::bad_request("Invalid expense ID"))
        }
    }
}

/// Treat blank strings as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
