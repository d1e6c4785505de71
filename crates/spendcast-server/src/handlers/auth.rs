//! Registration, login, and token verification handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{non_blank, parse_body};
use crate::{token, AppError, AppState, AuthUser};
use spendcast_core::auth::{hash_password, validate_password, verify_password};
use spendcast_core::{Error as CoreError, NewUser, User};

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: User,
}

/// POST /api/register - Create an account
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let req = parse_body(payload)?;

    let (Some(email), Some(password)) = (non_blank(req.email), req.password) else {
        return Err(AppError::bad_request("Email and password are required"));
    };
    if password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }

    validate_password(&password).map_err(AppError::from_core)?;
    let password_hash = hash_password(&password)?;

    let new_user = NewUser {
        email,
        password_hash,
        first_name: non_blank(req.first_name),
        last_name: non_blank(req.last_name),
    };

    let id = match state.db.create_user(&new_user) {
        Ok(id) => id,
        Err(CoreError::Conflict(_)) => {
            return Err(AppError::conflict("Email already registered"));
        }
        Err(e) => return Err(AppError::from_core(e)),
    };

    let user = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::internal("User vanished after registration"))?;

    state
        .db
        .log_audit(&user.email, "register", Some("user"), Some(user.id), None)?;
    info!(user = %user.email, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful",
            user,
        }),
    ))
}

/// POST /api/login - Exchange credentials for an access token
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = parse_body(payload)?;

    let (Some(email), Some(password)) = (non_blank(req.email), req.password) else {
        return Err(AppError::bad_request("Email and password are required"));
    };
    if password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }

    let Some((user, stored_hash)) = state.db.get_user_credentials(&email)? else {
        warn!("Login attempt for unknown or inactive account");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    // An unreadable stored hash is treated like a wrong password
    let verified = verify_password(&password, &stored_hash).unwrap_or_else(|e| {
        warn!(user = %user.email, error = %e, "Stored password hash could not be parsed");
        false
    });
    if !verified {
        warn!(user = %user.email, "Login failed: wrong password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let access_token = token::issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.email,
        state.config.token_ttl_hours,
    )?;

    state
        .db
        .log_audit(&user.email, "login", Some("user"), Some(user.id), None)?;

    Ok(Json(LoginResponse { access_token, user }))
}

/// GET /api/verify-token - Confirm the bearer token and return its user
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<VerifyResponse>, AppError> {
    let user = state
        .db
        .get_user(auth.id)?
        .ok_or_else(|| AppError::unauthorized("User not found or inactive"))?;

    Ok(Json(VerifyResponse { valid: true, user }))
}
