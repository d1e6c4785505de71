//! Spendcast Web Server
//!
//! Axum-based REST API for the Spendcast expense tracker.
//!
//! Security features:
//! - Bearer token authentication (HS256 JWT) on every expense route
//! - Restrictive CORS policy
//! - Input validation (field lengths, positive amounts, pagination limits)
//! - Audit logging of API access per user
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use spendcast_core::{Database, PredictionEngine};

mod handlers;
pub mod token;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Default access token lifetime in hours
pub const DEFAULT_TOKEN_HOURS: i64 = 48;

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_HOURS: i64 = 24 * 365;

/// Environment variable for the token signing secret
pub const JWT_SECRET_ENV: &str = "SPENDCAST_JWT_SECRET";

/// Environment variable for the token lifetime in hours
pub const TOKEN_HOURS_ENV: &str = "SPENDCAST_TOKEN_HOURS";

/// Environment variable for comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "SPENDCAST_ALLOWED_ORIGINS";

/// Deployment environment, reported by the health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify access tokens
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub token_ttl_hours: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: token::random_secret(),
            token_ttl_hours: DEFAULT_TOKEN_HOURS,
            allowed_origins: vec![],
            environment: Environment::Development,
        }
    }
}

impl ServerConfig {
    /// Build configuration from environment variables
    ///
    /// Environment variables:
    /// - `SPENDCAST_JWT_SECRET`: token signing secret (random per process if unset)
    /// - `SPENDCAST_TOKEN_HOURS`: token lifetime in hours (default: 48)
    /// - `SPENDCAST_ALLOWED_ORIGINS`: comma-separated CORS origins
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var(JWT_SECRET_ENV) {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!(
                    "⚠️  {} not set; using a random secret (tokens will not survive a restart)",
                    JWT_SECRET_ENV
                );
                token::random_secret()
            }
        };

        let token_ttl_hours = std::env::var(TOKEN_HOURS_ENV)
            .ok()
            .and_then(|v| parse_token_hours(&v))
            .unwrap_or(DEFAULT_TOKEN_HOURS);

        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Self {
            jwt_secret,
            token_ttl_hours,
            allowed_origins,
            environment: Environment::Development,
        }
    }
}

/// Parse a token lifetime, rejecting values outside `1..=MAX_TOKEN_HOURS`
pub fn parse_token_hours(input: &str) -> Option<i64> {
    match input.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_TOKEN_HOURS).contains(&hours) => Some(hours),
        _ => {
            warn!(input, "Invalid token lifetime, using default");
            None
        }
    }
}

/// Parse a comma-separated list of CORS origins
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub engine: PredictionEngine,
}

/// The authenticated caller, inserted by `auth_middleware`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

/// Authentication middleware - validates the bearer token and loads the user
///
/// Rejects with 401 when the token is missing, invalid, or expired, or when the
/// user it names no longer exists or has been deactivated.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(bearer) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        debug!(path = %path, "Missing bearer token");
        return AppError::unauthorized("Authentication required").into_response();
    };

    let claims = match token::validate_token(&state.config.jwt_secret, bearer) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, path = %path, "Rejected access token");
            return AppError::unauthorized("Invalid or expired token").into_response();
        }
    };

    let Some(user_id) = claims.user_id() else {
        warn!(sub = %claims.sub, path = %path, "Token subject is not a user ID");
        return AppError::unauthorized("Invalid or expired token").into_response();
    };

    match state.db.get_user(user_id) {
        Ok(Some(user)) if user.is_active => {
            debug!(user = %user.email, path = %path, "Authenticated via bearer token");
            request.extensions_mut().insert(AuthUser {
                id: user.id,
                email: user.email,
            });
            next.run(request).await
        }
        Ok(_) => {
            warn!(user_id, path = %path, "Token for missing or inactive user");
            AppError::unauthorized("User not found or inactive").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        engine: PredictionEngine::new(),
    });

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/verify-token", get(handlers::verify_token))
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        .route("/predict", get(handlers::predict))
        .route("/audit", get(handlers::list_audit_log))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes
        .merge(protected_routes)
        .fallback(handlers::api_not_found);

    let cors_methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(cors_methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(cors_methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // CSP: restrict scripts to same-origin, allow inline styles for the SPA
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state);

    // Unknown paths fall back to the SPA's index.html so client-side routes resolve
    if let Some(dir) = static_dir {
        let index = std::path::Path::new(dir).join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ))
}

/// Start the server with configuration read from the environment
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.environment == Environment::Production && config.allowed_origins.is_empty() {
        info!("No CORS origins configured; only same-origin requests will be allowed");
    }
    if static_dir.is_none() {
        info!("No static directory configured; serving the API only");
    }

    let environment = config.environment;
    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!(environment = %environment, "Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, surfacing validation failures as 400s
    pub fn from_core(err: spendcast_core::Error) -> Self {
        match err {
            spendcast_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
