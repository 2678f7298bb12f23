//! Authentication handlers
//!
//! Handles signup, login, logout, and current-identity lookup.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::models::{Identity, Role};
use shared::{AppError, AppResult};
use validator::Validate;

use crate::core::ServerState;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// POST /api/auth/signup - register and log in a new identity
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Json<Identity>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let identity = state
        .session
        .signup(&req.name, &req.email, &req.password, req.role)?;
    Ok(Json(identity))
}

/// POST /api/auth/login - authenticate and set the current identity
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<Identity>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // Fixed delay before reporting the result, so unknown emails and wrong
    // passwords are indistinguishable by response time.
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let identity = state.session.login(&req.email, &req.password, req.role)?;
    Ok(Json(identity))
}

/// POST /api/auth/logout - clear the current identity
pub async fn logout(State(state): State<ServerState>) -> AppResult<Json<()>> {
    state.session.logout()?;
    Ok(Json(()))
}

/// GET /api/auth/me - the current identity
pub async fn me(State(state): State<ServerState>) -> AppResult<Json<Identity>> {
    state
        .session
        .current()?
        .map(Json)
        .ok_or(AppError::Unauthenticated)
}
