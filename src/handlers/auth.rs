use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::AuthSession;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============ Handlers ============

/// Login with email and password against the backend
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Backend failure")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthSession>> {
    // Validate input
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let session = state
        .backend
        .authenticate(payload.email.trim(), &payload.password)
        .await?;

    tracing::info!("User {} logged in", session.user.id);
    Ok(Json(session))
}
