//! # Admin Authentication Commands
//!
//! ```text
//! POST /api/auth/sign-in   { email, password } ──► { token, email, expires_at }
//! GET  /api/auth/session   Bearer <token>      ──► { email, expires_at } | 401
//! POST /api/auth/sign-out  Bearer <token>      ──► 204, token revoked
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AdminSession;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub email: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub email: String,
    pub expires_at: i64,
}

/// `POST /api/auth/sign-in`
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let admin = state
        .db
        .admins()
        .verify_credentials(&request.email, &request.password)
        .await?
        .ok_or_else(|| {
            warn!("Admin sign-in rejected");
            ApiError::unauthorized("Invalid email or password")
        })?;

    let (token, claims) = state.jwt.issue(&admin)?;
    info!(admin = %admin.email, "Admin signed in");

    Ok(Json(SignInResponse {
        token,
        email: claims.email,
        expires_at: claims.exp,
    }))
}

/// `GET /api/auth/session`
pub async fn get_session(AdminSession(claims): AdminSession) -> Json<SessionInfo> {
    Json(SessionInfo {
        email: claims.email,
        expires_at: claims.exp,
    })
}

/// `POST /api/auth/sign-out`
pub async fn sign_out(
    State(state): State<AppState>,
    AdminSession(claims): AdminSession,
) -> StatusCode {
    state.jwt.revoke(&claims);
    info!(admin = %claims.email, "Admin signed out");
    StatusCode::NO_CONTENT
}
