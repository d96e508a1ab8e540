//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for signup, the two
//! login flows, and token verification, parse request data, and interact
//! with the `auth::service` for core business logic.

use crate::api::common::{ApiError, MessageResponse, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle student self-service registration
#[axum::debug_handler]
pub async fn student_signup(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, ResponseJson<SignupResponse>), ApiError> {
    let auth_service = AuthService::new(&pool).map_err(service_error_to_http)?;

    match auth_service.student_signup(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle student login request
#[axum::debug_handler]
pub async fn student_login(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<StudentLoginResponse>, ApiError> {
    let auth_service = AuthService::new(&pool).map_err(service_error_to_http)?;

    match auth_service.student_login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle admin login request
#[axum::debug_handler]
pub async fn admin_login(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<AdminLoginResponse>, ApiError> {
    let auth_service = AuthService::new(&pool).map_err(service_error_to_http)?;

    match auth_service.admin_login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Verify the bearer token and return the live record behind it.
/// The generic guard has already decoded the claims; this re-fetches the
/// record so a deleted account fails even with a still-valid token.
#[axum::debug_handler]
pub async fn verify(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<VerifyResponse>, ApiError> {
    let auth_service = AuthService::new(&pool).map_err(service_error_to_http)?;

    match auth_service.resolve_claims(&claims).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<MessageResponse> {
    // Tokens are self-contained; logout is the client discarding its copy.
    ResponseJson(MessageResponse::new("Logged out successfully"))
}
