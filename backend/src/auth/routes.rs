//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle student signup, the two login flows, logout, and
//! token verification. They are designed to be integrated into the main
//! Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/student/signup", post(student_signup))
        .route("/student/login", post(student_login))
        .route("/admin/login", post(admin_login))
        .route("/logout", post(logout))
        .route("/verify", get(verify).layer(middleware::from_fn(jwt_auth)))
}
