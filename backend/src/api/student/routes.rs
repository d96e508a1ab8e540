//! Defines the HTTP routes for student self-service.
//!
//! All routes are gated by the student guard, which re-fetches the
//! student's record on every request.

use super::handlers::*;
use crate::auth::middleware::student_auth;
use axum::{
    Router, middleware,
    routing::{get, put},
};

pub fn student_router() -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
        .route("/password", put(change_password))
        .route("/certificate", get(get_certificate))
        .route("/dashboard", get(get_dashboard))
        .route_layer(middleware::from_fn(student_auth))
}
