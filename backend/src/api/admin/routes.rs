//! Defines the HTTP routes for admin student management.
//!
//! All routes are gated by the admin guard, which re-fetches the admin
//! record on every request.

use super::handlers::*;
use crate::auth::middleware::admin_auth;
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

pub fn admin_router() -> Router {
    Router::new()
        .route("/students", get(list_students))
        .route("/students", post(create_student))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}", put(update_student))
        .route("/students/{id}", delete(delete_student))
        .route("/students/{id}/status", patch(update_status))
        .route(
            "/students/{id}/generate-certificate",
            post(generate_certificate),
        )
        .route("/dashboard/stats", get(dashboard_stats))
        .route_layer(middleware::from_fn(admin_auth))
}
