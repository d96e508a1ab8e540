//! Main entry point for the leaving-certificate service backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, bootstraps the admin account, and registers all API routes
//! and middleware.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::MessageResponse;
use crate::utils::jwt::JwtUtils;
use auth::service::AuthService;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().expect("configuration");
    let db = Database::new(&config).await.expect("database");
    let pool = db.pool().clone();

    AuthService::ensure_bootstrap_admin(&pool, &config)
        .await
        .expect("admin bootstrap");

    let jwt_utils = JwtUtils::with_secret(&config.jwt_secret, config.jwt_expires_in_seconds);

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/admin", api::admin::routes::admin_router())
        .nest("/api/student", api::student::routes::student_router())
        .layer(Extension(pool))
        .layer(Extension(jwt_utils));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("bind");

    info!(
        "Starting leaving-certificate server on port {}",
        config.server_port
    );
    axum::serve(listener, app).await.expect("serve");
}

async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Leaving Certificate Service API"))
}
