//! Student self-service endpoints: profile, password, certificate status,
//! and dashboard.

pub mod handlers;
pub mod models;
pub mod routes;
