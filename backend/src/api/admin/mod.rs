//! Admin-only endpoints: student directory management, certificate
//! generation, and dashboard stats.

pub mod handlers;
pub mod models;
pub mod routes;
