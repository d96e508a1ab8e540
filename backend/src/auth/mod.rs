//! Authentication and authorization module.
//!
//! Covers login/signup flows for both identity kinds, token verification,
//! the guard middleware protecting role-scoped routes, and the startup
//! admin bootstrap.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
