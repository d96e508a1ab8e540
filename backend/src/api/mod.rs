//! API module: the HTTP surface of the service.

pub mod admin;
pub mod common;
pub mod student;
