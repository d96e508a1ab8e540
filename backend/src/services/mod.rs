//! Business logic services.

pub mod certificate_service;
pub mod student_service;
