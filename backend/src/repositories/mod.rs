//! Persistence layer: one repository per stored entity.

pub mod admin_repository;
pub mod student_repository;
