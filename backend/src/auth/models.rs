//! Data structures for authentication-related entities.
//!
//! Request/response payloads for signup, the two login flows, and token
//! verification.

use crate::api::student::models::ProfileSummary;
use crate::database::models::{AdminRecord, StudentRecord, StudentSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student self-service signup payload. Optional certificate fields fall
/// back to the documented defaults.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Enrollment number is required"))]
    pub enrollment_number: String,

    #[validate(length(min = 1, message = "Mother name is required"))]
    pub mother_name: String,

    #[validate(length(min = 1, message = "Course is required"))]
    pub course: String,

    #[validate(length(min = 1, message = "Year is required"))]
    pub year: String,

    pub religion: Option<String>,
    pub caste: Option<String>,
    pub nationality: Option<String>,
    pub place_of_birth: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub institute_last_attended: Option<String>,
    pub date_of_admission: Option<DateTime<Utc>>,
    pub branch: Option<String>,
    pub class_and_year: Option<String>,
}

/// Login payload shared by the student and admin flows.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub token: String,
    pub student: StudentSummary,
}

#[derive(Debug, Serialize)]
pub struct StudentLoginResponse {
    pub message: String,
    pub token: String,
    pub student: ProfileSummary,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminInfo,
}

/// Admin identity returned on login.
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Token verification response: the live record for the token's role.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: VerifiedUser,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VerifiedUser {
    Student(Box<StudentRecord>),
    Admin(AdminRecord),
}
