//! Request and response payloads for the admin student-directory endpoints.

use crate::api::common::PaginationMeta;
use crate::database::models::{PersonalDetails, StudentRecord, StudentStatus, StudentSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Admin add-student payload. The created record gets status `pending` and
/// the fixed placeholder password; the student is expected to change it
/// after first login (no reset email exists).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Enrollment number is required"))]
    pub enrollment_number: String,

    #[validate(length(min = 1, message = "Mother name is required"))]
    pub mother_name: String,

    pub mother_tongue: Option<String>,
    pub course: Option<String>,

    #[validate(length(min = 1, message = "Year is required"))]
    pub year: String,

    pub personal_details: Option<PersonalDetails>,
}

/// Admin update payload: a typed patch. Every `Some` field overwrites the
/// stored value; `personalDetails`, when present, replaces the whole nested
/// object (the merge is shallow at the top level only).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Valid email is required"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Enrollment number cannot be empty"))]
    pub enrollment_number: Option<String>,

    #[validate(length(min = 1, message = "Mother name cannot be empty"))]
    pub mother_name: Option<String>,

    #[validate(length(min = 1, message = "Mother tongue cannot be empty"))]
    pub mother_tongue: Option<String>,

    pub course: Option<String>,

    #[validate(length(min = 1, message = "Year cannot be empty"))]
    pub year: Option<String>,

    pub religion: Option<String>,
    pub caste: Option<String>,
    pub nationality: Option<String>,
    pub place_of_birth: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub institute_last_attended: Option<String>,
    pub date_of_admission: Option<DateTime<Utc>>,
    pub branch: Option<String>,
    pub class_and_year: Option<String>,
    pub personal_details: Option<PersonalDetails>,
}

/// Status transition payload. Deserialization already constrains the value
/// to pending|approved.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: StudentStatus,
}

/// Certificate generation payload: a partial overwrite of top-level fields
/// plus a patch for the nested personal details.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCertificateRequest {
    #[serde(default)]
    pub certificate_data: CertificateData,
    #[serde(default)]
    pub personal_details: PersonalDetails,
}

/// Top-level fields the certificate editor may overwrite. Only keys that
/// are present and non-empty take effect; omitted keys keep their prior
/// value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub name: Option<String>,
    pub mother_name: Option<String>,
    pub mother_tongue: Option<String>,
    pub branch: Option<String>,
    pub class_and_year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub students: Vec<StudentRecord>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub student: StudentRecord,
}

#[derive(Debug, Serialize)]
pub struct StudentMutationResponse {
    pub message: String,
    pub student: StudentSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCertificateResponse {
    pub message: String,
    pub certificate_generated_date: DateTime<Utc>,
    pub student: CertificateStudent,
}

/// Student projection returned after certificate generation, carrying the
/// merged personal details for client-side rendering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStudent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub status: StudentStatus,
    pub personal_details: PersonalDetails,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u64,
    pub approved_students: u64,
    pub pending_students: u64,
    pub certificates_generated: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub stats: DashboardStats,
}
