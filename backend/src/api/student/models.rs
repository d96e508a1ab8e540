//! Request and response payloads for the student self-service endpoints.

use crate::database::models::{PersonalDetails, StudentRecord, StudentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student profile patch: the restricted field subset a student may edit on
/// their own record.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Mother name cannot be empty"))]
    pub mother_name: Option<String>,

    #[validate(length(min = 1, message = "Course cannot be empty"))]
    pub course: Option<String>,

    #[validate(length(min = 1, message = "Year cannot be empty"))]
    pub year: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub student: StudentRecord,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub student: ProfileSummary,
}

/// Profile projection returned by student-facing mutations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub status: StudentStatus,
    pub course: String,
    pub year: String,
    pub mother_name: String,
}

impl From<&StudentRecord> for ProfileSummary {
    fn from(student: &StudentRecord) -> Self {
        ProfileSummary {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            enrollment_number: student.enrollment_number.clone(),
            status: student.status,
            course: student.course.clone(),
            year: student.year.clone(),
            mother_name: student.mother_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CertificateStatusResponse {
    pub certificate: CertificateStatus,
}

/// Certificate state plus the merged data the client-side template fills
/// in. The rendering itself happens entirely in the browser.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStatus {
    pub status: StudentStatus,
    pub generated: bool,
    pub generated_date: Option<DateTime<Utc>>,
    pub student: CertificateSubject,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSubject {
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub mother_name: String,
    pub course: String,
    pub year: String,
    pub personal_details: PersonalDetails,
}

impl From<&StudentRecord> for CertificateSubject {
    fn from(student: &StudentRecord) -> Self {
        CertificateSubject {
            name: student.name.clone(),
            email: student.email.clone(),
            enrollment_number: student.enrollment_number.clone(),
            mother_name: student.mother_name.clone(),
            course: student.course.clone(),
            year: student.year.clone(),
            personal_details: student.personal_details.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub student: ProfileCard,
    pub certificate: CertificateCard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCard {
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub status: StudentStatus,
    pub course: String,
    pub year: String,
    pub mother_name: String,
    pub personal_details: PersonalDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateCard {
    pub status: StudentStatus,
    pub generated: bool,
    pub generated_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&StudentRecord> for ProfileCard {
    fn from(student: &StudentRecord) -> Self {
        ProfileCard {
            name: student.name.clone(),
            email: student.email.clone(),
            enrollment_number: student.enrollment_number.clone(),
            status: student.status,
            course: student.course.clone(),
            year: student.year.clone(),
            mother_name: student.mother_name.clone(),
            personal_details: student.personal_details.clone(),
        }
    }
}
