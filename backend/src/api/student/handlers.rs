//! Handler functions for student self-service API endpoints.
//!
//! The student guard has already re-fetched the live record; handlers read
//! it from request extensions and go back to the directory service only
//! for mutations.

use crate::api::common::{ApiError, MessageResponse, service_error_to_http};
use crate::api::student::models::*;
use crate::auth::middleware::CurrentStudent;
use crate::database::models::StudentRecord;
use crate::services::student_service::StudentService;
use axum::{
    extract::{Extension, Json},
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Return the authenticated student's own record.
#[axum::debug_handler]
pub async fn get_profile(
    Extension(CurrentStudent(student)): Extension<CurrentStudent>,
) -> ResponseJson<ProfileResponse> {
    ResponseJson(ProfileResponse { student })
}

/// Apply the restricted self-service patch.
#[axum::debug_handler]
pub async fn update_profile(
    Extension(pool): Extension<SqlitePool>,
    Extension(CurrentStudent(student)): Extension<CurrentStudent>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<ResponseJson<ProfileUpdateResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.update_profile(&student.id, payload).await {
        Ok(updated) => {
            let record = StudentRecord::from(updated);
            Ok(ResponseJson(ProfileUpdateResponse {
                message: "Profile updated successfully".to_string(),
                student: (&record).into(),
            }))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Rotate the student's password after verifying the current one.
#[axum::debug_handler]
pub async fn change_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(CurrentStudent(student)): Extension<CurrentStudent>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.change_password(&student.id, payload).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new(
            "Password updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Certificate status plus the merged data the client template fills in.
#[axum::debug_handler]
pub async fn get_certificate(
    Extension(CurrentStudent(student)): Extension<CurrentStudent>,
) -> ResponseJson<CertificateStatusResponse> {
    let certificate = CertificateStatus {
        status: student.status,
        generated: student.certificate_generated,
        generated_date: student.certificate_generated_date,
        student: CertificateSubject::from(&student),
    };

    ResponseJson(CertificateStatusResponse { certificate })
}

/// Student dashboard: profile card plus certificate state.
#[axum::debug_handler]
pub async fn get_dashboard(
    Extension(CurrentStudent(student)): Extension<CurrentStudent>,
) -> ResponseJson<DashboardResponse> {
    let dashboard = Dashboard {
        student: ProfileCard::from(&student),
        certificate: CertificateCard {
            status: student.status,
            generated: student.certificate_generated,
            generated_date: student.certificate_generated_date,
            created_at: student.created_at,
        },
    };

    ResponseJson(DashboardResponse { dashboard })
}
