//! Handler functions for the admin student-directory API endpoints.
//!
//! Every route here sits behind the admin guard; handlers receive the
//! decoded claims and delegate to the directory and certificate services.

use crate::api::admin::models::*;
use crate::api::common::{ApiError, MessageResponse, StudentListFilter, service_error_to_http};
use crate::database::models::{StudentRecord, StudentSummary};
use crate::services::certificate_service::CertificateService;
use crate::services::student_service::StudentService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// List students with search, status filter, and pagination.
#[axum::debug_handler]
pub async fn list_students(
    Extension(pool): Extension<SqlitePool>,
    Query(filter): Query<StudentListFilter>,
) -> Result<ResponseJson<StudentListResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.list_students(filter).await {
        Ok((students, pagination)) => Ok(ResponseJson(StudentListResponse {
            students,
            pagination,
        })),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieve a single student by id.
#[axum::debug_handler]
pub async fn get_student(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<StudentResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.get_student_required(&id).await {
        Ok(student) => Ok(ResponseJson(StudentResponse {
            student: StudentRecord::from(student),
        })),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Add a new student with the placeholder password.
#[axum::debug_handler]
pub async fn create_student(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, ResponseJson<StudentMutationResponse>), ApiError> {
    let service = StudentService::new(&pool);

    match service.create_student(payload).await {
        Ok(student) => Ok((
            StatusCode::CREATED,
            ResponseJson(StudentMutationResponse {
                message: "Student added successfully".to_string(),
                student: StudentSummary::from(&student),
            }),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Apply an admin patch to a student record.
#[axum::debug_handler]
pub async fn update_student(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<ResponseJson<StudentMutationResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.update_student(&id, payload).await {
        Ok(student) => Ok(ResponseJson(StudentMutationResponse {
            message: "Student updated successfully".to_string(),
            student: StudentSummary::from(&student),
        })),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Transition a student between pending and approved.
#[axum::debug_handler]
pub async fn update_status(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<ResponseJson<StudentMutationResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.update_status(&id, payload.status).await {
        Ok(student) => Ok(ResponseJson(StudentMutationResponse {
            message: format!("Student status updated to {}", student.status),
            student: StudentSummary::from(&student),
        })),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Hard-delete a student record.
#[axum::debug_handler]
pub async fn delete_student(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.delete_student(&id).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new(
            "Student deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Generate (or regenerate) certificate data for an approved student.
#[axum::debug_handler]
pub async fn generate_certificate(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<GenerateCertificateRequest>,
) -> Result<ResponseJson<GenerateCertificateResponse>, ApiError> {
    let service = CertificateService::new(&pool);

    match service.generate(&id, payload).await {
        Ok(student) => {
            let generated_date = student
                .certificate_generated_date
                .unwrap_or(student.updated_at);
            Ok(ResponseJson(GenerateCertificateResponse {
                message: "Certificate generated successfully".to_string(),
                certificate_generated_date: generated_date,
                student: CertificateStudent {
                    id: student.id,
                    name: student.name,
                    email: student.email,
                    enrollment_number: student.enrollment_number,
                    status: student.status,
                    personal_details: student.personal_details.0,
                },
            }))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Aggregate counts for the admin dashboard.
#[axum::debug_handler]
pub async fn dashboard_stats(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<DashboardStatsResponse>, ApiError> {
    let service = StudentService::new(&pool);

    match service.dashboard_stats().await {
        Ok(stats) => Ok(ResponseJson(DashboardStatsResponse { stats })),
        Err(error) => Err(service_error_to_http(error)),
    }
}
