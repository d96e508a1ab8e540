//! Certificate generation workflow.
//!
//! Approval is a hard gate: generation fails for any student whose status
//! is not `approved` and leaves the record untouched. Generation itself is
//! a merge-and-stamp: the nested personal details are shallow-merged, the
//! named top-level fields are selectively overwritten, and the generated
//! date is re-stamped on every call. Rendering the resulting data into the
//! printable certificate happens entirely client-side.

use crate::api::admin::models::{CertificateData, GenerateCertificateRequest};
use crate::database::models::Student;
use crate::database::models::StudentStatus;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::student_repository::StudentRepository;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct CertificateService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> CertificateService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Generates (or regenerates) the certificate data for a student.
    pub async fn generate(
        &self,
        student_id: &str,
        request: GenerateCertificateRequest,
    ) -> ServiceResult<Student> {
        let repo = StudentRepository::new(self.pool);
        let mut student = repo
            .get_by_id(student_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        if student.status != StudentStatus::Approved {
            return Err(ServiceError::invalid_operation(
                "Cannot generate certificate for non-approved student",
            ));
        }

        let now = Utc::now();
        student.certificate_generated = true;
        student.certificate_generated_date = Some(now);
        student.personal_details.0.merge(request.personal_details);
        apply_certificate_data(&mut student, &request.certificate_data);
        student.updated_at = now;

        repo.save(&student).await?;
        Ok(student)
    }
}

/// Overwrites the top-level certificate fields for keys that are present
/// and non-empty; omitted or blank keys keep their prior value.
fn apply_certificate_data(student: &mut Student, data: &CertificateData) {
    if let Some(name) = non_empty(&data.name) {
        student.name = name.to_uppercase();
    }
    if let Some(mother_name) = non_empty(&data.mother_name) {
        student.mother_name = mother_name.to_uppercase();
    }
    if let Some(mother_tongue) = non_empty(&data.mother_tongue) {
        student.mother_tongue = mother_tongue.to_string();
    }
    if let Some(branch) = non_empty(&data.branch) {
        student.branch = branch.to_uppercase();
    }
    if let Some(class_and_year) = non_empty(&data.class_and_year) {
        student.class_and_year = class_and_year.to_uppercase();
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::admin::models::CreateStudentRequest;
    use crate::database::models::PersonalDetails;
    use crate::database::test_pool;
    use crate::services::student_service::StudentService;

    async fn seed_student(pool: &SqlitePool, approved: bool) -> Student {
        let service = StudentService::new(pool);
        let student = service
            .create_student(CreateStudentRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                enrollment_number: "EN001".to_string(),
                mother_name: "Mother".to_string(),
                mother_tongue: None,
                course: Some("CS".to_string()),
                year: "2024".to_string(),
                personal_details: Some(PersonalDetails {
                    religion: Some("Hindu".to_string()),
                    conduct: Some("Very Good".to_string()),
                    ..Default::default()
                }),
            })
            .await
            .unwrap();

        if approved {
            service
                .update_status(&student.id, StudentStatus::Approved)
                .await
                .unwrap()
        } else {
            student
        }
    }

    #[tokio::test]
    async fn test_generation_gated_on_approval() {
        let pool = test_pool().await;
        let student = seed_student(&pool, false).await;
        let service = CertificateService::new(&pool);

        let err = service
            .generate(
                &student.id,
                GenerateCertificateRequest {
                    personal_details: PersonalDetails {
                        remarks: Some("Changed".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidOperation { .. }));

        // The failed attempt must not have touched the record.
        let unchanged = StudentService::new(&pool)
            .get_student_required(&student.id)
            .await
            .unwrap();
        assert!(!unchanged.certificate_generated);
        assert!(unchanged.certificate_generated_date.is_none());
        assert!(unchanged.personal_details.0.remarks.is_none());
    }

    #[tokio::test]
    async fn test_generation_missing_student() {
        let pool = test_pool().await;
        let service = CertificateService::new(&pool);

        let err = service
            .generate("missing", GenerateCertificateRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_generation_merges_and_stamps() {
        let pool = test_pool().await;
        let student = seed_student(&pool, true).await;
        let service = CertificateService::new(&pool);

        let updated = service
            .generate(
                &student.id,
                GenerateCertificateRequest {
                    certificate_data: CertificateData {
                        branch: Some("Information Technology".to_string()),
                        ..Default::default()
                    },
                    personal_details: PersonalDetails {
                        remarks: Some("Excellent Record".to_string()),
                        date_of_leaving: Some(Utc::now()),
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();

        assert!(updated.certificate_generated);
        assert!(updated.certificate_generated_date.is_some());
        assert_eq!(updated.branch, "INFORMATION TECHNOLOGY");
        // Supplied personal-detail keys land, prior keys survive.
        assert_eq!(
            updated.personal_details.0.remarks.as_deref(),
            Some("Excellent Record")
        );
        assert!(updated.personal_details.0.date_of_leaving.is_some());
        assert_eq!(updated.personal_details.0.religion.as_deref(), Some("Hindu"));
        assert_eq!(
            updated.personal_details.0.conduct.as_deref(),
            Some("Very Good")
        );
        // Top-level fields not named in certificateData are untouched.
        assert_eq!(updated.name, "ALICE");
    }

    #[tokio::test]
    async fn test_certificate_data_ignores_empty_values() {
        let pool = test_pool().await;
        let student = seed_student(&pool, true).await;
        let service = CertificateService::new(&pool);

        let updated = service
            .generate(
                &student.id,
                GenerateCertificateRequest {
                    certificate_data: CertificateData {
                        name: Some("".to_string()),
                        mother_name: Some("   ".to_string()),
                        class_and_year: Some("TE 2024".to_string()),
                        ..Default::default()
                    },
                    personal_details: PersonalDetails::default(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "ALICE");
        assert_eq!(updated.mother_name, "MOTHER");
        assert_eq!(updated.class_and_year, "TE 2024");
    }

    #[tokio::test]
    async fn test_regeneration_restamps_date() {
        let pool = test_pool().await;
        let student = seed_student(&pool, true).await;
        let service = CertificateService::new(&pool);

        let first = service
            .generate(&student.id, GenerateCertificateRequest::default())
            .await
            .unwrap();
        let second = service
            .generate(&student.id, GenerateCertificateRequest::default())
            .await
            .unwrap();

        assert!(second.certificate_generated);
        assert!(
            second.certificate_generated_date.unwrap()
                >= first.certificate_generated_date.unwrap()
        );
    }
}
