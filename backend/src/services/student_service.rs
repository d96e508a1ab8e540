//! Student directory business logic.
//!
//! Handles creation, search, patching, status transitions, deletion,
//! self-service profile/password changes, and the admin dashboard counts.
//! All password handling goes through bcrypt here; plaintext never reaches
//! the repository layer.

use crate::api::admin::models::{CreateStudentRequest, DashboardStats, UpdateStudentRequest};
use crate::api::common::{PaginationMeta, StudentListFilter};
use crate::api::student::models::{ChangePasswordRequest, UpdateProfileRequest};
use crate::auth::models::SignupRequest;
use crate::database::models::{PersonalDetails, Student, StudentRecord, StudentStatus};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::student_repository::StudentRepository;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// Password assigned by admin-created records. The student is expected to
/// change it; no reset or notification flow exists.
pub const PLACEHOLDER_PASSWORD: &str = "default123";

pub struct StudentService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> StudentService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Hashes a password before it is stored.
    pub(crate) fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::validation(format!("Password hashing failed: {}", e)))
    }

    /// Verifies a candidate plaintext against a stored hash.
    pub(crate) fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash)
            .map_err(|e| ServiceError::validation(format!("Password verification failed: {}", e)))
    }

    /// Creates a student from the self-service signup payload, applying the
    /// certificate-field defaults and mirroring them into the nested
    /// personal details.
    pub async fn create_from_signup(&self, request: SignupRequest) -> ServiceResult<Student> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = StudentRepository::new(self.pool);
        let email = request.email.trim().to_lowercase();
        let enrollment_number = upper(&request.enrollment_number);

        if repo
            .email_or_enrollment_exists(&email, &enrollment_number)
            .await?
        {
            return Err(ServiceError::already_exists(
                "Student",
                "email or enrollment number",
            ));
        }

        let now = Utc::now();
        let course = upper(&request.course);
        let year = request.year.trim().to_string();
        let religion = request.religion.unwrap_or_else(|| "Hindu".to_string());
        let caste = request.caste.unwrap_or_else(|| "OBC".to_string());
        let nationality = request.nationality.unwrap_or_else(|| "Indian".to_string());
        let place_of_birth = request.place_of_birth.unwrap_or_else(|| "Mumbai".to_string());
        let date_of_birth = request.date_of_birth.unwrap_or(now);
        let institute_last_attended = request
            .institute_last_attended
            .unwrap_or_else(|| "ABC High School, Mumbai".to_string());
        let date_of_admission = request.date_of_admission.unwrap_or(now);

        let personal_details = PersonalDetails {
            religion: Some(religion.clone()),
            caste: Some(caste.clone()),
            mother_tongue: Some("Gujarati".to_string()),
            nationality: Some(nationality.clone()),
            place_of_birth: Some(place_of_birth.clone()),
            date_of_birth: Some(date_of_birth),
            institute_last_attended: Some(institute_last_attended.clone()),
            date_of_admission: Some(date_of_admission),
            conduct: Some("Very Good".to_string()),
            reason_for_leaving: Some("Completion of Course".to_string()),
            remarks: Some("Good Academic Record".to_string()),
            date_of_leaving: None,
        };

        let student = Student {
            id: Uuid::now_v7().to_string(),
            name: upper(&request.name),
            email,
            enrollment_number,
            password_hash: Self::hash_password(&request.password)?,
            mother_name: upper(&request.mother_name),
            branch: request
                .branch
                .as_deref()
                .map(upper)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| course.clone()),
            class_and_year: request
                .class_and_year
                .as_deref()
                .map(upper)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| year.clone()),
            course,
            mother_tongue: "Gujarati".to_string(),
            year,
            religion,
            caste,
            nationality,
            place_of_birth,
            date_of_birth,
            institute_last_attended,
            date_of_admission,
            status: StudentStatus::Pending,
            personal_details: Json(personal_details),
            certificate_generated: false,
            certificate_generated_date: None,
            created_at: now,
            updated_at: now,
        };

        repo.insert(&student).await?;
        Ok(student)
    }

    /// Admin add-student. Status starts at `pending` and the record gets
    /// the fixed placeholder password.
    pub async fn create_student(&self, request: CreateStudentRequest) -> ServiceResult<Student> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = StudentRepository::new(self.pool);
        let email = request.email.trim().to_lowercase();
        let enrollment_number = upper(&request.enrollment_number);

        if repo
            .email_or_enrollment_exists(&email, &enrollment_number)
            .await?
        {
            return Err(ServiceError::already_exists(
                "Student",
                "email or enrollment number",
            ));
        }

        let mother_tongue = request
            .mother_tongue
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Gujarati")
            .to_string();

        let mut personal_details = request.personal_details.unwrap_or_default();
        personal_details.mother_tongue = Some(mother_tongue.clone());

        let now = Utc::now();
        let student = Student {
            id: Uuid::now_v7().to_string(),
            name: upper(&request.name),
            email,
            enrollment_number,
            password_hash: Self::hash_password(PLACEHOLDER_PASSWORD)?,
            mother_name: upper(&request.mother_name),
            course: request.course.as_deref().map(upper).unwrap_or_default(),
            mother_tongue,
            year: request.year.trim().to_string(),
            religion: "Hindu".to_string(),
            caste: "OBC".to_string(),
            nationality: "Indian".to_string(),
            place_of_birth: "Mumbai".to_string(),
            date_of_birth: now,
            institute_last_attended: "ABC High School, Mumbai".to_string(),
            date_of_admission: now,
            branch: String::new(),
            class_and_year: String::new(),
            status: StudentStatus::Pending,
            personal_details: Json(personal_details),
            certificate_generated: false,
            certificate_generated_date: None,
            created_at: now,
            updated_at: now,
        };

        repo.insert(&student).await?;
        Ok(student)
    }

    /// Lists students matching the filter, newest first, with pagination
    /// metadata.
    pub async fn list_students(
        &self,
        filter: StudentListFilter,
    ) -> ServiceResult<(Vec<StudentRecord>, PaginationMeta)> {
        filter
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = StudentRepository::new(self.pool);
        let students = repo.list(&filter).await?;
        let total = repo.count(&filter).await?;

        let records = students.into_iter().map(StudentRecord::from).collect();
        let pagination = PaginationMeta::new(filter.page(), filter.limit(), total);

        Ok((records, pagination))
    }

    /// Retrieves a student by id, failing with NotFound if absent.
    pub async fn get_student_required(&self, id: &str) -> ServiceResult<Student> {
        let repo = StudentRepository::new(self.pool);
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))
    }

    /// Applies an admin patch. `Some` fields overwrite; a supplied
    /// `personalDetails` replaces the whole nested object.
    pub async fn update_student(
        &self,
        id: &str,
        patch: UpdateStudentRequest,
    ) -> ServiceResult<Student> {
        patch
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = StudentRepository::new(self.pool);
        let mut student = self.get_student_required(id).await?;

        if let Some(name) = patch.name {
            student.name = upper(&name);
        }
        if let Some(email) = patch.email {
            student.email = email.trim().to_lowercase();
        }
        if let Some(enrollment_number) = patch.enrollment_number {
            student.enrollment_number = upper(&enrollment_number);
        }
        if let Some(mother_name) = patch.mother_name {
            student.mother_name = upper(&mother_name);
        }
        if let Some(mother_tongue) = patch.mother_tongue {
            student.mother_tongue = mother_tongue.trim().to_string();
        }
        if let Some(course) = patch.course {
            student.course = upper(&course);
        }
        if let Some(year) = patch.year {
            student.year = year.trim().to_string();
        }
        if let Some(religion) = patch.religion {
            student.religion = religion;
        }
        if let Some(caste) = patch.caste {
            student.caste = caste;
        }
        if let Some(nationality) = patch.nationality {
            student.nationality = nationality;
        }
        if let Some(place_of_birth) = patch.place_of_birth {
            student.place_of_birth = place_of_birth;
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            student.date_of_birth = date_of_birth;
        }
        if let Some(institute) = patch.institute_last_attended {
            student.institute_last_attended = institute;
        }
        if let Some(date_of_admission) = patch.date_of_admission {
            student.date_of_admission = date_of_admission;
        }
        if let Some(branch) = patch.branch {
            student.branch = upper(&branch);
        }
        if let Some(class_and_year) = patch.class_and_year {
            student.class_and_year = upper(&class_and_year);
        }
        if let Some(personal_details) = patch.personal_details {
            student.personal_details = Json(personal_details);
        }

        student.updated_at = Utc::now();
        repo.save(&student).await?;
        Ok(student)
    }

    /// Sets the workflow status. No other side effects: certificate flags
    /// are untouched, and re-applying the same status is a no-op.
    pub async fn update_status(&self, id: &str, status: StudentStatus) -> ServiceResult<Student> {
        let repo = StudentRepository::new(self.pool);
        let mut student = self.get_student_required(id).await?;

        student.status = status;
        student.updated_at = Utc::now();
        repo.save(&student).await?;
        Ok(student)
    }

    /// Hard delete.
    pub async fn delete_student(&self, id: &str) -> ServiceResult<()> {
        let repo = StudentRepository::new(self.pool);
        if !repo.delete(id).await? {
            return Err(ServiceError::not_found("Student"));
        }
        Ok(())
    }

    /// Applies the restricted self-service patch to the student's own
    /// record.
    pub async fn update_profile(
        &self,
        id: &str,
        patch: UpdateProfileRequest,
    ) -> ServiceResult<Student> {
        patch
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = StudentRepository::new(self.pool);
        let mut student = self.get_student_required(id).await?;

        if let Some(name) = patch.name {
            student.name = upper(&name);
        }
        if let Some(mother_name) = patch.mother_name {
            student.mother_name = upper(&mother_name);
        }
        if let Some(course) = patch.course {
            student.course = upper(&course);
        }
        if let Some(year) = patch.year {
            student.year = year.trim().to_string();
        }

        student.updated_at = Utc::now();
        repo.save(&student).await?;
        Ok(student)
    }

    /// Rotates the student's password after verifying the current one.
    pub async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = StudentRepository::new(self.pool);
        let mut student = self.get_student_required(id).await?;

        if !Self::verify_password(&request.current_password, &student.password_hash)? {
            return Err(ServiceError::validation("Current password is incorrect"));
        }

        student.password_hash = Self::hash_password(&request.new_password)?;
        student.updated_at = Utc::now();
        repo.save(&student).await?;
        Ok(())
    }

    /// Four independent counts; nothing is cached.
    pub async fn dashboard_stats(&self) -> ServiceResult<DashboardStats> {
        let repo = StudentRepository::new(self.pool);

        Ok(DashboardStats {
            total_students: repo.count_all().await?,
            approved_students: repo.count_by_status(StudentStatus::Approved).await?,
            pending_students: repo.count_by_status(StudentStatus::Pending).await?,
            certificates_generated: repo.count_certificates_generated().await?,
        })
    }

    /// Looks up a student by email and verifies the password. Both failure
    /// modes collapse into InvalidCredentials.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<Student> {
        let repo = StudentRepository::new(self.pool);
        let student = repo
            .get_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !Self::verify_password(password, &student.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(student)
    }
}

fn upper(s: &str) -> String {
    s.trim().to_uppercase()
}
