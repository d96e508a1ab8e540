//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::{Admin, StudentRecord, StudentSummary};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::admin_repository::AdminRepository;
use crate::services::student_service::StudentService;
use crate::utils::jwt::{Claims, JwtUtils, ROLE_ADMIN, ROLE_STUDENT};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Authentication service handling signup, the two login flows, token
/// verification, and the startup admin bootstrap.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
    student_service: StudentService<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance with configuration from the
    /// environment.
    pub fn new(pool: &'a SqlitePool) -> ServiceResult<Self> {
        let jwt_utils = JwtUtils::new()?;
        Ok(Self::with_jwt(pool, jwt_utils))
    }

    /// Create an AuthService with an explicit JWT helper.
    pub fn with_jwt(pool: &'a SqlitePool, jwt_utils: JwtUtils) -> Self {
        AuthService {
            pool,
            jwt_utils,
            student_service: StudentService::new(pool),
        }
    }

    /// Registers a new student and issues a student-role token.
    pub async fn student_signup(&self, request: SignupRequest) -> ServiceResult<SignupResponse> {
        let student = self.student_service.create_from_signup(request).await?;

        let token = self.jwt_utils.issue_token(
            student.id.clone(),
            student.email.clone(),
            ROLE_STUDENT.to_string(),
        )?;

        Ok(SignupResponse {
            message: "Student registered successfully".to_string(),
            token,
            student: StudentSummary::from(&student),
        })
    }

    /// Authenticates a student by email and password.
    pub async fn student_login(
        &self,
        request: LoginRequest,
    ) -> ServiceResult<StudentLoginResponse> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let student = self
            .student_service
            .authenticate(&request.email, &request.password)
            .await?;

        let token = self.jwt_utils.issue_token(
            student.id.clone(),
            student.email.clone(),
            ROLE_STUDENT.to_string(),
        )?;

        let record = StudentRecord::from(student);
        Ok(StudentLoginResponse {
            message: "Student login successful".to_string(),
            token,
            student: (&record).into(),
        })
    }

    /// Authenticates an admin and stamps the last-login time.
    pub async fn admin_login(&self, request: LoginRequest) -> ServiceResult<AdminLoginResponse> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let repo = AdminRepository::new(self.pool);
        let admin = repo
            .get_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !StudentService::verify_password(&request.password, &admin.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        repo.update_last_login(&admin.id, Utc::now()).await?;

        let token = self.jwt_utils.issue_token(
            admin.id.clone(),
            admin.email.clone(),
            ROLE_ADMIN.to_string(),
        )?;

        Ok(AdminLoginResponse {
            message: "Admin login successful".to_string(),
            token,
            admin: AdminInfo {
                id: admin.id,
                name: admin.name,
                email: admin.email,
                role: admin.role,
            },
        })
    }

    /// Decodes a bearer token and re-fetches the live record for its role.
    /// Token claims can be stale (the record may have been deleted), so
    /// existence is checked on every call.
    pub async fn verify(&self, token: &str) -> ServiceResult<VerifyResponse> {
        let claims = self.jwt_utils.validate_token(token)?;
        self.resolve_claims(&claims).await
    }

    /// Loads the record behind a set of already-validated claims.
    pub async fn resolve_claims(&self, claims: &Claims) -> ServiceResult<VerifyResponse> {
        if claims.is_student() {
            let student = self
                .student_service
                .get_student_required(&claims.sub)
                .await?;
            Ok(VerifyResponse {
                user: VerifiedUser::Student(Box::new(StudentRecord::from(student))),
                role: ROLE_STUDENT.to_string(),
            })
        } else if claims.is_admin() {
            let repo = AdminRepository::new(self.pool);
            let admin = repo
                .get_by_id(&claims.sub)
                .await?
                .ok_or_else(|| ServiceError::not_found("Admin"))?;
            Ok(VerifyResponse {
                user: VerifiedUser::Admin((&admin).into()),
                role: ROLE_ADMIN.to_string(),
            })
        } else {
            Err(ServiceError::InvalidToken)
        }
    }

    /// Creates the bootstrap admin account if the configured email is not
    /// taken yet. Runs once at startup; admins are never created through
    /// the public API.
    pub async fn ensure_bootstrap_admin(pool: &SqlitePool, config: &Config) -> ServiceResult<()> {
        let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
            tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; skipping admin bootstrap");
            return Ok(());
        };

        let repo = AdminRepository::new(pool);
        let email = email.trim().to_lowercase();

        if repo.get_by_email(&email).await?.is_some() {
            tracing::info!("Admin user already exists");
            return Ok(());
        }

        let now = Utc::now();
        let admin = Admin {
            id: Uuid::now_v7().to_string(),
            name: "ADMIN".to_string(),
            email,
            password_hash: StudentService::hash_password(password)?,
            role: ROLE_ADMIN.to_string(),
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        repo.insert(&admin).await?;
        tracing::info!("Admin user created: {}", admin.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::StudentStatus;
    use crate::database::test_pool;
    use chrono::DateTime;

    fn jwt() -> JwtUtils {
        JwtUtils::with_secret("test-secret", 604800)
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            name: "Alice Smith".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "secret123".to_string(),
            enrollment_number: "en001".to_string(),
            mother_name: "Mary".to_string(),
            course: "Computer Science".to_string(),
            year: "2024".to_string(),
            religion: None,
            caste: None,
            nationality: None,
            place_of_birth: None,
            date_of_birth: None,
            institute_last_attended: None,
            date_of_admission: None,
            branch: None,
            class_and_year: None,
        }
    }

    fn test_config(pool_email: Option<&str>, password: Option<&str>) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_seconds: 604800,
            server_port: 0,
            admin_email: pool_email.map(str::to_string),
            admin_password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login_roundtrip() {
        let pool = test_pool().await;
        let auth = AuthService::with_jwt(&pool, jwt());

        let signup = auth.student_signup(signup_request()).await.unwrap();
        assert_eq!(signup.student.status, StudentStatus::Pending);
        assert_eq!(signup.student.email, "alice@example.com");

        // The issued token carries the student role.
        let claims = jwt().validate_token(&signup.token).unwrap();
        assert!(claims.is_student());
        assert_eq!(claims.sub, signup.student.id);

        let login = auth
            .student_login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.student.id, signup.student.id);
        assert_eq!(login.student.course, "COMPUTER SCIENCE");
    }

    #[tokio::test]
    async fn test_signup_defaults_applied() {
        let pool = test_pool().await;
        let auth = AuthService::with_jwt(&pool, jwt());

        let mut request = signup_request();
        request.date_of_birth = Some(DateTime::parse_from_rfc3339("2000-01-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc));
        let signup = auth.student_signup(request).await.unwrap();

        let student = StudentService::new(&pool)
            .get_student_required(&signup.student.id)
            .await
            .unwrap();
        assert_eq!(student.religion, "Hindu");
        assert_eq!(student.nationality, "Indian");
        // Branch falls back to the course when not supplied.
        assert_eq!(student.branch, "COMPUTER SCIENCE");
        assert_eq!(student.class_and_year, "2024");
        assert_eq!(
            student.personal_details.0.conduct.as_deref(),
            Some("Very Good")
        );
        assert_eq!(
            student.date_of_birth.to_rfc3339(),
            "2000-01-02T00:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflict() {
        let pool = test_pool().await;
        let auth = AuthService::with_jwt(&pool, jwt());

        auth.student_signup(signup_request()).await.unwrap();

        let mut dup = signup_request();
        dup.enrollment_number = "EN999".to_string();
        let err = auth.student_signup(dup).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_short_signup_password_rejected() {
        let pool = test_pool().await;
        let auth = AuthService::with_jwt(&pool, jwt());

        let mut request = signup_request();
        request.password = "short".to_string();
        let err = auth.student_signup(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_admin_bootstrap_and_login() {
        let pool = test_pool().await;
        let config = test_config(Some("admin@example.com"), Some("adminsecret"));

        AuthService::ensure_bootstrap_admin(&pool, &config)
            .await
            .unwrap();
        // Idempotent: a second run finds the existing account.
        AuthService::ensure_bootstrap_admin(&pool, &config)
            .await
            .unwrap();

        let auth = AuthService::with_jwt(&pool, jwt());
        let login = auth
            .admin_login(LoginRequest {
                email: "admin@example.com".to_string(),
                password: "adminsecret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.admin.role, "admin");

        let claims = jwt().validate_token(&login.token).unwrap();
        assert!(claims.is_admin());

        // Login stamps last_login.
        let admin = AdminRepository::new(&pool)
            .get_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.last_login.is_some());

        let err = auth
            .admin_login(LoginRequest {
                email: "admin@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_verify_refetches_live_record() {
        let pool = test_pool().await;
        let auth = AuthService::with_jwt(&pool, jwt());

        let signup = auth.student_signup(signup_request()).await.unwrap();
        let verified = auth.verify(&signup.token).await.unwrap();
        assert_eq!(verified.role, "student");
        assert!(matches!(verified.user, VerifiedUser::Student(_)));

        // Deleting the record invalidates the still-signed token.
        StudentService::new(&pool)
            .delete_student(&signup.student.id)
            .await
            .unwrap();
        let err = auth.verify(&signup.token).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = auth.verify("garbage").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }
}
