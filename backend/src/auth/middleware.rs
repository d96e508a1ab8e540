//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Three guards protect the API: a generic token check, and the two
//! role-scoped variants. The role-scoped guards re-fetch the record behind
//! the token rather than trusting its claims, since claims can be stale
//! (the record may have been deleted since issuance). Each request
//! re-checks current existence and role.

use crate::api::common::{ApiError, error_body, service_error_to_http};
use crate::database::models::{AdminRecord, StudentRecord};
use crate::errors::ServiceError;
use crate::repositories::admin_repository::AdminRepository;
use crate::repositories::student_repository::StudentRepository;
use crate::utils::jwt::{Claims, JwtUtils, ROLE_ADMIN, ROLE_STUDENT};
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// Live student record attached by the student guard.
#[derive(Debug, Clone)]
pub struct CurrentStudent(pub StudentRecord);

/// Live admin record attached by the admin guard.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub AdminRecord);

fn missing_token() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        error_body("Access denied. No token provided."),
    )
}

fn invalid_token() -> ApiError {
    (StatusCode::BAD_REQUEST, error_body("Invalid token."))
}

fn server_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_body("Server error"),
    )
}

/// Pulls the bearer token out of the Authorization header and decodes it.
/// The token helper is read from request extensions, layered in at startup.
fn decode_bearer(request: &Request) -> Result<Claims, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(missing_token)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(missing_token)?;

    let jwt_utils = request
        .extensions()
        .get::<JwtUtils>()
        .ok_or_else(server_error)?;

    jwt_utils.validate_token(token).map_err(|_| invalid_token())
}

fn pool_from(request: &Request) -> Result<SqlitePool, ApiError> {
    request
        .extensions()
        .get::<SqlitePool>()
        .cloned()
        .ok_or_else(server_error)
}

/// Generic guard: requires a syntactically valid token and attaches the
/// decoded claims.
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let claims = decode_bearer(&request)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Student guard: valid token, student role, and a live student record.
pub async fn student_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let claims = decode_bearer(&request)?;

    if !claims.has_role(ROLE_STUDENT) {
        return Err((
            StatusCode::FORBIDDEN,
            error_body("Access denied. Student role required."),
        ));
    }

    let pool = pool_from(&request)?;
    let student = StudentRepository::new(&pool)
        .get_by_id(&claims.sub)
        .await
        .map_err(|e| service_error_to_http(ServiceError::from(e)))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, error_body("Student not found.")))?;

    request
        .extensions_mut()
        .insert(CurrentStudent(StudentRecord::from(student)));
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Admin guard: valid token, admin role, and a live admin record.
pub async fn admin_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let claims = decode_bearer(&request)?;

    if !claims.has_role(ROLE_ADMIN) {
        return Err((
            StatusCode::FORBIDDEN,
            error_body("Access denied. Admin role required."),
        ));
    }

    let pool = pool_from(&request)?;
    let admin = AdminRepository::new(&pool)
        .get_by_id(&claims.sub)
        .await
        .map_err(|e| service_error_to_http(ServiceError::from(e)))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, error_body("Admin not found.")))?;

    request
        .extensions_mut()
        .insert(CurrentAdmin(AdminRecord::from(&admin)));
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::admin::models::CreateStudentRequest;
    use crate::database::test_pool;
    use crate::services::student_service::StudentService;
    use axum::{
        Extension, Router,
        body::{Body, to_bytes},
        http::Request as HttpRequest,
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    fn jwt() -> JwtUtils {
        JwtUtils::with_secret("test-secret", 604800)
    }

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn student_app(pool: &SqlitePool) -> Router {
        Router::new()
            .route("/profile", get(ok_handler))
            .route_layer(middleware::from_fn(student_auth))
            .layer(Extension(pool.clone()))
            .layer(Extension(jwt()))
    }

    fn admin_app(pool: &SqlitePool) -> Router {
        Router::new()
            .route("/students", get(ok_handler))
            .route_layer(middleware::from_fn(admin_auth))
            .layer(Extension(pool.clone()))
            .layer(Extension(jwt()))
    }

    fn request(uri: &str, token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn seed_student_token(pool: &SqlitePool) -> (String, String) {
        let student = StudentService::new(pool)
            .create_student(CreateStudentRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                enrollment_number: "EN001".to_string(),
                mother_name: "Mother".to_string(),
                mother_tongue: None,
                course: Some("CS".to_string()),
                year: "2024".to_string(),
                personal_details: None,
            })
            .await
            .unwrap();

        let token = jwt()
            .issue_token(
                student.id.clone(),
                student.email.clone(),
                ROLE_STUDENT.to_string(),
            )
            .unwrap();
        (student.id, token)
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let pool = test_pool().await;
        let response = student_app(&pool)
            .oneshot(request("/profile", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["message"], "Access denied. No token provided.");
    }

    #[tokio::test]
    async fn test_invalid_token_is_bad_request() {
        let pool = test_pool().await;
        let response = student_app(&pool)
            .oneshot(request("/profile", Some("garbage")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Wrong signing key fails the same way.
        let forged = JwtUtils::with_secret("other-secret", 604800)
            .issue_token(
                "s1".to_string(),
                "a@b.com".to_string(),
                ROLE_STUDENT.to_string(),
            )
            .unwrap();
        let response = student_app(&pool)
            .oneshot(request("/profile", Some(&forged)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let pool = test_pool().await;
        let (_, student_token) = seed_student_token(&pool).await;

        // A valid student token must not open admin routes.
        let response = admin_app(&pool)
            .oneshot(request("/students", Some(&student_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin_token = jwt()
            .issue_token(
                "admin-1".to_string(),
                "admin@b.com".to_string(),
                ROLE_ADMIN.to_string(),
            )
            .unwrap();
        let response = student_app(&pool)
            .oneshot(request("/profile", Some(&admin_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_deleted_record_is_not_found() {
        let pool = test_pool().await;
        let (student_id, token) = seed_student_token(&pool).await;

        let response = student_app(&pool)
            .oneshot(request("/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        StudentService::new(&pool)
            .delete_student(&student_id)
            .await
            .unwrap();

        // The token still verifies but the record behind it is gone.
        let response = student_app(&pool)
            .oneshot(request("/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generic_guard_attaches_claims() {
        let pool = test_pool().await;
        let (student_id, token) = seed_student_token(&pool).await;

        async fn echo_subject(Extension(claims): Extension<Claims>) -> String {
            claims.sub
        }

        let app = Router::new()
            .route("/verify", get(echo_subject))
            .route_layer(middleware::from_fn(jwt_auth))
            .layer(Extension(pool.clone()))
            .layer(Extension(jwt()));

        let response = app
            .oneshot(request("/verify", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, student_id.as_bytes());
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let pool = test_pool().await;
        let response = student_app(&pool)
            .oneshot(request("/profile", None))
            .await
            .unwrap();

        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("application/json"));
    }
}
