//! Shared API plumbing for the HTTP surface.
//!
//! Provides conversion between service-layer errors and HTTP responses,
//! the `{message}` error body every endpoint returns on failure, and the
//! pagination/filtering types used by the student list endpoint.
//!
//! # Error Handling Flow
//! 1. Service layer returns a domain-specific `ServiceError`
//! 2. `service_error_to_http` converts it to a status code plus JSON body
//! 3. Validation failures carry the per-field messages produced by the
//!    `validator` derive

use crate::database::models::StudentStatus;
use crate::errors::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Body shape for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Error half of every handler result: a status code plus the JSON
/// `{message}` body.
pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Plain acknowledgement body for mutations with nothing else to return.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pagination metadata for list responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (1-indexed)
    pub current: u32,
    /// Total number of pages
    pub pages: u32,
    /// Total number of matching items
    pub total: u64,
}

impl PaginationMeta {
    pub fn new(current: u32, per_page: u32, total: u64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            ((total - 1) / per_page as u64 + 1) as u32
        };

        Self {
            current,
            pages,
            total,
        }
    }
}

/// Query parameters for the admin student list endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StudentListFilter {
    /// Case-insensitive substring over name, email, and enrollment number
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// Exact status match
    #[serde(default, deserialize_with = "empty_status_as_none")]
    pub status: Option<StudentStatus>,
    /// Page number (1-indexed)
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    /// Number of items per page
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl StudentListFilter {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10)
    }

    pub fn offset(&self) -> u64 {
        // Widen before multiplying; page is client-controlled and unbounded.
        (self.page() - 1) as u64 * self.limit() as u64
    }

    /// SQL LIKE pattern for the search term, lower-cased for
    /// case-insensitive matching. `None` when no term was supplied.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// Browsers submit `status=` for the "all" choice; treat it as no filter.
fn empty_status_as_none<'de, D>(deserializer: D) -> Result<Option<StudentStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<StudentStatus>().map(Some).map_err(D::Error::custom),
    }
}

/// Converts a ServiceError to the HTTP status and `{message}` body the
/// client surfaces verbatim.
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    let (status, message) = match error {
        ServiceError::Validation { message } => (StatusCode::BAD_REQUEST, message),
        ServiceError::NotFound { entity } => {
            (StatusCode::NOT_FOUND, format!("{} not found", entity))
        }
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::BAD_REQUEST,
            format!("{} already exists with this {}", entity, identifier),
        ),
        ServiceError::PermissionDenied { message } => (StatusCode::FORBIDDEN, message),
        ServiceError::InvalidCredentials => {
            (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
        }
        ServiceError::InvalidOperation { message } => (StatusCode::BAD_REQUEST, message),
        ServiceError::InvalidToken => (StatusCode::BAD_REQUEST, "Invalid token.".to_string()),
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string(),
            )
        }
    };

    (status, error_body(message))
}

/// Builds the JSON `{message}` error body.
pub fn error_body(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        message: message.into(),
    })
}
