//! JWT token utilities for authentication and authorization.
//!
//! Provides token creation and validation for the two identity kinds the
//! service knows about: students and admins. Tokens are self-contained;
//! there is no server-side session or revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ServiceError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_ADMIN: &str = "admin";

/// JWT Claims structure identifying the authenticated subject
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject id (student or admin record id)
    pub sub: String,
    /// Subject email
    pub email: String,
    /// Subject role: "student" or "admin"
    pub role: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    pub fn is_student(&self) -> bool {
        self.has_role(ROLE_STUDENT)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

/// JWT token utility for creating and validating tokens
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance with keys from environment
    pub fn new() -> Result<Self, ServiceError> {
        let config = Config::from_env()
            .map_err(|e| ServiceError::validation(format!("Config error: {}", e)))?;

        Ok(Self::with_secret(
            &config.jwt_secret,
            config.jwt_expires_in_seconds,
        ))
    }

    /// Create a JwtUtils instance from an explicit secret and expiry.
    pub fn with_secret(secret: &str, expires_in_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds,
        }
    }

    /// Issue a signed token for the given subject.
    pub fn issue_token(
        &self,
        subject_id: String,
        email: String,
        role: String,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: subject_id,
            email,
            role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::validation(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a token. Fails on bad signature, malformed
    /// payload, or expiry.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| ServiceError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utils() -> JwtUtils {
        JwtUtils::with_secret("test-secret", 604800)
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let jwt = utils();
        let token = jwt
            .issue_token(
                "student-1".to_string(),
                "a@b.com".to_string(),
                ROLE_STUDENT.to_string(),
            )
            .unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "student-1");
        assert_eq!(claims.email, "a@b.com");
        assert!(claims.is_student());
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let jwt = utils();
        let token = jwt
            .issue_token(
                "admin-1".to_string(),
                "admin@b.com".to_string(),
                ROLE_ADMIN.to_string(),
            )
            .unwrap();

        let other = JwtUtils::with_secret("another-secret", 604800);
        assert!(other.validate_token(&token).is_err());
        assert!(jwt.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = utils();

        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "student-1".to_string(),
            email: "a@b.com".to_string(),
            role: ROLE_STUDENT.to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(&Header::default(), &claims, &jwt.encoding_key).unwrap();

        assert!(jwt.validate_token(&token).is_err());
    }
}
