// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::schema::FieldError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation { message: String, errors: Vec<String> },

    // 401 Unauthorized
    Unauthorized(String),
    /// Expired-but-well-formed credential, distinct from a malformed one
    SessionExpired,

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::SessionExpired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::SessionExpired => "Session expired, please sign in again",
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to the JSON failure envelope: `{ message, errors? }`
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, errors } => json!({
                "message": message,
                "errors": errors,
            }),
            _ => json!({ "message": self.message() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: "Validation error".to_string(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound(what) => {
                ApiError::not_found(format!("{} not found", what))
            }
            crate::store::StoreError::Conflict(msg) => ApiError::conflict(msg),
        }
    }
}

impl From<crate::auth::DecodeError> for ApiError {
    fn from(err: crate::auth::DecodeError) -> Self {
        match err {
            crate::auth::DecodeError::SecretMissing => {
                tracing::error!("JWT secret not configured");
                ApiError::internal_server_error("Authentication is not configured")
            }
            _ => ApiError::unauthorized("Invalid session"),
        }
    }
}

impl From<crate::auth::password::PasswordError> for ApiError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        // Never leak hashing internals to clients
        tracing::error!("password hashing error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldError;

    #[test]
    fn validation_envelope_lists_every_field() {
        let err = ApiError::validation(vec![
            FieldError::new("subject", "must be at least 5 characters"),
            FieldError::new("description", "is required"),
        ]);
        let body = err.to_json();
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].as_str().unwrap().contains("subject"));
    }

    #[test]
    fn session_expired_is_distinct_from_invalid() {
        assert_ne!(
            ApiError::SessionExpired.message(),
            ApiError::unauthorized("Invalid session").message()
        );
        assert_eq!(ApiError::SessionExpired.status_code(), StatusCode::UNAUTHORIZED);
    }
}
