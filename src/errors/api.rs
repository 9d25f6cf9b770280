use poem_openapi::{payload::Json, ApiResponse};

use crate::errors::domain::{AuthError, PatientError, RecordError, ServiceError};
use crate::types::dto::common::ErrorResponse;

/// API-facing error responses shared by all endpoints
///
/// Service errors are converted here at the transport boundary; storage
/// internals are never leaked to the caller.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Authentication missing, invalid, or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated but not allowed to perform this action
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Target entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl ApiError {
    /// Create a BadRequest error
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest(Json(ErrorResponse {
            error: error.into(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create an Unauthorized error
    pub fn unauthorized(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: error.into(),
            message: message.into(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: error.into(),
            message: message.into(),
            status_code: 403,
        }))
    }

    /// Create a NotFound error
    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: error.into(),
            message: message.into(),
            status_code: 404,
        }))
    }

    /// Create an Internal error with a generic message
    pub fn internal() -> Self {
        ApiError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred. Please try again later.".to_string(),
            status_code: 500,
        }))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::MissingFields => ApiError::bad_request("missing_fields", message),
            AuthError::InvalidEmail => ApiError::bad_request("invalid_email", message),
            AuthError::WeakPassword { .. } => ApiError::bad_request("invalid_password", message),
            AuthError::InvalidRole(_) => ApiError::bad_request("invalid_role", message),
            AuthError::DuplicateUsername => ApiError::bad_request("username_exists", message),
            AuthError::DuplicateEmail => ApiError::bad_request("email_exists", message),
            AuthError::InvalidCredentials => ApiError::unauthorized("invalid_credentials", message),
            AuthError::AccountInactive => ApiError::unauthorized("account_inactive", message),
            AuthError::InvalidToken => ApiError::unauthorized("invalid_token", message),
            AuthError::ExpiredToken => ApiError::unauthorized("expired_token", message),
            AuthError::UserNotFound(_) => ApiError::not_found("user_not_found", message),
            AuthError::Forbidden { .. } => ApiError::forbidden("forbidden", message),
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        let message = err.to_string();
        match err {
            PatientError::MissingFields => ApiError::bad_request("missing_fields", message),
            PatientError::InvalidAge { .. } => ApiError::bad_request("invalid_age", message),
            PatientError::InvalidName => ApiError::bad_request("invalid_name", message),
            PatientError::InvalidContact => ApiError::bad_request("invalid_contact", message),
            PatientError::NotFound(_) => ApiError::not_found("patient_not_found", message),
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        let message = err.to_string();
        match err {
            RecordError::MissingDiagnosis => ApiError::bad_request("missing_fields", message),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Auth(e) => e.into(),
            ServiceError::Patient(e) => e.into(),
            ServiceError::Record(e) => e.into(),
            // Persistence and serialization failures surface as a generic 500
            other => {
                tracing::error!(error = %other, "internal failure");
                ApiError::internal()
            }
        }
    }
}
