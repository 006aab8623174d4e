use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{CredentialError, DatabaseError, InternalError};
use crate::types::dto::common::{ErrorResponse, FieldError};

/// Citizen authentication error responses
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Account exists but has been deactivated
    #[oai(status = 401)]
    AccountInactive(Json<ErrorResponse>),

    /// Invalid or malformed token
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<ErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    DuplicateEmail(Json<ErrorResponse>),

    /// Request referenced a missing resource
    #[oai(status = 400)]
    BadReference(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        AuthError::ValidationFailed(Json(ErrorResponse::with_fields("Validation failed", errors)))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse::new("Invalid email or password")))
    }

    pub fn account_inactive() -> Self {
        AuthError::AccountInactive(Json(ErrorResponse::new(
            "Account is inactive. Please contact support.",
        )))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ErrorResponse::new("Invalid token")))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ErrorResponse::new("Token has expired")))
    }

    pub fn user_not_found() -> Self {
        AuthError::UserNotFound(Json(ErrorResponse::new("User not found")))
    }

    pub fn duplicate_email(detail: Option<String>) -> Self {
        AuthError::DuplicateEmail(Json(ErrorResponse::with_detail(
            "User already exists with this email address",
            detail,
        )))
    }

    pub fn bad_reference(detail: Option<String>) -> Self {
        AuthError::BadReference(Json(ErrorResponse::with_detail(
            "Referenced resource not found",
            detail,
        )))
    }

    pub fn internal_server_error(detail: Option<String>) -> Self {
        AuthError::InternalError(Json(ErrorResponse::with_detail(
            "Internal server error",
            detail,
        )))
    }

    /// Central conversion from internal errors
    ///
    /// Raw detail is only attached when `debug` (development mode) is set.
    pub fn from_internal(err: InternalError, debug: bool) -> Self {
        let detail = debug.then(|| err.to_string());
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid citizen credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::AccountInactive) => Self::account_inactive(),
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::warn!("Duplicate registration attempt: {}", email);
                Self::duplicate_email(detail)
            }
            InternalError::Credential(CredentialError::UserNotFound(_)) => Self::user_not_found(),
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid citizen token: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => Self::expired_token(),
            InternalError::Database(DatabaseError::UniqueViolation { .. }) => {
                Self::duplicate_email(detail)
            }
            InternalError::Database(DatabaseError::ForeignKeyViolation { .. }) => {
                Self::bad_reference(detail)
            }
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error(detail)
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::ValidationFailed(json) => json.0.message.clone(),
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::AccountInactive(json) => json.0.message.clone(),
            AuthError::InvalidToken(json) => json.0.message.clone(),
            AuthError::ExpiredToken(json) => json.0.message.clone(),
            AuthError::UserNotFound(json) => json.0.message.clone(),
            AuthError::DuplicateEmail(json) => json.0.message.clone(),
            AuthError::BadReference(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
