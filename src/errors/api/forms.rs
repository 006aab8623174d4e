use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{CredentialError, DatabaseError, FormError, InternalError};
use crate::types::dto::common::{ErrorResponse, FieldError};

/// Citizen health-form route family error responses
#[derive(ApiResponse, Debug)]
pub enum FormsError {
    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Invalid or malformed token
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Form belongs to another citizen
    #[oai(status = 403)]
    AccessDenied(Json<ErrorResponse>),

    /// Health assessment form not found
    #[oai(status = 404)]
    FormNotFound(Json<ErrorResponse>),

    /// Request referenced a missing resource
    #[oai(status = 400)]
    BadReference(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl FormsError {
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        FormsError::ValidationFailed(Json(ErrorResponse::with_fields("Validation failed", errors)))
    }

    pub fn invalid_token() -> Self {
        FormsError::InvalidToken(Json(ErrorResponse::new("Invalid token")))
    }

    pub fn expired_token() -> Self {
        FormsError::ExpiredToken(Json(ErrorResponse::new("Token has expired")))
    }

    pub fn access_denied() -> Self {
        FormsError::AccessDenied(Json(ErrorResponse::new("Access denied")))
    }

    pub fn form_not_found() -> Self {
        FormsError::FormNotFound(Json(ErrorResponse::new("Health assessment form not found")))
    }

    pub fn bad_reference(detail: Option<String>) -> Self {
        FormsError::BadReference(Json(ErrorResponse::with_detail(
            "Referenced resource not found",
            detail,
        )))
    }

    pub fn internal_server_error(detail: Option<String>) -> Self {
        FormsError::InternalError(Json(ErrorResponse::with_detail(
            "Internal server error",
            detail,
        )))
    }

    /// Central conversion from internal errors
    pub fn from_internal(err: InternalError, debug: bool) -> Self {
        let detail = debug.then(|| err.to_string());
        match &err {
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid token on form route: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => Self::expired_token(),
            InternalError::Form(FormError::NotFound(_)) => Self::form_not_found(),
            InternalError::Form(FormError::NotOwner(form_id)) => {
                tracing::warn!("Ownership check failed for form {}", form_id);
                Self::access_denied()
            }
            InternalError::Database(DatabaseError::ForeignKeyViolation { .. }) => {
                Self::bad_reference(detail)
            }
            _ => {
                tracing::error!("Unexpected error in form operation: {}", err);
                Self::internal_server_error(detail)
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            FormsError::ValidationFailed(json) => json.0.message.clone(),
            FormsError::InvalidToken(json) => json.0.message.clone(),
            FormsError::ExpiredToken(json) => json.0.message.clone(),
            FormsError::AccessDenied(json) => json.0.message.clone(),
            FormsError::FormNotFound(json) => json.0.message.clone(),
            FormsError::BadReference(json) => json.0.message.clone(),
            FormsError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for FormsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
