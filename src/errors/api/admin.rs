use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{CredentialError, DatabaseError, FormError, InternalError};
use crate::types::dto::common::{ErrorResponse, FieldError};

/// Admin route family error responses
///
/// 401 is reserved for token/credential failures; a valid token with the
/// wrong shape or a dead admin row is 403, and self-modification is 400.
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Invalid username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Admin account is inactive (login time)
    #[oai(status = 401)]
    AccountInactive(Json<ErrorResponse>),

    /// Invalid or malformed admin token
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Admin token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Token is valid but does not carry the admin claim
    #[oai(status = 403)]
    AdminRequired(Json<ErrorResponse>),

    /// Claimed admin row is missing or deactivated
    #[oai(status = 403)]
    AdminInactive(Json<ErrorResponse>),

    /// Stored role is not in the permitted set for this action
    #[oai(status = 403)]
    InsufficientRole(Json<ErrorResponse>),

    /// Super admin attempted to change or deactivate their own account
    #[oai(status = 400)]
    SelfModification(Json<ErrorResponse>),

    /// Admin not found
    #[oai(status = 404)]
    AdminNotFound(Json<ErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<ErrorResponse>),

    /// Health assessment form not found
    #[oai(status = 404)]
    FormNotFound(Json<ErrorResponse>),

    /// Username already taken
    #[oai(status = 409)]
    DuplicateUsername(Json<ErrorResponse>),

    /// Request referenced a missing resource
    #[oai(status = 400)]
    BadReference(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AdminError {
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        AdminError::ValidationFailed(Json(ErrorResponse::with_fields("Validation failed", errors)))
    }

    pub fn invalid_credentials() -> Self {
        AdminError::InvalidCredentials(Json(ErrorResponse::new("Invalid username or password")))
    }

    pub fn account_inactive() -> Self {
        AdminError::AccountInactive(Json(ErrorResponse::new("Admin account is inactive")))
    }

    pub fn invalid_token() -> Self {
        AdminError::InvalidToken(Json(ErrorResponse::new("Invalid admin token")))
    }

    pub fn expired_token() -> Self {
        AdminError::ExpiredToken(Json(ErrorResponse::new("Admin token has expired")))
    }

    pub fn admin_required() -> Self {
        AdminError::AdminRequired(Json(ErrorResponse::new("Admin access required")))
    }

    pub fn admin_inactive() -> Self {
        AdminError::AdminInactive(Json(ErrorResponse::new("Admin not found or inactive")))
    }

    pub fn insufficient_role() -> Self {
        AdminError::InsufficientRole(Json(ErrorResponse::new(
            "Insufficient permissions for this action",
        )))
    }

    pub fn self_modification(message: &str) -> Self {
        AdminError::SelfModification(Json(ErrorResponse::new(message)))
    }

    pub fn admin_not_found() -> Self {
        AdminError::AdminNotFound(Json(ErrorResponse::new("Admin not found")))
    }

    pub fn user_not_found() -> Self {
        AdminError::UserNotFound(Json(ErrorResponse::new("User not found")))
    }

    pub fn form_not_found() -> Self {
        AdminError::FormNotFound(Json(ErrorResponse::new("Health assessment form not found")))
    }

    pub fn duplicate_username(detail: Option<String>) -> Self {
        AdminError::DuplicateUsername(Json(ErrorResponse::with_detail(
            "Admin already exists with this username",
            detail,
        )))
    }

    pub fn bad_reference(detail: Option<String>) -> Self {
        AdminError::BadReference(Json(ErrorResponse::with_detail(
            "Referenced resource not found",
            detail,
        )))
    }

    pub fn internal_server_error(detail: Option<String>) -> Self {
        AdminError::InternalError(Json(ErrorResponse::with_detail(
            "Internal server error",
            detail,
        )))
    }

    /// Central conversion from internal errors
    pub fn from_internal(err: InternalError, debug: bool) -> Self {
        let detail = debug.then(|| err.to_string());
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid admin credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::AccountInactive) => Self::account_inactive(),
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid admin token: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => Self::expired_token(),
            InternalError::Credential(CredentialError::AdminAccessRequired) => {
                tracing::warn!("Non-admin token presented to admin route");
                Self::admin_required()
            }
            InternalError::Credential(CredentialError::AdminInactive) => Self::admin_inactive(),
            InternalError::Credential(CredentialError::InsufficientRole { role }) => {
                tracing::warn!("Role {} rejected by role gate", role);
                Self::insufficient_role()
            }
            InternalError::Credential(CredentialError::SelfModificationDenied) => {
                Self::self_modification("You cannot modify your own account")
            }
            InternalError::Credential(CredentialError::AdminNotFound(_)) => Self::admin_not_found(),
            InternalError::Credential(CredentialError::UserNotFound(_)) => Self::user_not_found(),
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::warn!("Duplicate admin username attempt: {}", username);
                Self::duplicate_username(detail)
            }
            InternalError::Form(FormError::NotFound(_)) => Self::form_not_found(),
            InternalError::Database(DatabaseError::UniqueViolation { .. }) => {
                Self::duplicate_username(detail)
            }
            InternalError::Database(DatabaseError::ForeignKeyViolation { .. }) => {
                Self::bad_reference(detail)
            }
            _ => {
                tracing::error!("Unexpected error in admin operation: {}", err);
                Self::internal_server_error(detail)
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AdminError::ValidationFailed(json) => json.0.message.clone(),
            AdminError::InvalidCredentials(json) => json.0.message.clone(),
            AdminError::AccountInactive(json) => json.0.message.clone(),
            AdminError::InvalidToken(json) => json.0.message.clone(),
            AdminError::ExpiredToken(json) => json.0.message.clone(),
            AdminError::AdminRequired(json) => json.0.message.clone(),
            AdminError::AdminInactive(json) => json.0.message.clone(),
            AdminError::InsufficientRole(json) => json.0.message.clone(),
            AdminError::SelfModification(json) => json.0.message.clone(),
            AdminError::AdminNotFound(json) => json.0.message.clone(),
            AdminError::UserNotFound(json) => json.0.message.clone(),
            AdminError::FormNotFound(json) => json.0.message.clone(),
            AdminError::DuplicateUsername(json) => json.0.message.clone(),
            AdminError::BadReference(json) => json.0.message.clone(),
            AdminError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
