use thiserror::Error;

pub mod credential;
pub mod database;
pub mod form;

pub use credential::CredentialError;
pub use database::DatabaseError;
pub use form::FormError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (database, crypto, parse) are shared; domain errors
/// are store-specific. Never serialized to the wire directly - the api layer
/// converts to AuthError/AdminError/FormsError in one place.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::classify(operation, source))
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }
}
