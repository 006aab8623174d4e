use thiserror::Error;

/// Health assessment form domain failures
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Health assessment form not found: {0}")]
    NotFound(String),

    /// Form exists but belongs to another citizen
    #[error("Access denied to form {0}")]
    NotOwner(String),
}
