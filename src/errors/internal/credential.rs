use thiserror::Error;

/// Authentication and authorization failures for citizens and admins
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("User already exists: {0}")]
    DuplicateEmail(String),

    #[error("Admin already exists: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Admin not found: {0}")]
    AdminNotFound(String),

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Expired token")]
    ExpiredToken,

    /// Token is valid but its claims do not carry admin access
    #[error("Admin access required")]
    AdminAccessRequired,

    /// Claimed admin row is missing or deactivated
    #[error("Admin not found or inactive")]
    AdminInactive,

    #[error("Insufficient permissions: role {role}")]
    InsufficientRole { role: String },

    /// Super admins may not change or deactivate their own account
    #[error("Self-modification denied")]
    SelfModificationDenied,

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}
