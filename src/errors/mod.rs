// Error types: internal (store/service) and api (wire-facing)
pub mod api;
pub mod internal;

pub use api::{AdminError, AuthError, FormsError};
pub use internal::InternalError;
