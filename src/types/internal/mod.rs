pub mod auth;
pub mod form;

pub use auth::{AdminActor, AdminRole, Claims};
pub use form::{FormFilter, FormStatus, Gender, MedicalSystem};
