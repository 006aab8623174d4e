// API layer - poem-openapi endpoint implementations
pub mod admin;
pub mod admin_auth;
pub mod auth;
pub mod health;
pub mod health_forms;
pub mod helpers;

pub use admin::AdminApi;
pub use admin_auth::AdminAuthApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use health_forms::HealthFormsApi;

use poem_openapi::auth::Bearer;
use poem_openapi::SecurityScheme;

/// JWT Bearer token authentication
///
/// A missing or malformed Authorization header is rejected with 401 before
/// the handler runs; token verification itself happens in the gateway.
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);
