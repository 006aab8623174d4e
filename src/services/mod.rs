// Service layer - orchestration between stores and the API surface
pub mod admin_service;
pub mod auth_gateway;
pub mod auth_service;
pub mod crypto;
pub mod form_service;
pub mod token_service;

pub use admin_service::AdminService;
pub use auth_gateway::AuthGateway;
pub use auth_service::AuthService;
pub use form_service::FormService;
pub use token_service::TokenService;
