use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppSettings;
use crate::middleware::{RateLimitConfig, RateLimiter};
use crate::services::{AdminService, AuthGateway, AuthService, FormService, TokenService};
use crate::stores::{AdminStore, FormStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// Every store, service, and the rate limiter is created once here and shared
/// via `Arc`; nothing reads the environment or holds its own pool.
pub struct AppData {
    pub settings: AppSettings,
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub admin_store: Arc<AdminStore>,
    pub form_store: Arc<FormStore>,
    pub token_service: Arc<TokenService>,
    pub auth_gateway: Arc<AuthGateway>,
    pub auth_service: Arc<AuthService>,
    pub admin_service: Arc<AdminService>,
    pub form_service: Arc<FormService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppData {
    /// Wire up all stores and services over an already-migrated connection.
    pub fn init(db: DatabaseConnection, settings: AppSettings) -> Arc<Self> {
        tracing::debug!("Initializing application data");

        let user_store = Arc::new(UserStore::new(db.clone()));
        let admin_store = Arc::new(AdminStore::new(db.clone()));
        let form_store = Arc::new(FormStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret.clone(),
            settings.jwt_expires_hours,
        ));
        let auth_gateway = Arc::new(AuthGateway::new(token_service.clone(), admin_store.clone()));
        let auth_service = Arc::new(AuthService::new(user_store.clone(), token_service.clone()));
        let admin_service = Arc::new(AdminService::new(admin_store.clone(), token_service.clone()));
        let form_service = Arc::new(FormService::new(form_store.clone(), user_store.clone()));

        let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::from_settings(&settings)));

        tracing::debug!("Application data ready");

        Arc::new(Self {
            settings,
            db,
            user_store,
            admin_store,
            form_store,
            token_service,
            auth_gateway,
            auth_service,
            admin_service,
            form_service,
            rate_limiter,
        })
    }
}
