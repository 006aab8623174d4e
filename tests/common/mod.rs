// Common test utilities for integration tests

use lifestyle_clinic_backend::api::BearerAuth;
use lifestyle_clinic_backend::config::AppSettings;
use lifestyle_clinic_backend::AppData;
use migration::{Migrator, MigratorTrait};
use poem_openapi::auth::Bearer;
use sea_orm::Database;
use std::sync::Arc;

/// Creates a fully wired AppData over an in-memory database.
pub async fn setup_app_data() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let settings = AppSettings::from_lookup(|name| match name {
        "JWT_SECRET" => Some("test-secret-key-minimum-32-characters-long".to_string()),
        _ => None,
    })
    .expect("Failed to build test settings");

    AppData::init(db, settings)
}

pub fn bearer(token: &str) -> BearerAuth {
    BearerAuth(Bearer {
        token: token.to_string(),
    })
}
