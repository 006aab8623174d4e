use clap::Parser;
use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, middleware::Tracing, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use std::sync::Arc;

use lifestyle_clinic_backend::api::{AdminApi, AdminAuthApi, AuthApi, HealthApi, HealthFormsApi};
use lifestyle_clinic_backend::app_data::AppData;
use lifestyle_clinic_backend::cli::{self, Cli, Command};
use lifestyle_clinic_backend::config::{init_logging, AppSettings};
use lifestyle_clinic_backend::middleware::error_shaping::shape_rejections;
use lifestyle_clinic_backend::middleware::RateLimit;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let args = Cli::parse();

    let settings = match AppSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database: {}", settings.database_url);

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let app_data = AppData::init(db, settings);

    app_data
        .admin_service
        .ensure_default_admin()
        .await
        .expect("Failed to seed default admin");

    match args.command.unwrap_or(Command::Serve) {
        Command::InitDb => {
            tracing::info!("Database is ready for use");
            Ok(())
        }
        Command::SeedSamples => {
            cli::seed_samples(&app_data)
                .await
                .expect("Failed to seed sample data");
            Ok(())
        }
        Command::Serve => serve(app_data).await,
    }
}

async fn serve(app_data: Arc<AppData>) -> Result<(), std::io::Error> {
    let settings = app_data.settings.clone();
    let debug = settings.debug_errors();
    let bind = settings.bind_address();

    let api_service = OpenApiService::new(
        (
            HealthApi::new(settings.environment.as_str().to_string()),
            AuthApi::new(app_data.auth_service.clone(), app_data.auth_gateway.clone(), debug),
            AdminAuthApi::new(app_data.admin_service.clone(), app_data.auth_gateway.clone(), debug),
            HealthFormsApi::new(app_data.form_service.clone(), app_data.auth_gateway.clone(), debug),
            AdminApi::new(
                app_data.form_service.clone(),
                app_data.user_store.clone(),
                app_data.auth_gateway.clone(),
                debug,
            ),
        ),
        "Lifestyle Clinic API",
        "1.0.0",
    )
    .server(format!("http://{}", bind));

    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/", api_service)
        .nest("/swagger", ui)
        .around(shape_rejections)
        .with(RateLimit(app_data.rate_limiter.clone()))
        .with(Tracing);

    tracing::info!("Lifestyle Clinic API listening on http://{}", bind);
    tracing::info!("Swagger UI available at http://{}/swagger", bind);

    Server::new(TcpListener::bind(bind))
        .run_with_graceful_shutdown(app, shutdown_signal(), None)
        .await
}

/// Resolve on SIGINT or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut signal) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            signal.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
