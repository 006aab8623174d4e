use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Deployment environment; gates raw error detail in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidVar { name: String, message: String },
}

/// Process-wide settings, loaded once at startup
///
/// Everything is injectable from here down: the database pool, the rate
/// limiter, and the token service are all built from these values rather
/// than reading the environment themselves.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_expires_hours: i64,
    pub environment: Environment,

    /// Fixed rate-limit window length
    pub rate_limit_window_secs: u64,

    /// Per-IP request budget per window, general routes
    pub rate_limit_max_requests: u32,

    /// Per-IP request budget per window, auth route families
    pub rate_limit_max_auth_requests: u32,
}

impl AppSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary lookup, for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SettingsError::MissingVar("JWT_SECRET".to_string()))?;

        let environment = match lookup("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(SettingsError::InvalidVar {
                    name: "APP_ENV".to_string(),
                    message: format!("expected development or production, got {}", other),
                })
            }
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://clinic.db?mode=rwc".to_string()),
            server_host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&lookup, "PORT", 5000)?,
            jwt_secret,
            jwt_expires_hours: parse_or(&lookup, "JWT_EXPIRES_HOURS", 168)?,
            environment,
            rate_limit_window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", 900)?,
            rate_limit_max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", 100)?,
            rate_limit_max_auth_requests: parse_or(&lookup, "RATE_LIMIT_MAX_AUTH_REQUESTS", 15)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Whether error envelopes may carry raw detail.
    pub fn debug_errors(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, SettingsError> {
    match lookup(name) {
        Some(raw) => raw.parse().map_err(|_| SettingsError::InvalidVar {
            name: name.to_string(),
            message: format!("could not parse {:?}", raw),
        }),
        None => Ok(default),
    }
}
