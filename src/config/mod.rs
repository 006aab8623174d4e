// Configuration layer - env-backed settings and logging init
pub mod logging;
pub mod settings;

pub use logging::init_logging;
pub use settings::{AppSettings, Environment, SettingsError};
