use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    DEFAULT_EQUITY_API_BASE_URL, DEFAULT_EQUITY_API_TIMEOUT_SECONDS, DatabaseSettings,
    EquityApiSettings, RawDatabaseSettings, RawEquityApiSettings,
};

/// Loads the database settings from the `DB_*` environment variables.
///
/// Callers are expected to have loaded any `.env` file beforehand; this crate
/// only reads what is already in the process environment.
pub fn load_database_settings() -> Result<DatabaseSettings, ConfigError> {
    let settings = DatabaseSettings::from_env()?;
    tracing::debug!(settings = ?settings, "Loaded database settings.");
    Ok(settings)
}

/// Loads the market-data client settings from the `EQUITY_API_*` environment variables.
pub fn load_equity_api_settings() -> Result<EquityApiSettings, ConfigError> {
    let settings = EquityApiSettings::from_env()?;
    tracing::debug!(base_url = settings.base_url(), "Loaded equity API settings.");
    Ok(settings)
}
