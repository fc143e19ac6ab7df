//! Runtime configuration for the backend.

use std::env;

/// Database URL used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:finanzas_personales.db";

/// Environment variable that overrides the database location.
pub const DATABASE_URL_ENV: &str = "FINANZAS_DATABASE_URL";

/// Connection settings for the finanzas database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// sqlx SQLite URL, e.g. `sqlite:finanzas_personales.db`
    pub database_url: String,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Read configuration from the environment, falling back to the
    /// default database file in the working directory.
    pub fn from_env() -> Self {
        let database_url =
            env::var(DATABASE_URL_ENV).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self { database_url }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}
