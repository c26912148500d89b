//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `WHISPER` prefix and
//! nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use whisper_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod moderation;
mod notifications;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use moderation::{ModerationConfig, ModerationProvider};
pub use notifications::NotificationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; in-memory storage when absent
    pub database: Option<DatabaseConfig>,

    /// Classifier backends and moderation policy
    #[serde(default)]
    pub moderation: ModerationConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `WHISPER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `WHISPER__MODERATION__MODELS=gemini-2.0-flash,gemini-1.5-pro` -> ordered list
    /// - `WHISPER__SERVER__CORS_ORIGINS=https://a.example,https://b.example` -> list
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WHISPER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("moderation.models")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(ref database) = self.database {
            database.validate()?;
        }
        self.moderation.validate()?;
        self.notifications.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
