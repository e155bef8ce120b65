//! Configuration management for the pet care backend
//!
//! Handles environment variables and application settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Timezone whose calendar defines "today" for expiry alerts
pub const DEFAULT_TIMEZONE: &str = "America/Argentina/Buenos_Aires";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Database URL
    pub database_url: String,

    /// Environment (development, production)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// IANA timezone name
    pub timezone: String,

    /// CORS origins (empty means allow all)
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite:petcare.db".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            cors_origins: vec![],
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("PETCARE_HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("PETCARE_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }

        if let Some(database_url) = lookup("PETCARE_DATABASE_URL") {
            config.database_url = database_url;
        }

        if let Some(environment) = lookup("PETCARE_ENVIRONMENT") {
            config.environment = environment;
        }

        if let Some(log_level) = lookup("PETCARE_LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Some(timezone) = lookup("PETCARE_TIMEZONE") {
            config.timezone = timezone;
        }

        if let Some(cors_origins) = lookup("PETCARE_CORS_ORIGINS") {
            config.cors_origins = cors_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }

        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        self.tz()?;

        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Log configuration (excluding sensitive data)
    pub fn log_config(&self) {
        info!("Configuration loaded:");
        info!("  Environment: {}", self.environment);
        info!("  Bind address: {}", self.bind_address());
        info!("  Database URL: {}", self.mask_database_url());
        info!("  Log level: {}", self.log_level);
        info!("  Timezone: {}", self.timezone);
        info!("  CORS origins: {:?}", self.cors_origins);
    }

    /// Mask credentials in the database URL for logging
    fn mask_database_url(&self) -> String {
        match self.database_url.split_once('?') {
            Some((path, _)) => format!("{path}?***"),
            None => self.database_url.clone(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Empty database URL")]
    EmptyDatabaseUrl,

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}
