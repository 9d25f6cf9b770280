use std::env;

use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// JWT_SECRET has no safe default and must always be provided
    #[error("JWT_SECRET environment variable must be set")]
    MissingJwtSecret,

    /// An environment variable held a value that does not parse
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime configuration, loaded once at startup
///
/// Every setting except the JWT secret has a development-friendly default;
/// production deployments override via the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub min_password_length: usize,
    pub notification_queue_depth: usize,
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, SettingsError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| SettingsError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://carevault.db?mode=rwc".to_string());
        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parse_var("PORT", 3000)?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| SettingsError::MissingJwtSecret)?;
        let jwt_expiration_hours = parse_var("JWT_EXPIRATION_HOURS", 24)?;
        let min_password_length = parse_var("MIN_PASSWORD_LENGTH", 6)?;
        let notification_queue_depth = parse_var("NOTIFICATION_QUEUE_DEPTH", 256)?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            jwt_secret,
            jwt_expiration_hours,
            min_password_length,
            notification_queue_depth,
        })
    }
}
