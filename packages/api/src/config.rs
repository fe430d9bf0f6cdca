//! Server configuration from the process environment.

use actors::WalkInConfig;
use db::DbConfig;

use crate::auth::StaffAuth;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the server needs to start the walk-in queue.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub walk_in: WalkInConfig,
    pub staff: StaffAuth,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db = match lookup("WALKIN_DB") {
            Some(endpoint) => DbConfig::endpoint(endpoint),
            // Railway deployment - use file-based storage
            None if lookup("RAILWAY_ENVIRONMENT").is_some() => DbConfig::file("./data/surrealdb"),
            None => DbConfig::memory(),
        };

        let mut walk_in = WalkInConfig::default();

        if let Some(raw) = lookup("WALKIN_DEFAULT_SERVICE_MINUTES") {
            let minutes = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|m| m.is_finite() && *m > 0.0)
                .ok_or(ConfigError::Invalid {
                    name: "WALKIN_DEFAULT_SERVICE_MINUTES",
                    expected: "a positive number",
                    value: raw.clone(),
                })?;
            walk_in = walk_in.with_default_service_minutes(minutes);
        }

        if let Some(raw) = lookup("WALKIN_RESET_CHECK_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid {
                    name: "WALKIN_RESET_CHECK_SECS",
                    expected: "a positive whole number of seconds",
                    value: raw.clone(),
                })?;
            walk_in = walk_in.with_reset_check_interval(secs);
        }

        let staff = StaffAuth::new(
            lookup("STAFF_USERNAME").unwrap_or_else(|| "admin".to_string()),
            lookup("STAFF_PASSWORD").unwrap_or_else(|| "admin123".to_string()),
            lookup("JWT_SECRET"),
        );

        Ok(Self { db, walk_in, staff })
    }
}
