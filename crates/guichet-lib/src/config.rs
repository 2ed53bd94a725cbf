// ============================
// guichet-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::AppError;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Secret that keys session token digests. There is no default: the
    /// server refuses to start without one.
    #[serde(default)]
    pub session_secret: String,
    /// Session TTL in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_database_path() -> PathBuf {
    PathBuf::from("guichet.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_ttl_secs() -> u64 {
    60 * 60 * 24 * 7 // 7 days
}

impl Settings {
    /// Load settings from `config.toml` merged with `GUICHET_`-prefixed
    /// environment variables.
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit TOML file, still merged with the
    /// environment.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed("GUICHET_")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, AppError> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.session_secret.trim().is_empty() {
            return Err(AppError::Config(
                "session_secret is not set; refusing to start without one".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Settings, AppError> {
        Settings::from_figment(Figment::new().merge(Toml::string(toml)))
    }

    #[test]
    fn minimal_config_only_needs_a_secret() {
        let settings = from_toml(r#"session_secret = "s3cret-s3cret""#).unwrap();
        assert_eq!(settings.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(settings.database_path, PathBuf::from("guichet.db"));
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.session_ttl_secs, 60 * 60 * 24 * 7);
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = from_toml(r#"log_level = "debug""#).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn blank_secret_is_fatal() {
        let err = from_toml(r#"session_secret = "   ""#).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let settings = from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            database_path = "/var/lib/guichet/users.db"
            log_level = "debug"
            session_secret = "s3cret-s3cret"
            session_ttl_secs = 3600
            "#,
        )
        .unwrap();
        assert_eq!(settings.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.session_ttl_secs, 3600);
        assert_eq!(settings.log_level, "debug");
    }
}
