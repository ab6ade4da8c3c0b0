//! Environment configuration for the grocery server.
//!
//! | Variable       | Default                 |
//! |----------------|-------------------------|
//! | `PORT`         | `5000`                  |
//! | `DATABASE_URL` | required                |
//! | `CORS_ORIGIN`  | `http://localhost:3000` |

use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

pub const PORT_VAR: &str = "PORT";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const CORS_ORIGIN_VAR: &str = "CORS_ORIGIN";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {key} is required")]
    Missing { key: String },

    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings consumed by the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub cors_origin: String,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = try_load(&lookup, PORT_VAR, DEFAULT_PORT)?;

        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                key: DATABASE_URL_VAR.to_string(),
            })?;

        let cors_origin = lookup(CORS_ORIGIN_VAR).unwrap_or_else(|| {
            info!("{CORS_ORIGIN_VAR} not set, using default: {DEFAULT_CORS_ORIGIN}");
            DEFAULT_CORS_ORIGIN.to_string()
        });

        Ok(Self {
            port,
            database_url,
            cors_origin,
        })
    }

    /// Socket address to bind.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                value,
                reason: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[(DATABASE_URL_VAR, "memory://groceries")]))
                .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, "memory://groceries");
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_explicit_values() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (PORT_VAR, "8080"),
            (DATABASE_URL_VAR, "memory://groceries"),
            (CORS_ORIGIN_VAR, "https://groceries.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, "https://groceries.example.com");
    }

    #[test]
    fn test_database_url_is_required() {
        let error = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Missing {
                key: DATABASE_URL_VAR.to_string()
            }
        );

        let error =
            ServerConfig::from_lookup(lookup_from(&[(DATABASE_URL_VAR, "  ")])).unwrap_err();
        assert!(matches!(error, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_invalid_port() {
        let error = ServerConfig::from_lookup(lookup_from(&[
            (PORT_VAR, "not-a-port"),
            (DATABASE_URL_VAR, "memory://groceries"),
        ]))
        .unwrap_err();

        assert!(matches!(error, ConfigError::Invalid { ref key, .. } if key == PORT_VAR));
    }
}
