// Service configuration read from the environment

use thiserror::Error;

use crate::auth::token::DEFAULT_EXPIRATION_SECS;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expiration_secs: i64,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from process environment variables
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required. `JWT_EXPIRATION_SECS`
    /// defaults to 24 hours, `HOST` to 0.0.0.0 and `PORT` to 8080.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let jwt_expiration_secs = match lookup("JWT_EXPIRATION_SECS") {
            Some(value) => match value.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_EXPIRATION_SECS",
                        value,
                    })
                }
            },
            None => DEFAULT_EXPIRATION_SECS,
        };

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: value.clone(),
            })?,
            None => 8080,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_secs,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    /// Address to bind the HTTP listener to
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/auth"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_expiration_secs, 86400);
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/auth"),
            ("JWT_SECRET", "secret"),
            ("JWT_EXPIRATION_SECS", "600"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_expiration_secs, 600);
        assert_eq!(config.addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_required_values() {
        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "secret")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));

        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/auth"),
            ("JWT_SECRET", ""),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/auth"),
            ("JWT_SECRET", "secret"),
            ("JWT_EXPIRATION_SECS", "-5"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "JWT_EXPIRATION_SECS", .. })));

        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/auth"),
            ("JWT_SECRET", "secret"),
            ("PORT", "http"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }
}
