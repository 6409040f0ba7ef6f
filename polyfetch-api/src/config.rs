//! Server configuration from environment variables

use polyfetch_gamma::{DEFAULT_CATALOG_TIMEOUT, GAMMA_API_BASE};
use polyfetch_subgraph::{DEFAULT_LEDGER_TIMEOUT, SUBGRAPH_URL};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
    pub gamma_url: String,
    pub subgraph_url: String,
    pub catalog_timeout: Duration,
    pub ledger_timeout: Duration,
    /// When false, stats are always derived from prices
    pub ledger_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gamma_url: GAMMA_API_BASE.to_string(),
            subgraph_url: SUBGRAPH_URL.to_string(),
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            ledger_timeout: DEFAULT_LEDGER_TIMEOUT,
            ledger_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup; unset or blank variables keep their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            port: parse_var(&get, "SERVER_PORT")?.unwrap_or(defaults.port),
            gamma_url: get("GAMMA_API_URL").unwrap_or(defaults.gamma_url),
            subgraph_url: get("SUBGRAPH_URL").unwrap_or(defaults.subgraph_url),
            catalog_timeout: parse_var(&get, "CATALOG_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.catalog_timeout),
            ledger_timeout: parse_var(&get, "LEDGER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.ledger_timeout),
            ledger_enabled: match get("LEDGER_ENABLED") {
                Some(value) => parse_bool("LEDGER_ENABLED", &value)?,
                None => defaults.ledger_enabled,
            },
        })
    }
}

fn parse_var<T, F>(get: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                value,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.catalog_timeout, Duration::from_secs(30));
        assert_eq!(config.ledger_timeout, Duration::from_secs(60));
        assert!(config.ledger_enabled);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SERVER_PORT", "3001"),
            ("GAMMA_API_URL", "http://localhost:9000"),
            ("LEDGER_TIMEOUT_SECS", " 5 "),
            ("LEDGER_ENABLED", "false"),
            ("CATALOG_TIMEOUT_SECS", ""),
        ])
        .unwrap();

        assert_eq!(config.port, 3001);
        assert_eq!(config.gamma_url, "http://localhost:9000");
        assert_eq!(config.ledger_timeout, Duration::from_secs(5));
        assert_eq!(config.catalog_timeout, Duration::from_secs(30));
        assert!(!config.ledger_enabled);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = load(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "SERVER_PORT", .. }));

        assert!(load(&[("LEDGER_TIMEOUT_SECS", "-1")]).is_err());
        assert!(load(&[("LEDGER_ENABLED", "maybe")]).is_err());
    }
}
