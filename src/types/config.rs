//! Configuration structures.
//!
//! Configuration is loaded from environment variables or a JSON document.

use serde::{Deserialize, Serialize};

use super::errors::{Error, Result};

const ENV_INTROSPECTION: &str = "FDHANDLE_DESCRIPTOR_INTROSPECTION";
const ENV_TABLE_CAPACITY: &str = "FDHANDLE_TABLE_CAPACITY";
const ENV_LOG_FORMAT: &str = "FDHANDLE_LOG_FORMAT";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Host capability configuration.
    #[serde(default)]
    pub host: HostConfig,

    /// Handle table configuration.
    #[serde(default)]
    pub table: TableConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Host capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Force descriptor introspection on or off. `None` auto-detects.
    #[serde(default)]
    pub descriptor_introspection: Option<bool>,
}

/// Handle table configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of handle slots.
    #[serde(default = "default_table_capacity")]
    pub capacity: usize,
}

fn default_table_capacity() -> usize {
    1024
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: default_table_capacity(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Parse a JSON document. Missing sections take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load overrides from the process environment on top of defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides from an arbitrary key lookup on top of defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_INTROSPECTION) {
            config.host.descriptor_introspection = Some(parse_bool(ENV_INTROSPECTION, &raw)?);
        }

        if let Some(raw) = lookup(ENV_TABLE_CAPACITY) {
            config.table.capacity = raw.trim().parse().map_err(|_| {
                Error::config(format!("{} must be an integer, got {:?}", ENV_TABLE_CAPACITY, raw))
            })?;
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.observability.json_logs = raw.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be a boolean, got {:?}",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host.descriptor_introspection, None);
        assert_eq!(config.table.capacity, 1024);
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            Config::from_json(r#"{"host": {"descriptor_introspection": false}}"#).unwrap();
        assert_eq!(config.host.descriptor_introspection, Some(false));
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn test_from_json_empty_sections_take_defaults() {
        let config = Config::from_json(r#"{"table": {}, "observability": {}}"#).unwrap();
        assert_eq!(config, Config::default());

        let config = Config::from_json(r#"{"observability": {"json_logs": true}}"#).unwrap();
        assert_eq!(config.observability.log_level, "info");
        assert!(config.observability.json_logs);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_INTROSPECTION, "no"),
            (ENV_TABLE_CAPACITY, "16"),
            (ENV_LOG_FORMAT, "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.host.descriptor_introspection, Some(false));
        assert_eq!(config.table.capacity, 16);
        assert!(config.observability.json_logs);
    }

    #[test]
    fn test_from_lookup_bad_values() {
        let err = Config::from_lookup(lookup_from(&[(ENV_INTROSPECTION, "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[(ENV_TABLE_CAPACITY, "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
