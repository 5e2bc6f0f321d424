//! Tracing/logging initialization.
//!
//! `RUST_LOG` always wins over the configured default filter.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Logging setup knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    pub format: LogFormat,
    /// Include the event target (module path) in each line.
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            format: LogFormat::Json,
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    /// Read `AKSI_LOG_FILTER`, `AKSI_LOG_FORMAT`, `AKSI_LOG_TARGET`.
    ///
    /// Missing or malformed values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let default_filter = lookup("AKSI_LOG_FILTER")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_filter);
        let format = lookup("AKSI_LOG_FORMAT")
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or(defaults.format);
        let with_target = lookup("AKSI_LOG_TARGET")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(defaults.with_target);

        Self {
            default_filter,
            format,
            with_target,
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(config.with_target);

    // A second subscriber install fails; that is the no-op path.
    let _ = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
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
    fn empty_environment_yields_defaults() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ObservabilityConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[
            ("AKSI_LOG_FILTER", "aksi_order_wizard=debug"),
            ("AKSI_LOG_FORMAT", "pretty"),
            ("AKSI_LOG_TARGET", "true"),
        ]));
        assert_eq!(config.default_filter, "aksi_order_wizard=debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.with_target);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[
            ("AKSI_LOG_FILTER", "   "),
            ("AKSI_LOG_FORMAT", "xml"),
        ]));
        assert_eq!(config.default_filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn init_is_idempotent() {
        let config = ObservabilityConfig::default();
        init_with(&config);
        init_with(&config);
    }
}
