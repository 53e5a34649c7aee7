//! Startup configuration read from the environment.
//!
//! Every key is looked up under its `MOVIES_` name first and its `CATALOG_`
//! name second. Unset keys fall back to defaults; malformed values are errors.

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_HTTP_QUEUE_CAPACITY_PER_WORKER: usize = 64;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}='{value}' (expected {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportRuntime {
    Std,
    Axum,
}

impl TransportRuntime {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Std => "std",
            Self::Axum => "axum",
        }
    }
}

/// Which status codes the movie routes answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCodeMode {
    /// 200 for the list route, 404 for an update of a missing id.
    #[default]
    Standard,
    /// 400 for the list route, 403 for an update of a missing id.
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub http_workers: usize,
    pub http_queue_capacity: usize,
    pub transport_runtime: TransportRuntime,
    pub seed: bool,
    pub status_codes: StatusCodeMode,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let http_workers = default_http_workers();
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            http_workers,
            http_queue_capacity: http_workers * DEFAULT_HTTP_QUEUE_CAPACITY_PER_WORKER,
            transport_runtime: TransportRuntime::Std,
            seed: true,
            status_codes: StatusCodeMode::Standard,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };
        let defaults = Self::default();

        let http_workers = env
            .parse::<usize>("HTTP_WORKERS", "a positive integer")?
            .filter(|workers| *workers > 0)
            .unwrap_or(defaults.http_workers);
        let http_queue_capacity = env
            .parse::<usize>("HTTP_QUEUE_CAPACITY", "a positive integer")?
            .filter(|capacity| *capacity > 0)
            .unwrap_or(http_workers * DEFAULT_HTTP_QUEUE_CAPACITY_PER_WORKER);

        let transport_runtime = match env.get("TRANSPORT_RUNTIME") {
            None => defaults.transport_runtime,
            Some((key, raw)) => match raw.trim().to_ascii_lowercase().as_str() {
                "std" => TransportRuntime::Std,
                "axum" => TransportRuntime::Axum,
                _ => return Err(invalid(key, raw, "std or axum")),
            },
        };

        let log_format = match env.get("LOG_FORMAT") {
            None => defaults.log_format,
            Some((key, raw)) => match raw.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(invalid(key, raw, "text or json")),
            },
        };

        let status_codes = if env.flag("REFERENCE_STATUS_CODES")?.unwrap_or(false) {
            StatusCodeMode::Reference
        } else {
            StatusCodeMode::Standard
        };

        let log_filter = env
            .get("LOG")
            .map(|(_, raw)| raw)
            .or_else(|| (env.lookup)("RUST_LOG"))
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            bind_addr: env
                .get("BIND")
                .map(|(_, raw)| raw)
                .unwrap_or(defaults.bind_addr),
            http_workers,
            http_queue_capacity,
            transport_runtime,
            seed: env.flag("SEED")?.unwrap_or(defaults.seed),
            status_codes,
            log_filter,
            log_format,
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Returns the key that matched together with its raw value.
    fn get(&self, suffix: &str) -> Option<(String, String)> {
        ["MOVIES_", "CATALOG_"].iter().find_map(|prefix| {
            let key = format!("{prefix}{suffix}");
            (self.lookup)(&key).map(|value| (key, value))
        })
    }

    fn parse<T: std::str::FromStr>(
        &self,
        suffix: &str,
        expected: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        match self.get(suffix) {
            None => Ok(None),
            Some((key, raw)) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| invalid(key, raw, expected)),
        }
    }

    fn flag(&self, suffix: &str) -> Result<Option<bool>, ConfigError> {
        match self.get(suffix) {
            None => Ok(None),
            Some((key, raw)) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(Some(true)),
                "0" | "false" | "no" | "off" => Ok(Some(false)),
                _ => Err(invalid(key, raw, "a boolean")),
            },
        }
    }
}

fn invalid(key: String, value: String, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value,
        expected,
    }
}

fn default_http_workers() -> usize {
    std::thread::available_parallelism()
        .map(|parallelism| parallelism.get().clamp(1, 32))
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.transport_runtime, TransportRuntime::Std);
        assert!(config.seed);
        assert_eq!(config.status_codes, StatusCodeMode::Standard);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.http_queue_capacity, config.http_workers * 64);
    }

    #[test]
    fn primary_prefix_wins_over_fallback() {
        let config = config_from(&[
            ("MOVIES_BIND", "0.0.0.0:9000"),
            ("CATALOG_BIND", "0.0.0.0:9999"),
            ("CATALOG_HTTP_WORKERS", "3"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.http_workers, 3);
        assert_eq!(config.http_queue_capacity, 192);
    }

    #[test]
    fn zero_workers_falls_back_to_default() {
        let config = config_from(&[("MOVIES_HTTP_WORKERS", "0")]).unwrap();
        assert!(config.http_workers >= 1);
    }

    #[test]
    fn parses_flags_and_runtime() {
        let config = config_from(&[
            ("MOVIES_TRANSPORT_RUNTIME", "AXUM"),
            ("MOVIES_SEED", "off"),
            ("MOVIES_REFERENCE_STATUS_CODES", "1"),
            ("MOVIES_LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.transport_runtime, TransportRuntime::Axum);
        assert!(!config.seed);
        assert_eq!(config.status_codes, StatusCodeMode::Reference);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn log_filter_falls_back_to_rust_log() {
        let config = config_from(&[("RUST_LOG", "movies=debug")]).unwrap();
        assert_eq!(config.log_filter, "movies=debug");
        let config =
            config_from(&[("RUST_LOG", "movies=debug"), ("MOVIES_LOG", "warn")]).unwrap();
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(
            config_from(&[("MOVIES_TRANSPORT_RUNTIME", "hyper")]),
            Err(ConfigError::InvalidValue {
                key: "MOVIES_TRANSPORT_RUNTIME".into(),
                value: "hyper".into(),
                expected: "std or axum",
            })
        );
        assert!(config_from(&[("CATALOG_HTTP_WORKERS", "many")]).is_err());
        assert!(config_from(&[("MOVIES_SEED", "maybe")]).is_err());
    }
}
