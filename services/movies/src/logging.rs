use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServiceConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("initialize logging subscriber: {0}")]
    Install(String),
}

pub fn init(config: &ServiceConfig) -> Result<(), LoggingError> {
    let filter = resolve_filter(&config.log_filter)?;

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    }
    .map_err(|err| LoggingError::Install(err.to_string()))
}

fn resolve_filter(raw: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(raw.trim()).map_err(|err| LoggingError::InvalidFilter {
        filter: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_level_and_directive_filters() {
        assert!(resolve_filter("info").is_ok());
        assert!(resolve_filter("movies=debug,store=trace").is_ok());
    }

    #[test]
    fn rejects_malformed_filter() {
        let err = resolve_filter("movies=loud").unwrap_err();
        assert!(
            err.to_string().contains("invalid log filter"),
            "unexpected error: {err}"
        );
    }
}
