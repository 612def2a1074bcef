//! Error types for the traffic light monitor.

use thiserror::Error;

/// Result type alias for registry and dispatcher operations.
pub type LightResult<T> = Result<T, LightError>;

/// Errors raised by registry lookups and UI actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LightError {
    #[error("no light at position {position} (registry holds {len})")]
    OutOfRange { position: usize, len: usize },

    #[error("url must not be empty")]
    EmptyUrl,
}

/// Errors raised while loading `trafficlight.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid duration {value:?} for {field}")]
    Duration { field: &'static str, value: String },
}
