//! trafficlight.toml configuration parser.
//!
//! ```toml
//! urls = ["https://example.com", "https://example.org/status"]
//!
//! [server]
//! port = 8080
//!
//! [transport]
//! timeout = "30s"
//! user_agent = "trafficlight/0.1"
//! ```
//!
//! The poll period is fixed; there is no setting for it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-request timeout applied by the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header sent with each check.
pub const DEFAULT_USER_AGENT: &str = concat!("trafficlight/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficLightConfig {
    /// URLs registered at startup, in position order.
    #[serde(default)]
    pub urls: Vec<String>,
    pub server: Option<ServerConfig>,
    pub transport: Option<TransportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub timeout: Option<String>,
    pub user_agent: Option<String>,
}

impl TrafficLightConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TrafficLightConfig = toml::from_str(content)?;
        // Reject a bad duration at load time.
        config.request_timeout()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.transport.as_ref().and_then(|t| t.timeout.as_deref()) {
            None => Ok(DEFAULT_TIMEOUT),
            // A zero timeout would fail every request.
            Some(raw) => parse_duration(raw)
                .filter(|timeout| !timeout.is_zero())
                .ok_or_else(|| ConfigError::Duration {
                    field: "transport.timeout",
                    value: raw.to_string(),
                }),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.transport
            .as_ref()
            .and_then(|t| t.user_agent.as_deref())
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
