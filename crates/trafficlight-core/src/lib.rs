//! trafficlight-core: shared types for the traffic light monitor.
//!
//! Holds the per-URL [`LightRecord`], its [`LightStatus`], the error
//! taxonomy shared by the other crates, and the `trafficlight.toml`
//! configuration parser.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    parse_duration, ServerConfig, TrafficLightConfig, TransportConfig, DEFAULT_PORT,
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use error::{ConfigError, LightError, LightResult};
pub use types::*;
