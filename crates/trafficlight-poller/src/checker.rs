//! Single-request check logic.
//!
//! A [`Transport`] performs one GET against a URL and collapses every
//! failure mode (DNS, refused connection, timeout, non-2xx, bad URL) into
//! [`CheckOutcome::Failure`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use trafficlight_core::{LightStatus, TrafficLightConfig};

/// Boxed future returned by [`Transport::get`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The URL answered with a 2xx status.
    Success,
    /// Anything else.
    Failure,
}

impl CheckOutcome {
    /// Status a light takes after this outcome.
    pub fn status(self) -> LightStatus {
        match self {
            CheckOutcome::Success => LightStatus::Ok,
            CheckOutcome::Failure => LightStatus::Error,
        }
    }
}

/// Issues the GET behind a check.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, CheckOutcome>;
}

/// HTTP(S) transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a per-request timeout.
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Build a transport from the `[transport]` section of the config.
    pub fn from_config(config: &TrafficLightConfig) -> anyhow::Result<Self> {
        let timeout = config.request_timeout()?;
        Ok(Self::new(timeout, config.user_agent())?)
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, CheckOutcome> {
        Box::pin(http_check(&self.client, url))
    }
}

/// Perform a GET against `url`.
///
/// Returns `Success` for a 2xx response and `Failure` otherwise. Redirects
/// are followed by the client before the status is classified.
pub async fn http_check(client: &reqwest::Client, url: &str) -> CheckOutcome {
    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => CheckOutcome::Success,
        Ok(resp) => {
            debug!(status = %resp.status(), %url, "check non-2xx");
            CheckOutcome::Failure
        }
        Err(e) if e.is_timeout() => {
            debug!(%url, "check timed out");
            CheckOutcome::Failure
        }
        Err(e) => {
            debug!(error = %e, %url, "check request failed");
            CheckOutcome::Failure
        }
    }
}
