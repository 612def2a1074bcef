//! Domain types for a single monitored URL.

use serde::{Deserialize, Serialize};

/// Stable display slot of a light: its 0-based insertion index.
pub type Position = usize;

/// Reachability of a URL as seen by its most recent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightStatus {
    /// No check has resolved yet.
    #[default]
    Unchecked,
    /// The last check completed with a 2xx response.
    Ok,
    /// The last check failed (transport error, non-2xx, timeout).
    Error,
}

impl LightStatus {
    /// Token used by the display layer (`red-<token>`, `green-<token>`).
    pub fn token(self) -> &'static str {
        match self {
            LightStatus::Unchecked => "unchecked",
            LightStatus::Ok => "ok",
            LightStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for LightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Per-URL state owned by a poller.
///
/// `position` is fixed at creation; the URL may be replaced, and the
/// check counter only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightRecord {
    url: String,
    position: Position,
    times_checked: u64,
    status: LightStatus,
}

impl LightRecord {
    pub fn new(url: impl Into<String>, position: Position) -> Self {
        Self {
            url: url.into(),
            position,
            times_checked: 0,
            status: LightStatus::Unchecked,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn times_checked(&self) -> u64 {
        self.times_checked
    }

    pub fn status(&self) -> LightStatus {
        self.status
    }

    /// Replace the URL. Counter and status are left untouched.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_status(&mut self, status: LightStatus) {
        self.status = status;
    }

    /// Count one completed check.
    pub fn increment_checked(&mut self) {
        self.times_checked += 1;
    }

    pub fn snapshot(&self) -> LightSnapshot {
        LightSnapshot {
            position: self.position,
            url: self.url.clone(),
            times_checked: self.times_checked,
            status: self.status,
        }
    }
}

/// Serializable copy of a [`LightRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSnapshot {
    pub position: Position,
    pub url: String,
    pub times_checked: u64,
    pub status: LightStatus,
}
