//! trafficlight-poller: reachability polling for the traffic light monitor.
//!
//! Each registered URL gets a [`Poller`] that owns its
//! [`LightRecord`](trafficlight_core::LightRecord) and runs a background
//! task: one check immediately, then one every [`POLL_INTERVAL`].
//!
//! # Architecture
//!
//! ```text
//! Registry (append-only, indexed by position)
//!   └── Poller (one per URL)
//!       ├── background task: interval tick → Transport::get → CheckOutcome
//!       ├── LightRecord (status, times_checked)
//!       └── CheckObserver::on_check_complete(position, times_checked, url)
//! ```
//!
//! A check result sets the status, notifies the observer with the counter
//! value from *before* the check, and only then increments the counter.
//! There is no retry or backoff: the next tick is the retry.

pub mod checker;
pub mod poller;
pub mod registry;

pub use checker::{BoxFuture, CheckOutcome, HttpTransport, Transport};
pub use poller::{CheckObserver, Poller, POLL_INTERVAL};
pub use registry::Registry;
