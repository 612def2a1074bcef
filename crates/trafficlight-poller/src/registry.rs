//! Registry: append-only collection of pollers indexed by position.

use std::sync::{Arc, RwLock};

use tracing::info;

use trafficlight_core::{LightError, LightResult, LightSnapshot, Position};

use crate::checker::Transport;
use crate::poller::{CheckObserver, Poller};

/// Owns every [`Poller`] in creation order.
///
/// A poller's position always equals its index here; nothing is ever
/// removed, so positions are never reused.
pub struct Registry {
    pollers: RwLock<Vec<Arc<Poller>>>,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn CheckObserver>,
}

impl Registry {
    /// Create an empty registry whose pollers share `transport` and report
    /// to `observer`.
    pub fn new(transport: Arc<dyn Transport>, observer: Arc<dyn CheckObserver>) -> Self {
        Self {
            pollers: RwLock::new(Vec::new()),
            transport,
            observer,
        }
    }

    /// Register `url` at the next position and start polling it.
    ///
    /// Returns the assigned position.
    pub fn add_url(&self, url: impl Into<String>) -> Position {
        let url = url.into();
        let poller = {
            let mut pollers = self.pollers.write().unwrap();
            let position = pollers.len();
            let poller = Arc::new(Poller::new(
                url.clone(),
                position,
                Arc::clone(&self.transport),
                Arc::clone(&self.observer),
            ));
            pollers.push(Arc::clone(&poller));
            poller
        };

        // Started outside the write lock: the first result may call back
        // into `get` before this returns.
        poller.start_polling();

        let position = poller.position();
        info!(position, %url, "light added");
        position
    }

    /// The poller at `position`.
    pub fn get(&self, position: Position) -> LightResult<Arc<Poller>> {
        let pollers = self.pollers.read().unwrap();
        pollers
            .get(position)
            .cloned()
            .ok_or(LightError::OutOfRange {
                position,
                len: pollers.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.pollers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshots of every light in position order.
    pub fn snapshots(&self) -> Vec<LightSnapshot> {
        self.pollers
            .read()
            .unwrap()
            .iter()
            .map(|p| p.snapshot())
            .collect()
    }

    /// Stop every poller (for graceful shutdown).
    pub fn stop_all(&self) {
        let pollers = self.pollers.read().unwrap();
        for poller in pollers.iter() {
            poller.stop_polling();
        }
        info!(count = pollers.len(), "all pollers stopped");
    }
}
