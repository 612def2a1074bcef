//! Dispatcher: the single entry point between UI actions and the
//! registry/renderer pair.
//!
//! Pollers report through a [`CheckObserver`] that holds only a weak
//! reference back to the dispatcher, so the registry → poller → observer
//! chain never keeps the dispatcher alive on its own.

use std::sync::{Arc, Weak};

use tracing::debug;

use trafficlight_core::{LightError, LightResult, LightSnapshot, Position};
use trafficlight_poller::{CheckObserver, Registry, Transport};

use crate::renderer::Renderer;
use crate::views::DisplayRow;

struct DispatcherInner {
    registry: Registry,
    renderer: Renderer,
}

/// Forwards poller results to [`Dispatcher::on_check_complete`].
struct RenderObserver {
    inner: Weak<DispatcherInner>,
}

impl CheckObserver for RenderObserver {
    fn on_check_complete(&self, position: Position, times_checked: u64, url: &str) {
        match self.inner.upgrade() {
            Some(inner) => Dispatcher { inner }.on_check_complete(position, times_checked, url),
            None => debug!(position, "dispatcher gone; check result ignored"),
        }
    }
}

/// Owns the registry and renderer; cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<DispatcherInner>| {
            let observer = Arc::new(RenderObserver {
                inner: weak.clone(),
            });
            DispatcherInner {
                registry: Registry::new(transport, observer),
                renderer: Renderer::new(),
            }
        });
        Self { inner }
    }

    /// Register the URL typed into `input`, then clear the input.
    ///
    /// Surrounding whitespace is trimmed; blank input registers nothing.
    pub fn on_add_url(&self, input: &mut String) -> LightResult<Position> {
        let raw = std::mem::take(input);
        let url = raw.trim();
        if url.is_empty() {
            return Err(LightError::EmptyUrl);
        }
        Ok(self.inner.registry.add_url(url))
    }

    /// Called after every completed check; forwards to the renderer.
    ///
    /// `times_checked` is the count before this check, so `0` creates the
    /// light's row and anything greater updates it in place.
    pub fn on_check_complete(&self, position: Position, times_checked: u64, url: &str) {
        self.inner
            .renderer
            .render(&self.inner.registry, position, times_checked, url);
    }

    /// Replace the URL of the light at `position` and restart its polling.
    pub fn update_url(&self, position: Position, url: &str) -> LightResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LightError::EmptyUrl);
        }
        self.inner.registry.get(position)?.update_url(url);
        Ok(())
    }

    /// Snapshot of the light at `position`.
    pub fn light(&self, position: Position) -> LightResult<LightSnapshot> {
        Ok(self.inner.registry.get(position)?.snapshot())
    }

    /// Snapshots of every light in position order.
    pub fn lights(&self) -> Vec<LightSnapshot> {
        self.inner.registry.snapshots()
    }

    /// Rendered rows in display order.
    pub fn rows(&self) -> Vec<DisplayRow> {
        self.inner.renderer.rows()
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Stop every poller.
    pub fn shutdown(&self) {
        self.inner.registry.stop_all();
    }
}
