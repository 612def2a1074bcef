//! Renderer: keeps the display list in sync with check results.
//!
//! The display list is a sequence of wrappers, one per position, in the
//! order their first render happened. Each wrapper holds one replaceable
//! item. Updates swap the item inside its wrapper and never move the
//! wrapper, so a row stays where it first appeared no matter how often
//! it is re-rendered.

use std::sync::Mutex;

use tracing::warn;

use trafficlight_core::{LightResult, LightStatus, Position};
use trafficlight_poller::Registry;

use crate::views::{DisplayRow, LightView};

/// Live status lookup by position.
pub trait StatusSource {
    fn status_of(&self, position: Position) -> LightResult<LightStatus>;
}

impl StatusSource for Registry {
    fn status_of(&self, position: Position) -> LightResult<LightStatus> {
        Ok(self.get(position)?.status())
    }
}

/// Stable wrapper keyed by position.
#[derive(Debug)]
struct Wrapper {
    position: Position,
    item: LightView,
}

#[derive(Debug, Default)]
pub struct Renderer {
    display: Mutex<Vec<Wrapper>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project a light into the display list.
    ///
    /// The status is read live from `source`; only the URL and the check
    /// count travel as values. `times_checked == 0` creates the row,
    /// anything greater updates it in place.
    pub fn render(
        &self,
        source: &dyn StatusSource,
        position: Position,
        times_checked: u64,
        url: &str,
    ) {
        let status = match source.status_of(position) {
            Ok(status) => status,
            Err(e) => {
                warn!(position, error = %e, "render for unknown light");
                return;
            }
        };
        let item = LightView::new(position, status, url);

        let mut display = self.display.lock().unwrap();
        let index = display.iter().position(|w| w.position == position);

        match (times_checked, index) {
            (0, None) => display.push(Wrapper { position, item }),
            (_, Some(index)) => display[index].item = item,
            (_, None) => {
                warn!(position, times_checked, "no row to update; render dropped");
            }
        }
    }

    /// Rows in display order.
    pub fn rows(&self) -> Vec<DisplayRow> {
        self.display
            .lock()
            .unwrap()
            .iter()
            .map(|w| DisplayRow {
                position: w.position,
                item: w.item.clone(),
            })
            .collect()
    }

    /// Number of rows created so far.
    pub fn len(&self) -> usize {
        self.display.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
