//! # Map Position Synchronizer
//!
//! Headless model of the location picker map. The map never owns the
//! position: it renders the `center` its owner passes in and reports marker
//! drags back through `on_position_changed`. The owner commits the new value
//! and passes it back down, which must not bounce the viewport.

use std::fmt;

use hazard_domain::Position;
use tracing::debug;

/// Instruction for the map backend (Leaflet in the browser)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapCommand {
    /// Recenter the viewport and place the marker
    SetView { center: Position, zoom: u8 },
}

pub struct MapPositionSync {
    zoom: u8,
    /// What the viewport and marker currently show
    shown: Option<Position>,
    on_position_changed: Box<dyn FnMut(Position)>,
}

impl MapPositionSync {
    pub fn new(zoom: u8, on_position_changed: impl FnMut(Position) + 'static) -> Self {
        Self {
            zoom,
            shown: None,
            on_position_changed: Box::new(on_position_changed),
        }
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    pub const fn shown(&self) -> Option<Position> {
        self.shown
    }

    /// Reactive effect keyed on `(center, zoom)`: recenter whenever the
    /// owner's position differs from what the map shows. Runs on every
    /// change, not only at mount, because the map may mount before any
    /// position exists.
    pub fn sync(&mut self, center: Option<Position>) -> Option<MapCommand> {
        let Some(center) = center else {
            // cleared by the owner: the next position is new again
            self.shown = None;
            return None;
        };
        if self.shown == Some(center) {
            return None;
        }
        self.shown = Some(center);
        Some(MapCommand::SetView {
            center,
            zoom: self.zoom,
        })
    }

    /// Marker released at `released_at`: report it upward verbatim. The
    /// marker is already there, so the owner's echo of this value is a no-op
    /// in [`sync`](Self::sync).
    pub fn drag_end(&mut self, released_at: Position) {
        if let Some(previous) = self.shown {
            debug!(
                moved_km = previous.distance_to_km(&released_at),
                "marker dragged"
            );
        }
        self.shown = Some(released_at);
        (self.on_position_changed)(released_at);
    }
}

impl fmt::Debug for MapPositionSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapPositionSync")
            .field("zoom", &self.zoom)
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PICKER_ZOOM;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (MapPositionSync, Rc<RefCell<Vec<Position>>>) {
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let sync = MapPositionSync::new(PICKER_ZOOM, move |p| sink.borrow_mut().push(p));
        (sync, emitted)
    }

    #[test]
    fn test_mount_without_position_does_nothing() {
        let (mut sync, emitted) = recording();
        assert_eq!(sync.sync(None), None);
        assert!(sync.shown().is_none());
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn test_external_change_recenters() {
        let (mut sync, _) = recording();
        let first = Position::new(23.68, 86.95);
        assert_eq!(
            sync.sync(Some(first)),
            Some(MapCommand::SetView { center: first, zoom: 16 })
        );
        // same value again: effect key unchanged
        assert_eq!(sync.sync(Some(first)), None);

        let second = Position::new(22.57, 88.36);
        assert_eq!(
            sync.sync(Some(second)),
            Some(MapCommand::SetView { center: second, zoom: 16 })
        );
    }

    #[test]
    fn test_drag_reports_exact_coordinates_without_recenter() {
        let (mut sync, emitted) = recording();
        sync.sync(Some(Position::new(23.68, 86.95)));

        let dropped = Position::new(23.70, 86.96);
        sync.drag_end(dropped);
        assert_eq!(emitted.borrow().as_slice(), &[dropped]);

        // owner commits and passes the value back down
        assert_eq!(sync.sync(Some(dropped)), None);
        assert_eq!(sync.shown(), Some(dropped));
    }

    #[test]
    fn test_position_reset_then_reacquired() {
        let (mut sync, _) = recording();
        let p = Position::new(10.0, 20.0);
        sync.sync(Some(p));
        assert_eq!(sync.sync(None), None);
        assert_eq!(sync.shown(), None);

        // same coordinates as before the reset still recenter
        assert_eq!(
            sync.sync(Some(p)),
            Some(MapCommand::SetView { center: p, zoom: PICKER_ZOOM })
        );

        sync.sync(None);
        let q = Position::new(10.5, 20.5);
        assert!(sync.sync(Some(q)).is_some());
    }
}
