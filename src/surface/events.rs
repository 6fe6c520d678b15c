//! Change notifications emitted by the surface
//!
//! Events are delivered synchronously, inside the call that caused them, to every
//! subscribed [`SurfaceListener`].

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::geometry::Rect;
use super::tile_index::TileIndex;

/// What changed on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A tile was materialized. `rect` is its canvas-space square.
    TileAdded { index: TileIndex, rect: Rect },
    /// An existing tile was handed out for writing or its content changed
    TileUpdated { index: TileIndex, rect: Rect },
    /// A tile was discarded; the area now reads as transparent
    TileCleared { rect: Rect },
    /// Every tile was discarded
    SurfaceCleared,
}

impl SurfaceEvent {
    /// Canvas-space area affected, `None` for whole-surface events
    pub fn rect(&self) -> Option<Rect> {
        match self {
            SurfaceEvent::TileAdded { rect, .. }
            | SurfaceEvent::TileUpdated { rect, .. }
            | SurfaceEvent::TileCleared { rect } => Some(*rect),
            SurfaceEvent::SurfaceCleared => None,
        }
    }
}

/// Receiver of surface notifications
pub trait SurfaceListener {
    fn on_surface_event(&mut self, event: &SurfaceEvent);
}

impl<F: FnMut(&SurfaceEvent)> SurfaceListener for F {
    fn on_surface_event(&mut self, event: &SurfaceEvent) {
        self(event)
    }
}

/// Fan-out list of listeners
#[derive(Default)]
pub(crate) struct Listeners {
    listeners: Vec<Box<dyn SurfaceListener>>,
}

impl Listeners {
    pub fn push(&mut self, listener: Box<dyn SurfaceListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: SurfaceEvent) {
        for listener in &mut self.listeners {
            listener.on_surface_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[derive(Debug, Default)]
struct DirtyState {
    bounds: Rect,
    tiles: BTreeSet<TileIndex>,
    full_repaint: bool,
}

/// Accumulates changed areas between display refreshes.
///
/// Cloning gives another handle to the same state, so one clone can be subscribed
/// to the surface while the display layer keeps the other and drains it each frame.
#[derive(Debug, Clone, Default)]
pub struct DirtyRegion {
    state: Arc<Mutex<DirtyState>>,
}

/// Everything that changed since the last [`DirtyRegion::take`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySnapshot {
    /// Union of all changed rectangles
    pub bounds: Rect,
    /// Tiles added or updated
    pub tiles: BTreeSet<TileIndex>,
    /// Set when the whole surface was cleared
    pub full_repaint: bool,
}

impl DirtySnapshot {
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty() && self.tiles.is_empty() && !self.full_repaint
    }
}

impl DirtyRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state.lock();
        state.bounds.is_empty() && !state.full_repaint
    }

    /// Drain the accumulated changes
    pub fn take(&self) -> DirtySnapshot {
        let mut state = self.state.lock();
        let taken = std::mem::take(&mut *state);
        DirtySnapshot {
            bounds: taken.bounds,
            tiles: taken.tiles,
            full_repaint: taken.full_repaint,
        }
    }
}

impl SurfaceListener for DirtyRegion {
    fn on_surface_event(&mut self, event: &SurfaceEvent) {
        let mut state = self.state.lock();
        match *event {
            SurfaceEvent::TileAdded { index, rect } | SurfaceEvent::TileUpdated { index, rect } => {
                state.bounds = state.bounds.union(&rect);
                state.tiles.insert(index);
            }
            SurfaceEvent::TileCleared { rect } => {
                state.bounds = state.bounds.union(&rect);
            }
            SurfaceEvent::SurfaceCleared => {
                state.tiles.clear();
                state.full_repaint = true;
            }
        }
    }
}
