//! Registry of detected horizontal planes and their renderable counterparts.
//!
//! Every entry pairs a [`PlaneAnchor`] with the [`Plane`] built from it; the two
//! are inserted and destroyed together so a renderable plane never outlives its
//! anchor. Mutations push [`SceneEvent`]s for the plane rendering collaborator.

use crate::anchor::{AnchorId, PlaneAnchor};
use crate::events::SceneEvent;
use fnv::FnvHashMap;
use glam::{Mat4, Vec2, Vec3};

/// Renderable representation of a plane anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub anchor_id: AnchorId,
    pub center: Vec3,
    pub extent: Vec2,
    pub transform: Mat4,
    pub debug_visible: bool,
}

impl Plane {
    pub fn from_anchor(anchor: &PlaneAnchor, debug_visible: bool) -> Self {
        Self {
            anchor_id: anchor.id,
            center: anchor.center,
            extent: anchor.extent,
            transform: anchor.transform,
            debug_visible,
        }
    }

    pub fn update(&mut self, anchor: &PlaneAnchor) {
        self.center = anchor.center;
        self.extent = anchor.extent;
        self.transform = anchor.transform;
    }
}

struct PlaneEntry {
    anchor: PlaneAnchor,
    plane: Plane,
}

#[derive(Default)]
pub struct PlaneRegistry {
    entries: FnvHashMap<AnchorId, PlaneEntry>,
    debug_visuals: bool,
}

impl PlaneRegistry {
    pub fn new(debug_visuals: bool) -> Self {
        Self {
            entries: FnvHashMap::default(),
            debug_visuals,
        }
    }

    /// Register a newly observed surface. A known identity is treated as an update.
    pub fn add(&mut self, anchor: PlaneAnchor, out_events: &mut Vec<SceneEvent>) {
        if self.entries.contains_key(&anchor.id) {
            log::warn!("[planes] {} added twice; treating as update", anchor.id);
            self.update(anchor, out_events);
            return;
        }
        let plane = Plane::from_anchor(&anchor, self.debug_visuals);
        log::info!(
            "[planes] added {} extent=({:.2}x{:.2}) y={:.3}",
            anchor.id,
            anchor.extent.x,
            anchor.extent.y,
            anchor.world_height()
        );
        out_events.push(SceneEvent::PlaneCreated(plane.clone()));
        self.entries.insert(anchor.id, PlaneEntry { anchor, plane });
    }

    /// Refine a known surface in place. Unknown identities are ignored and return `false`.
    pub fn update(&mut self, anchor: PlaneAnchor, out_events: &mut Vec<SceneEvent>) -> bool {
        match self.entries.get_mut(&anchor.id) {
            Some(entry) => {
                entry.plane.update(&anchor);
                entry.anchor = anchor;
                out_events.push(SceneEvent::PlaneUpdated(entry.plane.clone()));
                true
            }
            None => {
                log::debug!("[planes] update for untracked {}", anchor.id);
                false
            }
        }
    }

    /// Destroy a surface together with its renderable plane.
    pub fn remove(
        &mut self,
        id: AnchorId,
        out_events: &mut Vec<SceneEvent>,
    ) -> Option<PlaneAnchor> {
        let entry = self.entries.remove(&id)?;
        log::info!("[planes] removed {}", id);
        out_events.push(SceneEvent::PlaneRemoved(id));
        Some(entry.anchor)
    }

    pub fn clear(&mut self, out_events: &mut Vec<SceneEvent>) {
        let mut ids: Vec<AnchorId> = self.entries.keys().copied().collect();
        ids.sort();
        for id in ids {
            self.remove(id, out_events);
        }
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&PlaneAnchor> {
        self.entries.get(&id).map(|e| &e.anchor)
    }

    pub fn plane(&self, id: AnchorId) -> Option<&Plane> {
        self.entries.get(&id).map(|e| &e.plane)
    }

    pub fn anchors(&self) -> impl Iterator<Item = &PlaneAnchor> {
        self.entries.values().map(|e| &e.anchor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn debug_visuals(&self) -> bool {
        self.debug_visuals
    }

    /// Toggle the debug overlay on every plane. Emits nothing when the flag is unchanged.
    pub fn set_debug_visuals(&mut self, visible: bool, out_events: &mut Vec<SceneEvent>) {
        if self.debug_visuals == visible {
            return;
        }
        self.debug_visuals = visible;
        for (id, entry) in self.entries.iter_mut() {
            entry.plane.debug_visible = visible;
            out_events.push(SceneEvent::PlaneDebugVisibility { id: *id, visible });
        }
    }
}
