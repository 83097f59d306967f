//! Distance smoothing and bounding for the placed object.
//!
//! Feature-point hit tests are noisy along the viewing ray, which shows up as
//! the object popping nearer and farther. The filter averages only the
//! camera-to-object *distance* over a short window and keeps the direction
//! untouched, so lateral motion stays responsive. Every placement is also
//! clamped to [`MAX_OBJECT_DISTANCE`] from the camera, smoothed or not.

use crate::constants::{DISTANCE_HISTORY_LEN, MAX_OBJECT_DISTANCE};
use crate::events::SceneEvent;
use crate::object::{ObjectCategory, VirtualObject};
use glam::Vec3;
use smallvec::SmallVec;

/// Bounded FIFO of recent camera-to-object distances, oldest first.
#[derive(Clone, Debug, Default)]
pub struct DistanceHistory {
    values: SmallVec<[f32; DISTANCE_HISTORY_LEN]>,
}

impl DistanceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a distance, evicting the oldest once the window is full.
    pub fn push(&mut self, distance: f32) {
        if self.values.len() == DISTANCE_HISTORY_LEN {
            self.values.remove(0);
        }
        self.values.push(distance);
    }

    /// Arithmetic mean of the window, `None` when empty.
    pub fn average(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        // f64 keeps the mean of identical samples exactly equal to the sample.
        let sum: f64 = self.values.iter().map(|&d| d as f64).sum();
        Some((sum / self.values.len() as f64) as f32)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Limit a camera-relative offset to [`MAX_OBJECT_DISTANCE`].
///
/// Longer offsets are shortened, never rejected.
#[inline]
pub fn clamp_offset(offset: Vec3) -> Vec3 {
    offset.clamp_length_max(MAX_OBJECT_DISTANCE)
}

#[derive(Clone, Debug, Default)]
pub struct PlacementFilter {
    history: DistanceHistory,
}

impl PlacementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the object's new world position for a placement toward `target`.
    ///
    /// - `instantly`: a fresh placement; the history is cleared and the clamped target is used
    /// - otherwise the clamped distance joins the history and, when `smoothed`,
    ///   the offset is rescaled to the history mean
    pub fn place(
        &mut self,
        camera_position: Vec3,
        target: Vec3,
        instantly: bool,
        smoothed: bool,
    ) -> Vec3 {
        let offset = clamp_offset(target - camera_position);
        if instantly {
            self.history.clear();
            return camera_position + offset;
        }

        self.history.push(offset.length());
        if !smoothed {
            return camera_position + offset;
        }
        let mean = self.history.average().unwrap_or_else(|| offset.length());
        camera_position + offset.normalize_or_zero() * mean
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &DistanceHistory {
        &self.history
    }
}

/// Result of a placement request against the object slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaceOutcome {
    Placed(Vec3),
    /// No target was resolved; the object keeps its current state.
    Retained,
    /// Nothing is placed and nothing was resolved; the slot was reset.
    Reset,
    /// A target arrived before any object exists.
    NoObject,
}

/// Exclusive owner of the placed object and the distance history it feeds.
#[derive(Clone, Debug, Default)]
pub struct ObjectSlot {
    object: Option<VirtualObject>,
    filter: PlacementFilter,
}

impl ObjectSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self) -> Option<&VirtualObject> {
        self.object.as_ref()
    }

    pub fn object_mut(&mut self) -> Option<&mut VirtualObject> {
        self.object.as_mut()
    }

    pub fn history(&self) -> &DistanceHistory {
        self.filter.history()
    }

    /// Replace the slot content with a fresh, detached object.
    pub fn insert(&mut self, category: ObjectCategory, out_events: &mut Vec<SceneEvent>) {
        self.reset(out_events);
        log::info!("[object] loaded {}", category.label());
        self.object = Some(VirtualObject::new(category));
    }

    /// Detach the object, drop it, then forget its distance history.
    pub fn reset(&mut self, out_events: &mut Vec<SceneEvent>) {
        if let Some(object) = self.object.as_mut() {
            if object.attached {
                object.attached = false;
                out_events.push(SceneEvent::ObjectDetached);
            }
            log::info!("[object] reset {}", object.category.label());
        }
        self.object = None;
        self.filter.reset();
    }

    /// Move the object toward `target`.
    ///
    /// The first instant placement attaches it to the scene root.
    pub fn place(
        &mut self,
        camera_position: Vec3,
        target: Option<Vec3>,
        instantly: bool,
        smoothed: bool,
        out_events: &mut Vec<SceneEvent>,
    ) -> PlaceOutcome {
        let Some(target) = target else {
            if self.object.is_none() {
                self.reset(out_events);
                return PlaceOutcome::Reset;
            }
            return PlaceOutcome::Retained;
        };
        let Some(object) = self.object.as_mut() else {
            return PlaceOutcome::NoObject;
        };

        let position = self.filter.place(camera_position, target, instantly, smoothed);
        object.position = position;
        if instantly && !object.attached {
            object.attached = true;
            out_events.push(SceneEvent::ObjectAttached {
                category: object.category,
                position,
            });
        } else {
            out_events.push(SceneEvent::ObjectMoved { position });
        }
        PlaceOutcome::Placed(position)
    }
}
