//! Pulling a hovering object down (or up) onto a freshly refined plane.

use crate::anchor::{AnchorId, PlaneAnchor};
use crate::constants::{
    ON_PLANE_EPSILON, PLANE_EXTENT_TOLERANCE, SNAP_ANIMATION_DURATION, SNAP_VERTICAL_ALLOWANCE,
};
use glam::Vec3;
use instant::Instant;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapDecision {
    NoObject,
    AlreadyOnPlane,
    /// The object is not above the tolerance-expanded extent.
    OutsideBounds,
    /// Too far above or below the plane to move without a visible jump.
    TooFar,
    Snap { target_y: f32 },
}

/// Decide whether an object at `object_position` (world space) should drop onto `anchor`.
pub fn evaluate_snap(anchor: &PlaneAnchor, object_position: Option<Vec3>) -> SnapDecision {
    let Some(world) = object_position else {
        return SnapDecision::NoObject;
    };
    let local = anchor.world_to_local(world);

    if local.y.abs() < ON_PLANE_EPSILON {
        return SnapDecision::AlreadyOnPlane;
    }
    if !anchor.bounds(PLANE_EXTENT_TOLERANCE).contains_xz(local) {
        return SnapDecision::OutsideBounds;
    }
    if local.y > -SNAP_VERTICAL_ALLOWANCE && local.y < SNAP_VERTICAL_ALLOWANCE {
        SnapDecision::Snap {
            target_y: anchor.world_height(),
        }
    } else {
        SnapDecision::TooFar
    }
}

/// Smoothstep ease-in/ease-out on [0, 1].
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Running vertical animation of the object onto a plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapAnimation {
    pub anchor: AnchorId,
    pub from_y: f32,
    pub to_y: f32,
    pub started: Instant,
    pub duration: Duration,
}

impl SnapAnimation {
    pub fn new(anchor: AnchorId, from_y: f32, to_y: f32, started: Instant) -> Self {
        Self {
            anchor,
            from_y,
            to_y,
            started,
            duration: SNAP_ANIMATION_DURATION,
        }
    }

    /// Height at `now`, and whether the animation has completed.
    pub fn sample(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration || self.duration.is_zero() {
            return (self.to_y, true);
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.from_y + (self.to_y - self.from_y) * ease_in_out(t), false)
    }
}
