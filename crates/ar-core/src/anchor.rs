use glam::{Mat4, Vec2, Vec3};
use std::fmt;

/// Stable identity of a tracked physical surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

/// A detected horizontal surface.
///
/// - `center`: center of the detected extent in anchor-local space
/// - `extent`: width (local X) and depth (local Z) of the surface in meters
/// - `transform`: anchor-local to world transform; local Y is the surface normal
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneAnchor {
    pub id: AnchorId,
    pub center: Vec3,
    pub extent: Vec2,
    pub transform: Mat4,
}

/// Axis-aligned rectangle in the anchor's local XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl PlaneBounds {
    #[inline]
    pub fn contains_xz(&self, local: Vec3) -> bool {
        local.x >= self.min_x
            && local.x <= self.max_x
            && local.z >= self.min_z
            && local.z <= self.max_z
    }
}

impl PlaneAnchor {
    pub fn new(id: AnchorId, center: Vec3, extent: Vec2, transform: Mat4) -> Self {
        Self {
            id,
            center,
            extent,
            transform,
        }
    }

    /// World-space height of the anchor origin.
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.transform.w_axis.y
    }

    #[inline]
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.transform.inverse().transform_point3(world)
    }

    #[inline]
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.transform.transform_point3(local)
    }

    /// Extent rectangle grown by `tolerance` (a fraction of the extent) on every side.
    pub fn bounds(&self, tolerance: f32) -> PlaneBounds {
        let half = self.extent * 0.5;
        let pad = self.extent * tolerance;
        PlaneBounds {
            min_x: self.center.x - half.x - pad.x,
            max_x: self.center.x + half.x + pad.x,
            min_z: self.center.z - half.y - pad.y,
            max_z: self.center.z + half.y + pad.y,
        }
    }
}
