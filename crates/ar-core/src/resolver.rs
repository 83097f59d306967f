//! Screen point to world position, via a ranked cascade of hit tests.
//!
//! Tier order matters:
//! 1. existing plane anchors within their extents (authoritative)
//! 2. high-confidence feature points inside a narrow cone (remembered, not returned yet)
//! 3. an infinite horizontal plane through the previous object position, when
//!    requested and enabled, or when tier 2 found nothing
//! 4. the tier 2 feature result
//! 5. the nearest unfiltered feature point

use crate::anchor::AnchorId;
use crate::hit_test::{FeatureQuery, HitTestProvider};
use glam::{Vec2, Vec3};

/// Outcome of [`resolve`], tagged with the tier that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    Plane { position: Vec3, anchor: AnchorId },
    InfinitePlane { position: Vec3 },
    Feature { position: Vec3 },
    UnfilteredFeature { position: Vec3 },
    Miss,
}

impl Resolution {
    pub fn position(&self) -> Option<Vec3> {
        match *self {
            Resolution::Plane { position, .. }
            | Resolution::InfinitePlane { position }
            | Resolution::Feature { position }
            | Resolution::UnfilteredFeature { position } => Some(position),
            Resolution::Miss => None,
        }
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        match *self {
            Resolution::Plane { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    /// True for results lying on a real or assumed plane.
    pub fn hit_a_plane(&self) -> bool {
        matches!(self, Resolution::Plane { .. } | Resolution::InfinitePlane { .. })
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Resolution::Miss)
    }

    /// `(position, anchor, hit_a_plane)`
    pub fn into_parts(self) -> (Option<Vec3>, Option<AnchorId>, bool) {
        (self.position(), self.anchor(), self.hit_a_plane())
    }

    pub fn tier_label(&self) -> &'static str {
        match self {
            Resolution::Plane { .. } => "plane",
            Resolution::InfinitePlane { .. } => "infinite-plane",
            Resolution::Feature { .. } => "feature",
            Resolution::UnfilteredFeature { .. } => "unfiltered-feature",
            Resolution::Miss => "miss",
        }
    }
}

pub fn plane_tier(hits: &dyn HitTestProvider, screen_point: Vec2) -> Option<Resolution> {
    hits.hit_test_planes(screen_point)
        .first()
        .map(|h| Resolution::Plane {
            position: h.position,
            anchor: h.anchor,
        })
}

pub fn feature_tier(hits: &dyn HitTestProvider, screen_point: Vec2) -> Option<Resolution> {
    hits.hit_test_features_in_cone(screen_point, &FeatureQuery::HIGH_QUALITY)
        .first()
        .map(|h| Resolution::Feature { position: h.position })
}

pub fn infinite_plane_tier(
    hits: &dyn HitTestProvider,
    screen_point: Vec2,
    previous_object_position: Option<Vec3>,
) -> Option<Resolution> {
    let point_on_plane = previous_object_position.unwrap_or(Vec3::ZERO);
    hits.hit_test_infinite_plane(screen_point, point_on_plane)
        .map(|position| Resolution::InfinitePlane { position })
}

pub fn unfiltered_feature_tier(
    hits: &dyn HitTestProvider,
    screen_point: Vec2,
) -> Option<Resolution> {
    hits.hit_test_features(screen_point)
        .first()
        .map(|h| Resolution::UnfilteredFeature { position: h.position })
}

/// Resolve a screen point to the best available world position.
///
/// - `infinite_plane`: the caller would like the infinite plane considered (drags)
/// - `infinite_planes_enabled`: the user setting gating that preference
pub fn resolve(
    hits: &dyn HitTestProvider,
    screen_point: Vec2,
    previous_object_position: Option<Vec3>,
    infinite_plane: bool,
    infinite_planes_enabled: bool,
) -> Resolution {
    if let Some(plane) = plane_tier(hits, screen_point) {
        return plane;
    }

    let feature = feature_tier(hits, screen_point);

    if (infinite_plane && infinite_planes_enabled) || feature.is_none() {
        if let Some(on_plane) = infinite_plane_tier(hits, screen_point, previous_object_position) {
            return on_plane;
        }
    }

    if let Some(feature) = feature {
        return feature;
    }

    unfiltered_feature_tier(hits, screen_point).unwrap_or(Resolution::Miss)
}
