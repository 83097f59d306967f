// Scripted hit-test provider and fixtures shared by the integration tests.

#![allow(dead_code)]

use ar_core::*;
use glam::{Mat4, Vec2, Vec3};
use std::cell::{Cell, RefCell};

/// Returns canned results per tier and records what the resolver asked for.
#[derive(Default)]
pub struct FakeHits {
    pub planes: Vec<PlaneHit>,
    pub cone: Vec<FeatureHit>,
    pub unfiltered: Vec<FeatureHit>,
    /// XZ of the infinite plane hit; Y comes from the plane point passed in.
    pub infinite_xz: Option<Vec2>,
    pub infinite_calls: Cell<usize>,
    pub last_plane_point: RefCell<Option<Vec3>>,
}

impl FakeHits {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn with_plane(mut self, position: Vec3, id: u64) -> Self {
        self.planes.push(PlaneHit {
            position,
            anchor: AnchorId(id),
            distance: position.length(),
        });
        self
    }

    pub fn with_cone_feature(mut self, position: Vec3) -> Self {
        self.cone.push(feature(position));
        self
    }

    pub fn with_unfiltered_feature(mut self, position: Vec3) -> Self {
        self.unfiltered.push(feature(position));
        self
    }

    pub fn with_infinite_plane(mut self, x: f32, z: f32) -> Self {
        self.infinite_xz = Some(Vec2::new(x, z));
        self
    }
}

pub fn feature(position: Vec3) -> FeatureHit {
    FeatureHit {
        position,
        feature: position,
        distance_to_origin: position.length(),
        distance_to_ray: 0.0,
    }
}

impl HitTestProvider for FakeHits {
    fn hit_test_planes(&self, _screen_point: Vec2) -> Vec<PlaneHit> {
        self.planes.clone()
    }

    fn hit_test_features_in_cone(
        &self,
        _screen_point: Vec2,
        _query: &FeatureQuery,
    ) -> Vec<FeatureHit> {
        self.cone.clone()
    }

    fn hit_test_features(&self, _screen_point: Vec2) -> Vec<FeatureHit> {
        self.unfiltered.clone()
    }

    fn hit_test_infinite_plane(&self, _screen_point: Vec2, point_on_plane: Vec3) -> Option<Vec3> {
        self.infinite_calls.set(self.infinite_calls.get() + 1);
        *self.last_plane_point.borrow_mut() = Some(point_on_plane);
        self.infinite_xz
            .map(|xz| Vec3::new(xz.x, point_on_plane.y, xz.y))
    }
}

pub const CENTER: Vec2 = Vec2::new(200.0, 400.0);

pub fn frame_at(camera: Vec3, tracking: TrackingState) -> FrameSnapshot {
    FrameSnapshot::new(Mat4::from_translation(camera), tracking)
}

pub fn floor_anchor(id: u64, height: f32, extent: Vec2) -> PlaneAnchor {
    PlaneAnchor::new(
        AnchorId(id),
        Vec3::ZERO,
        extent,
        Mat4::from_translation(Vec3::new(0.0, height, 0.0)),
    )
}

pub fn count<F: Fn(&SceneEvent) -> bool>(events: &[SceneEvent], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
