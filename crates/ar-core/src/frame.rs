//! Per-tick data reported by the session frame source.
//!
//! The engine never talks to the tracking runtime directly. A driver copies the
//! pieces it needs into a [`FrameSnapshot`] once per render tick and hands it to
//! [`crate::Session::tick`].

use glam::{Mat4, Vec3};

/// Confidence classification of the current camera pose estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrackingState {
    #[default]
    Unavailable,
    Limited,
    Normal,
}

impl TrackingState {
    pub fn label(self) -> &'static str {
        match self {
            TrackingState::Unavailable => "unavailable",
            TrackingState::Limited => "limited",
            TrackingState::Normal => "normal",
        }
    }
}

/// Ambient light estimate as reported by the frame source, in lumens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightEstimate {
    pub ambient_intensity: f32,
}

/// Snapshot of the frame source for a single render tick.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub camera_transform: Mat4,
    pub tracking: TrackingState,
    pub light_estimate: Option<LightEstimate>,
    pub feature_points: Option<Vec<Vec3>>,
}

impl FrameSnapshot {
    pub fn new(camera_transform: Mat4, tracking: TrackingState) -> Self {
        Self {
            camera_transform,
            tracking,
            light_estimate: None,
            feature_points: None,
        }
    }

    #[inline]
    pub fn camera_position(&self) -> Vec3 {
        position_from_transform(&self.camera_transform)
    }
}

/// Translation component of a rigid world transform.
#[inline]
pub fn position_from_transform(transform: &Mat4) -> Vec3 {
    transform.w_axis.truncate()
}

/// Which tracking mode the frame source should run with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode {
    /// Six degrees of freedom with horizontal plane detection.
    World,
    /// Orientation only (3DOF). No planes, no positional tracking.
    OrientationOnly,
}

/// Configuration the frame source is asked to run with.
///
/// The engine emits a [`crate::SceneEvent::ConfigurationChanged`] whenever this
/// changes; the driver is expected to re-run its session with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackingConfiguration {
    pub mode: TrackingMode,
    pub light_estimation: bool,
}

impl TrackingConfiguration {
    pub fn world(light_estimation: bool) -> Self {
        Self {
            mode: TrackingMode::World,
            light_estimation,
        }
    }

    pub fn orientation_only(light_estimation: bool) -> Self {
        Self {
            mode: TrackingMode::OrientationOnly,
            light_estimation,
        }
    }

    #[inline]
    pub fn detects_planes(&self) -> bool {
        self.mode == TrackingMode::World
    }
}
