//! Outbound notifications for the scene graph, plane renderer, frame source and UI.
//!
//! Engine operations push these into a caller-owned `Vec`; the driver drains it
//! after each call and applies the mutations on its own side.

use crate::anchor::AnchorId;
use crate::frame::TrackingConfiguration;
use crate::object::ObjectCategory;
use crate::plane::Plane;
use glam::{Quat, Vec3};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    PlaneCreated(Plane),
    PlaneUpdated(Plane),
    PlaneRemoved(AnchorId),
    PlaneDebugVisibility {
        id: AnchorId,
        visible: bool,
    },

    /// The object was added to the scene root.
    ObjectAttached {
        category: ObjectCategory,
        position: Vec3,
    },
    ObjectMoved {
        position: Vec3,
    },
    ObjectTransformed {
        orientation: Quat,
        scale: f32,
    },
    ObjectDetached,
    /// An eased vertical move onto a plane has started.
    ObjectSnapStarted {
        anchor: AnchorId,
        from_y: f32,
        to_y: f32,
        duration: Duration,
    },

    /// Best world position under the screen center, refreshed every tick.
    FocusMoved {
        position: Vec3,
        anchor: Option<AnchorId>,
    },

    /// The frame source should re-run with this configuration.
    ConfigurationChanged(TrackingConfiguration),
    EnvironmentIntensity(f32),

    Notice(SessionNotice),
}

/// User-facing message for a tracking failure.
///
/// `allow_restart` distinguishes a dismissible notice with a restart option
/// from a blocking one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionNotice {
    pub title: String,
    pub message: String,
    pub allow_restart: bool,
}
