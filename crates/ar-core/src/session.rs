//! The placement controller.
//!
//! [`Session`] owns the plane registry, the object slot, the fallback state
//! machine and the current tracking configuration. Drivers call into it from a
//! single thread: once per render tick with [`Session::tick`], and from their
//! plane, gesture, selection and failure callbacks. Every call pushes the
//! resulting scene mutations into the `out_events` vector it is given.
//!
//! Typical usage:
//! - Construct with `Session::new(settings)` and run the frame source with `configuration()`
//! - Call `tick(frame, hits, screen_center, now, &mut events)` every frame
//! - Forward plane callbacks to `plane_added` / `plane_updated` / `plane_removed`
//! - Use `select_object`, `drag_object` and `reset_object` for the object

use crate::anchor::{AnchorId, PlaneAnchor};
use crate::constants::{AMBIENT_INTENSITY_DIVISOR, DEFAULT_ENVIRONMENT_INTENSITY, RESTART_COOLDOWN};
use crate::error::SessionError;
use crate::events::{SceneEvent, SessionNotice};
use crate::fallback::{FallbackAction, TrackingFallback};
use crate::frame::{position_from_transform, FrameSnapshot, TrackingConfiguration};
use crate::hit_test::HitTestProvider;
use crate::object::{ObjectCategory, VirtualObject};
use crate::placement::{DistanceHistory, ObjectSlot, PlaceOutcome};
use crate::plane::PlaneRegistry;
use crate::resolver::{resolve, Resolution};
use crate::settings::Settings;
use crate::snap::{evaluate_snap, SnapAnimation, SnapDecision};
use glam::{Mat4, Quat, Vec2, Vec3};
use instant::Instant;

/// Distance to the camera and heading of the placed object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformReadout {
    pub distance: f32,
    pub yaw_degrees: i32,
}

pub struct Session {
    settings: Settings,
    configuration: TrackingConfiguration,
    planes: PlaneRegistry,
    slot: ObjectSlot,
    fallback: TrackingFallback,
    snap: Option<SnapAnimation>,
    camera_transform: Option<Mat4>,
    focus: Option<Resolution>,
    environment_intensity: f32,
    loading: Option<ObjectCategory>,
    /// Orientation-only tracking entered through the fallback timer; cleared by a restart.
    degraded: bool,
    halted: bool,
    restart_ready_at: Option<Instant>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let configuration = configuration_for(&settings, false);
        log::info!(
            "[session] starting mode={:?} light_estimation={} fallback={}",
            configuration.mode,
            configuration.light_estimation,
            settings.use_3dof_tracking_fallback
        );
        Self {
            settings,
            configuration,
            planes: PlaneRegistry::new(settings.debug_visuals),
            slot: ObjectSlot::new(),
            fallback: TrackingFallback::new(settings.use_3dof_tracking_fallback),
            snap: None,
            camera_transform: None,
            focus: None,
            environment_intensity: DEFAULT_ENVIRONMENT_INTENSITY,
            loading: None,
            degraded: false,
            halted: false,
            restart_ready_at: None,
        }
    }

    // ---------------- Accessors ----------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn configuration(&self) -> TrackingConfiguration {
        self.configuration
    }

    pub fn planes(&self) -> &PlaneRegistry {
        &self.planes
    }

    pub fn object(&self) -> Option<&VirtualObject> {
        self.slot.object()
    }

    pub fn distance_history(&self) -> &DistanceHistory {
        self.slot.history()
    }

    pub fn fallback(&self) -> &TrackingFallback {
        &self.fallback
    }

    pub fn focus(&self) -> Option<Resolution> {
        self.focus
    }

    pub fn focus_position(&self) -> Option<Vec3> {
        self.focus.and_then(|f| f.position())
    }

    pub fn environment_intensity(&self) -> f32 {
        self.environment_intensity
    }

    pub fn snap_in_progress(&self) -> Option<&SnapAnimation> {
        self.snap.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// True after an unrecoverable failure, until the next restart.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn camera_position(&self) -> Vec3 {
        self.camera_transform
            .as_ref()
            .map(position_from_transform)
            .unwrap_or(Vec3::ZERO)
    }

    // ---------------- Settings ----------------

    /// Apply settings read at startup or after the settings panel closes.
    pub fn apply_settings(&mut self, settings: Settings, out_events: &mut Vec<SceneEvent>) {
        self.fallback.set_enabled(settings.use_3dof_tracking_fallback);
        self.planes.set_debug_visuals(settings.debug_visuals, out_events);
        self.settings = settings;
        self.set_configuration(configuration_for(&settings, self.degraded), out_events);
    }

    fn set_configuration(
        &mut self,
        configuration: TrackingConfiguration,
        out_events: &mut Vec<SceneEvent>,
    ) {
        if configuration == self.configuration {
            return;
        }
        log::info!(
            "[session] configuration mode={:?} light_estimation={}",
            configuration.mode,
            configuration.light_estimation
        );
        self.configuration = configuration;
        out_events.push(SceneEvent::ConfigurationChanged(configuration));
    }

    // ---------------- Per-frame ----------------

    /// Advance one render tick: tracking state, lighting, focus resolution, snap animation.
    pub fn tick(
        &mut self,
        frame: &FrameSnapshot,
        hits: &dyn HitTestProvider,
        screen_center: Vec2,
        now: Instant,
        out_events: &mut Vec<SceneEvent>,
    ) {
        if self.halted {
            return;
        }
        self.camera_transform = Some(frame.camera_transform);

        if let Some(FallbackAction::DowngradeToOrientationOnly) =
            self.fallback.update(frame.tracking, now)
        {
            self.degraded = true;
            let configuration =
                TrackingConfiguration::orientation_only(self.settings.ambient_light_estimation);
            self.set_configuration(configuration, out_events);
        }

        self.update_lighting(frame, out_events);

        let focus = resolve(
            hits,
            screen_center,
            self.focus_position(),
            false,
            self.settings.drag_on_infinite_planes,
        );
        if let Some(position) = focus.position() {
            self.focus = Some(focus);
            out_events.push(SceneEvent::FocusMoved {
                position,
                anchor: focus.anchor(),
            });
        }

        self.advance_snap(now, out_events);
    }

    fn update_lighting(&mut self, frame: &FrameSnapshot, out_events: &mut Vec<SceneEvent>) {
        let intensity = match frame.light_estimate {
            Some(estimate) if self.configuration.light_estimation => {
                estimate.ambient_intensity / AMBIENT_INTENSITY_DIVISOR
            }
            _ => DEFAULT_ENVIRONMENT_INTENSITY,
        };
        if (intensity - self.environment_intensity).abs() > f32::EPSILON {
            self.environment_intensity = intensity;
            out_events.push(SceneEvent::EnvironmentIntensity(intensity));
        }
    }

    fn advance_snap(&mut self, now: Instant, out_events: &mut Vec<SceneEvent>) {
        let Some(anim) = self.snap else {
            return;
        };
        let Some(object) = self.slot.object_mut() else {
            self.snap = None;
            return;
        };
        let (y, done) = anim.sample(now);
        object.position.y = y;
        out_events.push(SceneEvent::ObjectMoved {
            position: object.position,
        });
        if done {
            self.snap = None;
        }
    }

    // ---------------- Planes ----------------

    pub fn plane_added(
        &mut self,
        anchor: PlaneAnchor,
        now: Instant,
        out_events: &mut Vec<SceneEvent>,
    ) {
        let id = anchor.id;
        self.planes.add(anchor, out_events);
        if !self.halted {
            self.check_snap(id, now, out_events);
        }
    }

    pub fn plane_updated(
        &mut self,
        anchor: PlaneAnchor,
        now: Instant,
        out_events: &mut Vec<SceneEvent>,
    ) {
        let id = anchor.id;
        if self.planes.update(anchor, out_events) && !self.halted {
            self.check_snap(id, now, out_events);
        }
    }

    pub fn plane_removed(&mut self, id: AnchorId, out_events: &mut Vec<SceneEvent>) {
        self.planes.remove(id, out_events);
    }

    fn check_snap(
        &mut self,
        id: AnchorId,
        now: Instant,
        out_events: &mut Vec<SceneEvent>,
    ) -> SnapDecision {
        let Some(anchor) = self.planes.anchor(id) else {
            return SnapDecision::NoObject;
        };
        let position = self.slot.object().map(|o| o.position);
        let decision = evaluate_snap(anchor, position);
        if let (SnapDecision::Snap { target_y }, Some(from)) = (decision, position) {
            log::debug!("[object] snapping onto {} y {:.3} -> {:.3}", id, from.y, target_y);
            let anim = SnapAnimation::new(id, from.y, target_y, now);
            out_events.push(SceneEvent::ObjectSnapStarted {
                anchor: id,
                from_y: from.y,
                to_y: target_y,
                duration: anim.duration,
            });
            self.snap = Some(anim);
        }
        decision
    }

    // ---------------- Object ----------------

    /// Start loading a model. Any placed object is reset first.
    ///
    /// Rejected while another load is running or the session is halted.
    pub fn begin_object_load(
        &mut self,
        category: ObjectCategory,
        out_events: &mut Vec<SceneEvent>,
    ) -> bool {
        if self.halted {
            log::warn!("[object] load of {} ignored; session halted", category.label());
            return false;
        }
        if self.loading.is_some() {
            log::warn!("[object] load of {} ignored; a load is in progress", category.label());
            return false;
        }
        self.reset_object(out_events);
        self.loading = Some(category);
        true
    }

    /// Finish the pending load and place the object at the focus position (or the origin).
    pub fn finish_object_load(&mut self, out_events: &mut Vec<SceneEvent>) -> PlaceOutcome {
        let Some(category) = self.loading.take() else {
            return PlaceOutcome::NoObject;
        };
        if self.halted {
            log::warn!("[object] dropping loaded {}; session halted", category.label());
            return PlaceOutcome::NoObject;
        }
        self.slot.insert(category, out_events);
        let target = self.focus_position().unwrap_or(Vec3::ZERO);
        self.move_object(Some(target), true, false, out_events)
    }

    /// Load and place in one step, for collaborators whose models are already resident.
    pub fn select_object(
        &mut self,
        category: ObjectCategory,
        out_events: &mut Vec<SceneEvent>,
    ) -> PlaceOutcome {
        if !self.begin_object_load(category, out_events) {
            return PlaceOutcome::NoObject;
        }
        self.finish_object_load(out_events)
    }

    pub fn reset_object(&mut self, out_events: &mut Vec<SceneEvent>) {
        self.snap = None;
        self.slot.reset(out_events);
    }

    /// Move the object toward `target`. See [`ObjectSlot::place`] for the outcomes.
    pub fn move_object(
        &mut self,
        target: Option<Vec3>,
        instantly: bool,
        smoothed: bool,
        out_events: &mut Vec<SceneEvent>,
    ) -> PlaceOutcome {
        if self.halted {
            return PlaceOutcome::Retained;
        }
        if target.is_some() {
            self.snap = None;
        }
        let camera = self.camera_position();
        self.slot.place(camera, target, instantly, smoothed, out_events)
    }

    /// Drag the object to whatever lies under `screen_point`.
    pub fn drag_object(
        &mut self,
        screen_point: Vec2,
        hits: &dyn HitTestProvider,
        smoothed: bool,
        out_events: &mut Vec<SceneEvent>,
    ) -> Resolution {
        if self.halted || self.slot.object().is_none() {
            return Resolution::Miss;
        }
        let previous = self.slot.object().map(|o| o.position);
        let resolution = resolve(
            hits,
            screen_point,
            previous,
            true,
            self.settings.drag_on_infinite_planes,
        );
        self.move_object(resolution.position(), false, smoothed, out_events);
        resolution
    }

    /// Spin the object around the world Y axis.
    pub fn rotate_object(&mut self, radians: f32, out_events: &mut Vec<SceneEvent>) {
        if self.halted {
            return;
        }
        if let Some(object) = self.slot.object_mut() {
            object.orientation = (Quat::from_rotation_y(radians) * object.orientation).normalize();
            out_events.push(SceneEvent::ObjectTransformed {
                orientation: object.orientation,
                scale: object.scale,
            });
        }
    }

    /// Multiply the object's uniform scale.
    ///
    /// Non-positive factors are ignored, as is any call while halted.
    pub fn scale_object(&mut self, factor: f32, out_events: &mut Vec<SceneEvent>) {
        if self.halted || factor <= 0.0 || !factor.is_finite() {
            return;
        }
        if let Some(object) = self.slot.object_mut() {
            object.scale *= factor;
            out_events.push(SceneEvent::ObjectTransformed {
                orientation: object.orientation,
                scale: object.scale,
            });
        }
    }

    pub fn object_transform_readout(&self) -> Option<TransformReadout> {
        let object = self.slot.object()?;
        let camera = self.camera_transform.as_ref().map(position_from_transform)?;
        Some(TransformReadout {
            distance: (camera - object.position).length(),
            yaw_degrees: object.yaw_degrees(),
        })
    }

    // ---------------- Failures and restart ----------------

    /// React to a frame source failure and return the notice for the UI layer.
    ///
    /// Recoverable failures restart the session right away. Unrecoverable ones
    /// halt placement until [`Session::restart`] succeeds.
    pub fn session_failed(
        &mut self,
        error: &SessionError,
        now: Instant,
        out_events: &mut Vec<SceneEvent>,
    ) -> SessionNotice {
        let recoverable = error.is_recoverable();
        let mut message = error.to_string();
        if recoverable {
            log::warn!("[session] {error}; restarting");
            message.push_str("\nYou can try resetting the session or quit the application.");
            self.perform_restart(now, out_events);
        } else {
            log::error!("[session] {error}; placement halted");
            message.push_str(
                "\nThis is an unrecoverable error that requires to quit the application.",
            );
            self.halted = true;
            self.snap = None;
        }
        let notice = SessionNotice {
            title: "We're sorry!".to_string(),
            message,
            allow_restart: recoverable,
        };
        out_events.push(SceneEvent::Notice(notice.clone()));
        notice
    }

    /// The frame source resumed after an interruption; tracking and anchors start over.
    pub fn interruption_ended(&mut self, now: Instant, out_events: &mut Vec<SceneEvent>) {
        log::info!("[session] interruption ended");
        self.perform_restart(now, out_events);
    }

    /// User-requested restart.
    ///
    /// Rejected while a model is loading or during the cooldown after the previous restart.
    pub fn restart(&mut self, now: Instant, out_events: &mut Vec<SceneEvent>) -> bool {
        if self.loading.is_some() {
            log::debug!("[session] restart ignored while loading");
            return false;
        }
        if self.restart_ready_at.is_some_and(|ready| now < ready) {
            log::debug!("[session] restart ignored during cooldown");
            return false;
        }
        self.perform_restart(now, out_events);
        true
    }

    fn perform_restart(&mut self, now: Instant, out_events: &mut Vec<SceneEvent>) {
        log::info!("[session] restarting");
        self.halted = false;
        self.reset_object(out_events);
        self.planes.clear(out_events);
        self.focus = None;
        self.fallback.reset();

        self.degraded = false;
        let configuration = TrackingConfiguration::world(self.settings.ambient_light_estimation);
        self.configuration = configuration;
        out_events.push(SceneEvent::ConfigurationChanged(configuration));

        self.restart_ready_at = Some(now + RESTART_COOLDOWN);
    }
}

fn configuration_for(settings: &Settings, degraded: bool) -> TrackingConfiguration {
    if settings.use_3dof_tracking || degraded {
        TrackingConfiguration::orientation_only(settings.ambient_light_estimation)
    } else {
        TrackingConfiguration::world(settings.ambient_light_estimation)
    }
}
