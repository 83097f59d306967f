use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use ar_core::{
    AnchorId, FrameHitTester, FrameSnapshot, LightEstimate, ObjectCategory, PlaneAnchor, SceneEvent,
    Session, SessionError, Settings, TrackingState, Viewport,
};
use glam::{Mat4, Vec2, Vec3};
use instant::Instant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TICK: Duration = Duration::from_millis(16);
const TICKS: u32 = 1_200;
const SCREEN: Vec2 = Vec2::new(390.0, 844.0);
const FOV_Y_DEG: f32 = 60.0;
const FLOOR_Y: f32 = 0.0;
const FEATURE_COUNT: usize = 400;
const SEED: u64 = 0x5EED;

// Script (tick numbers)
const PLANE_FOUND_AT: u32 = 60;
const OBJECT_SELECTED_AT: u32 = 90;
const PLANE_REFINED_AT: u32 = 120;
const DRAG: std::ops::RangeInclusive<u32> = 130..=180;
const LIMITED: std::ops::RangeInclusive<u32> = 300..=1_000; // ~11 s
const TRACKING_LOST_AT: u32 = 1_050;

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings =
        Settings::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(settings)
}

/// Noisy sparse points around the floor in front of the start pose.
fn feature_cloud(rng: &mut StdRng) -> Vec<Vec3> {
    (0..FEATURE_COUNT)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-1.5..1.5),
                FLOOR_Y + rng.gen_range(-0.02..0.02),
                rng.gen_range(-3.5..-0.5),
            )
        })
        .collect()
}

/// Hand-held camera: slight sway, pitched toward the floor.
fn camera_at(tick: u32) -> Mat4 {
    let t = tick as f32 * TICK.as_secs_f32();
    let sway = Vec3::new((t * 0.7).sin() * 0.15, 1.4 + (t * 1.3).sin() * 0.02, 0.3);
    Mat4::from_translation(sway)
        * Mat4::from_rotation_y((t * 0.4).sin() * 0.1)
        * Mat4::from_rotation_x(-35f32.to_radians())
}

fn floor(extent: Vec2) -> PlaneAnchor {
    PlaneAnchor::new(
        AnchorId(1),
        Vec3::ZERO,
        extent,
        Mat4::from_translation(Vec3::new(0.0, FLOOR_Y, -1.8)),
    )
}

fn event_kind(event: &SceneEvent) -> &'static str {
    match event {
        SceneEvent::PlaneCreated(_) => "plane-created",
        SceneEvent::PlaneUpdated(_) => "plane-updated",
        SceneEvent::PlaneRemoved(_) => "plane-removed",
        SceneEvent::PlaneDebugVisibility { .. } => "plane-debug",
        SceneEvent::ObjectAttached { .. } => "object-attached",
        SceneEvent::ObjectMoved { .. } => "object-moved",
        SceneEvent::ObjectTransformed { .. } => "object-transformed",
        SceneEvent::ObjectDetached => "object-detached",
        SceneEvent::ObjectSnapStarted { .. } => "object-snap",
        SceneEvent::FocusMoved { .. } => "focus-moved",
        SceneEvent::ConfigurationChanged(_) => "configuration",
        SceneEvent::EnvironmentIntensity(_) => "lighting",
        SceneEvent::Notice(_) => "notice",
    }
}

fn drain(events: &mut Vec<SceneEvent>, tally: &mut BTreeMap<&'static str, usize>) {
    for event in events.drain(..) {
        match &event {
            SceneEvent::ConfigurationChanged(c) => {
                log::info!(
                    "[driver] re-run frame source mode={:?} light={}",
                    c.mode,
                    c.light_estimation
                )
            }
            SceneEvent::Notice(n) => {
                log::warn!("[driver] {}: {}", n.title, n.message.replace('\n', " "))
            }
            SceneEvent::ObjectAttached { category, position } => {
                log::info!("[driver] {} placed at {:.2?}", category.label(), position)
            }
            SceneEvent::ObjectSnapStarted { anchor, to_y, .. } => {
                log::info!("[driver] snapping onto {} at y={:.3}", anchor, to_y)
            }
            other => log::trace!("[driver] {:?}", other),
        }
        *tally.entry(event_kind(&event)).or_default() += 1;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings_path = std::env::args().nth(1);
    let settings = load_settings(settings_path.as_deref().map(Path::new))?;
    log::info!("[driver] settings {}", settings.to_json()?.replace('\n', ""));

    let mut rng = StdRng::seed_from_u64(SEED);
    let cloud = feature_cloud(&mut rng);
    let mut session = Session::new(settings);
    let mut events = Vec::new();
    let mut tally = BTreeMap::new();
    let start = Instant::now();

    for tick in 0..TICKS {
        let now = start + TICK * tick;
        let camera = camera_at(tick);
        let tracking = match tick {
            0..=9 => TrackingState::Unavailable,
            t if LIMITED.contains(&t) => TrackingState::Limited,
            _ => TrackingState::Normal,
        };

        let detects_planes = session.configuration().detects_planes();
        if detects_planes && tick == PLANE_FOUND_AT {
            session.plane_added(floor(Vec2::new(0.8, 0.6)), now, &mut events);
        }
        if detects_planes && tick == PLANE_REFINED_AT {
            session.plane_updated(floor(Vec2::new(2.0, 1.6)), now, &mut events);
        }

        let mut frame = FrameSnapshot::new(camera, tracking);
        frame.light_estimate = Some(LightEstimate {
            ambient_intensity: 1000.0 + rng.gen_range(-50.0..50.0),
        });
        frame.feature_points = (tracking != TrackingState::Unavailable).then(|| cloud.clone());

        let viewport = Viewport::perspective(camera, FOV_Y_DEG.to_radians(), SCREEN);
        let anchors: Vec<PlaneAnchor> = session.planes().anchors().cloned().collect();
        let features = frame.feature_points.as_deref().unwrap_or(&[]);
        let hits = FrameHitTester::new(viewport, anchors.iter(), features);

        session.tick(&frame, &hits, viewport.center(), now, &mut events);

        if tick == OBJECT_SELECTED_AT {
            session.select_object(ObjectCategory::Chair, &mut events);
        }
        if DRAG.contains(&tick) {
            let progress = (tick - DRAG.start()) as f32 / (DRAG.end() - DRAG.start()) as f32;
            let point = viewport.center() + Vec2::new(progress * 80.0, progress * 60.0);
            let resolution = session.drag_object(point, &hits, true, &mut events);
            log::debug!("[driver] drag -> {}", resolution.tier_label());
        }
        if tick == *DRAG.end() {
            session.rotate_object(45f32.to_radians(), &mut events);
            session.scale_object(1.25, &mut events);
            if let Some(readout) = session.object_transform_readout() {
                log::info!(
                    "[driver] object {:.2} m away, yaw {}°",
                    readout.distance,
                    readout.yaw_degrees
                );
            }
        }
        if tick == TRACKING_LOST_AT {
            let error = SessionError::WorldTrackingFailed("relocalization failed".into());
            session.session_failed(&error, now, &mut events);
        }

        drain(&mut events, &mut tally);
    }

    log::info!(
        "[driver] done: planes={} object={} intensity={:.1}",
        session.planes().len(),
        session.object().map(|o| o.category.label()).unwrap_or("none"),
        session.environment_intensity()
    );
    for (kind, n) in &tally {
        log::info!("[driver] {kind:>18}: {n}");
    }
    Ok(())
}
