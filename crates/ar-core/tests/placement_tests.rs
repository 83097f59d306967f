// Distance bounding and smoothing, directly and through the session.

mod common;

use ar_core::*;
use common::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn offsets_are_clamped_to_ten_metres() {
    assert_eq!(clamp_offset(Vec3::ZERO), Vec3::ZERO);

    let short = Vec3::new(0.0, 0.0, -9.999);
    assert_eq!(clamp_offset(short), short);

    let exact = Vec3::new(0.0, 0.0, -10.0);
    assert_eq!(clamp_offset(exact), exact);

    let long = Vec3::new(0.0, 0.0, -50.0);
    assert!((clamp_offset(long) - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5);

    let diagonal = Vec3::new(30.0, -20.0, -40.0);
    let clamped = clamp_offset(diagonal);
    assert!((clamped.length() - MAX_OBJECT_DISTANCE).abs() < 1e-4);
    assert!(clamped.normalize().dot(diagonal.normalize()) > 0.9999);
}

#[test]
fn clamp_holds_for_random_offsets() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let v = Vec3::new(
            rng.gen_range(-40.0..40.0),
            rng.gen_range(-40.0..40.0),
            rng.gen_range(-40.0..40.0),
        );
        let c = clamp_offset(v);
        assert!(c.length() <= MAX_OBJECT_DISTANCE + 1e-4, "{v:?} -> {c:?}");
        if v.length() <= MAX_OBJECT_DISTANCE {
            assert_eq!(c, v);
        }
    }
}

#[test]
fn far_targets_land_ten_metres_from_the_camera() {
    let mut filter = PlacementFilter::new();
    let camera = Vec3::new(1.0, 1.5, 2.0);
    let p = filter.place(camera, camera + Vec3::new(0.0, 0.0, -50.0), true, false);
    assert!((p - (camera + Vec3::new(0.0, 0.0, -10.0))).length() < 1e-4);

    let p = filter.place(camera, camera + Vec3::new(0.0, 0.0, -50.0), false, true);
    assert!(((p - camera).length() - 10.0).abs() < 1e-4);
    assert_eq!(filter.history().as_slice(), &[10.0]);
}

#[test]
fn history_keeps_the_ten_most_recent() {
    let mut filter = PlacementFilter::new();
    for d in 1..=11 {
        filter.place(Vec3::ZERO, Vec3::new(0.0, 0.0, -(d as f32)), false, true);
    }
    let expected: Vec<f32> = (2..=11).map(|d| d as f32).collect();
    assert_eq!(filter.history().as_slice(), expected.as_slice());
    assert_eq!(filter.history().len(), DISTANCE_HISTORY_LEN);
}

#[test]
fn constant_distance_averages_to_itself() {
    let mut filter = PlacementFilter::new();
    let mut last = Vec3::ZERO;
    for _ in 0..10 {
        last = filter.place(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.7), false, true);
    }
    assert_eq!(filter.history().average(), Some(3.7));
    assert!((last - Vec3::new(0.0, 0.0, -3.7)).length() < 1e-6);
}

#[test]
fn smoothing_keeps_direction_and_uses_mean_distance() {
    let mut filter = PlacementFilter::new();
    filter.place(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), false, true);
    let p = filter.place(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), false, true);
    // Mean of 2 and 4, along +X.
    assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn reset_forgets_old_distances() {
    let mut filter = PlacementFilter::new();
    for _ in 0..10 {
        filter.place(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), false, true);
    }
    filter.reset();
    let p = filter.place(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), false, true);
    assert_eq!(filter.history().average(), Some(1.0));
    assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
}

#[test]
fn session_reset_forgets_old_distances() {
    let mut session = Session::new(Settings::default());
    let mut events = Vec::new();
    let now = instant::Instant::now();
    session.tick(
        &frame_at(Vec3::ZERO, TrackingState::Normal),
        &FakeHits::miss(),
        CENTER,
        now,
        &mut events,
    );

    session.select_object(ObjectCategory::Chair, &mut events);
    for _ in 0..10 {
        session.move_object(Some(Vec3::new(0.0, 0.0, -5.0)), false, true, &mut events);
    }
    assert_eq!(session.distance_history().average(), Some(5.0));

    session.reset_object(&mut events);
    assert!(session.distance_history().is_empty());

    session.select_object(ObjectCategory::Chair, &mut events);
    session.move_object(Some(Vec3::new(0.0, 0.0, -1.0)), false, true, &mut events);
    assert_eq!(session.distance_history().average(), Some(1.0));
    let pos = session.object().map(|o| o.position).unwrap();
    assert!((pos - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
}

#[test]
fn smoothing_reduces_depth_jitter() {
    let mut rng = StdRng::seed_from_u64(42);
    let camera = Vec3::new(0.0, 1.4, 0.0);
    let direction = Vec3::new(0.0, -0.5, -1.0).normalize();

    let mut smoothed = PlacementFilter::new();
    let mut raw = PlacementFilter::new();
    let mut smoothed_depths = Vec::new();
    let mut raw_depths = Vec::new();

    for _ in 0..200 {
        let depth = 2.0 + rng.gen_range(-0.4..0.4);
        let target = camera + direction * depth;
        smoothed_depths.push((smoothed.place(camera, target, false, true) - camera).length());
        raw_depths.push((raw.place(camera, target, false, false) - camera).length());
    }

    let variance = |xs: &[f32]| {
        let mean = xs.iter().sum::<f32>() / xs.len() as f32;
        xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / xs.len() as f32
    };
    // Skip the warm-up window.
    let s = variance(&smoothed_depths[DISTANCE_HISTORY_LEN..]);
    let r = variance(&raw_depths[DISTANCE_HISTORY_LEN..]);
    assert!(s < r * 0.5, "smoothed {s} raw {r}");
}
