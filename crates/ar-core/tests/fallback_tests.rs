// Sustained limited tracking downgrades the session to orientation-only.

mod common;

use ar_core::*;
use common::*;
use glam::Vec3;
use instant::Instant;
use std::time::Duration;

fn fallback_session() -> Session {
    Session::new(Settings {
        use_3dof_tracking_fallback: true,
        ..Settings::default()
    })
}

fn downgrades(events: &[SceneEvent]) -> usize {
    count(events, |e| {
        matches!(e, SceneEvent::ConfigurationChanged(c) if c.mode == TrackingMode::OrientationOnly)
    })
}

fn run(session: &mut Session, script: &[(u64, TrackingState)], t0: Instant) -> Vec<SceneEvent> {
    let hits = FakeHits::miss();
    let mut events = Vec::new();
    for &(ms, tracking) in script {
        let frame = frame_at(Vec3::ZERO, tracking);
        session.tick(&frame, &hits, CENTER, t0 + Duration::from_millis(ms), &mut events);
    }
    events
}

#[test]
fn recovery_before_the_deadline_keeps_world_tracking() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    let events = run(
        &mut session,
        &[
            (0, TrackingState::Normal),
            (1_000, TrackingState::Limited),
            (6_000, TrackingState::Limited),
            (9_000, TrackingState::Normal),
            (15_000, TrackingState::Normal),
            (30_000, TrackingState::Normal),
        ],
        t0,
    );
    assert_eq!(downgrades(&events), 0);
    assert_eq!(session.configuration().mode, TrackingMode::World);
    assert!(session.fallback().pending_timer().is_none());
}

#[test]
fn ten_seconds_limited_downgrades_exactly_once() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    let mut script = vec![(0, TrackingState::Normal)];
    script.extend((1..=30).map(|s| (s * 1_000, TrackingState::Limited)));
    let events = run(&mut session, &script, t0);

    assert_eq!(downgrades(&events), 1);
    assert_eq!(session.configuration(), TrackingConfiguration::orientation_only(true));
    assert!(!session.configuration().detects_planes());
}

#[test]
fn downgrade_fires_at_the_deadline_not_before() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    let events = run(
        &mut session,
        &[(0, TrackingState::Limited), (9_999, TrackingState::Limited)],
        t0,
    );
    assert_eq!(downgrades(&events), 0);
    let events = run(&mut session, &[(10_000, TrackingState::Limited)], t0);
    assert_eq!(downgrades(&events), 1);
}

#[test]
fn timer_due_before_a_recovery_report_still_fires() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    // The driver skipped frames; the next report after the deadline is Normal.
    let events = run(
        &mut session,
        &[(0, TrackingState::Limited), (12_000, TrackingState::Normal)],
        t0,
    );
    assert_eq!(downgrades(&events), 1);
}

#[test]
fn fallback_disabled_never_downgrades() {
    let mut session = Session::new(Settings::default());
    let t0 = Instant::now();
    let script: Vec<_> = (0..=30).map(|s| (s * 1_000, TrackingState::Limited)).collect();
    let events = run(&mut session, &script, t0);
    assert_eq!(downgrades(&events), 0);
}

#[test]
fn turning_the_setting_off_cancels_the_pending_timer() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    run(&mut session, &[(0, TrackingState::Limited)], t0);
    assert!(session.fallback().pending_timer().is_some());

    let mut events = Vec::new();
    session.apply_settings(Settings::default(), &mut events);
    assert!(session.fallback().pending_timer().is_none());

    let events = run(&mut session, &[(20_000, TrackingState::Limited)], t0);
    assert_eq!(downgrades(&events), 0);
}

#[test]
fn restart_returns_to_world_tracking() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    run(
        &mut session,
        &[(0, TrackingState::Limited), (10_000, TrackingState::Limited)],
        t0,
    );
    assert_eq!(session.configuration().mode, TrackingMode::OrientationOnly);

    let mut events = Vec::new();
    assert!(session.restart(t0 + Duration::from_secs(11), &mut events));
    assert_eq!(session.configuration().mode, TrackingMode::World);

    // Settings re-applied after the restart do not re-enter the degraded mode.
    session.apply_settings(*session.settings(), &mut events);
    assert_eq!(session.configuration().mode, TrackingMode::World);
}

#[test]
fn tracking_still_limited_after_restart_downgrades_again() {
    let mut session = fallback_session();
    let t0 = Instant::now();
    let events = run(
        &mut session,
        &[(0, TrackingState::Limited), (10_000, TrackingState::Limited)],
        t0,
    );
    assert_eq!(downgrades(&events), 1);

    let mut events = Vec::new();
    assert!(session.restart(t0 + Duration::from_secs(11), &mut events));
    assert_eq!(session.configuration().mode, TrackingMode::World);

    let script: Vec<_> = (12..=30).map(|s| (s * 1_000, TrackingState::Limited)).collect();
    let events = run(&mut session, &script, t0);
    assert_eq!(downgrades(&events), 1);
    assert_eq!(session.configuration().mode, TrackingMode::OrientationOnly);
}
