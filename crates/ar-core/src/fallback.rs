//! Degraded-tracking escalation.
//!
//! While tracking stays `Limited` for [`TRACKING_FALLBACK_DELAY`] the session is
//! switched to orientation-only tracking. The timer is a value owned by the
//! state machine. Starting cancels any pending timer first. Cancelling and
//! firing both take the timer out of the machine, so it fires at most once and
//! a cancelled timer is never treated as live.

use crate::constants::TRACKING_FALLBACK_DELAY;
use crate::frame::TrackingState;
use instant::Instant;
use std::time::Duration;

/// Identity of a scheduled fallback timer, unique per state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle(pub u64);

#[derive(Clone, Copy, Debug)]
struct FallbackTimer {
    handle: TimerHandle,
    deadline: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackAction {
    /// Switch the session to orientation-only tracking.
    DowngradeToOrientationOnly,
}

pub struct TrackingFallback {
    state: TrackingState,
    enabled: bool,
    delay: Duration,
    timer: Option<FallbackTimer>,
    next_handle: u64,
}

impl TrackingFallback {
    pub fn new(enabled: bool) -> Self {
        Self::with_delay(enabled, TRACKING_FALLBACK_DELAY)
    }

    pub fn with_delay(enabled: bool, delay: Duration) -> Self {
        Self {
            state: TrackingState::Unavailable,
            enabled,
            delay,
            timer: None,
            next_handle: 0,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.timer.map(|t| t.handle)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.deadline)
    }

    /// Enable or disable the fallback policy. Disabling drops a pending timer.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    /// Feed the tracking state reported for this tick.
    ///
    /// A timer that came due before this report fires first; then any
    /// transition is applied.
    pub fn update(&mut self, reported: TrackingState, now: Instant) -> Option<FallbackAction> {
        let fired = self.poll(now);
        if reported != self.state {
            log::info!(
                "[tracking] {} -> {}",
                self.state.label(),
                reported.label()
            );
            let previous = self.state;
            self.state = reported;
            if previous == TrackingState::Limited {
                self.cancel();
            }
            if reported == TrackingState::Limited && self.enabled {
                self.start(now);
            }
        }
        fired
    }

    /// Fire the pending timer if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<FallbackAction> {
        let timer = self.timer?;
        if now < timer.deadline || self.state != TrackingState::Limited {
            return None;
        }
        self.timer = None;
        log::warn!(
            "[tracking] limited for {:.0}s, falling back to orientation-only (timer {})",
            self.delay.as_secs_f32(),
            timer.handle.0
        );
        Some(FallbackAction::DowngradeToOrientationOnly)
    }

    /// Cancel the pending timer. Returns whether one was pending; repeated calls are no-ops.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                log::debug!("[tracking] fallback timer {} cancelled", timer.handle.0);
                true
            }
            None => false,
        }
    }

    /// Forget the tracked state and any pending timer. The next `Limited`
    /// report counts as entering `Limited`.
    pub fn reset(&mut self) {
        self.cancel();
        self.state = TrackingState::Unavailable;
    }

    fn start(&mut self, now: Instant) {
        self.cancel();
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timer = Some(FallbackTimer {
            handle,
            deadline: now + self.delay,
        });
        log::debug!(
            "[tracking] fallback timer {} armed for {:.0}s",
            handle.0,
            self.delay.as_secs_f32()
        );
    }
}
