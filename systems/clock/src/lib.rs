#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-timestep scheduling decoupled from the render frame rate.
//!
//! The driver forwards every render callback to [`FixedTickClock::frame`];
//! the clock decides whether a simulation step is due. Rendering smoothness
//! comes from [`RenderInterpolation`], which advances every frame and snaps
//! back to zero whenever a step executes.

use std::time::Duration;

use neon_snake_core::Event;

/// Default per-frame increment applied to the interpolation factor.
pub const DEFAULT_INTERPOLATION_INCREMENT: f32 = 0.2;

/// Scheduler that grants at most one simulation step per render frame.
///
/// This is deliberately not a catch-up loop: when more than one interval's
/// worth of time elapsed (a backgrounded tab, a debugger pause), a single
/// step executes and the reference timestamp resets to `now`. Lost time
/// becomes a brief slow-motion correction instead of a burst of ticks.
#[derive(Clone, Copy, Debug)]
pub struct FixedTickClock {
    interval: Duration,
    last_tick: Duration,
}

impl FixedTickClock {
    /// Creates a clock ticking at the provided interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Duration::ZERO,
        }
    }

    /// Interval currently separating simulation steps.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Re-anchors the clock, typically on game start or restart.
    pub fn reset(&mut self, now: Duration) {
        self.last_tick = now;
    }

    /// Adopts a new tick interval, typically after a speed ratchet.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Follows the session's event stream to keep the cadence current.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::SpeedRaised { interval } = event {
                self.interval = *interval;
            }
        }
    }

    /// Reports whether a single step is due for the frame at `now`.
    ///
    /// `now` is measured from the session epoch and must be monotonic;
    /// returning `true` consumes the elapsed time by resetting the
    /// reference to `now`.
    pub fn frame(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_tick) >= self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

/// Render interpolation factor advancing toward one between steps.
#[derive(Clone, Copy, Debug)]
pub struct RenderInterpolation {
    factor: f32,
    increment: f32,
}

impl RenderInterpolation {
    /// Creates a tracker advancing by `increment` per render frame.
    #[must_use]
    pub const fn new(increment: f32) -> Self {
        Self {
            factor: 0.0,
            increment,
        }
    }

    /// Current factor in `[0, 1]` for blending previous and current cells.
    #[must_use]
    pub const fn factor(&self) -> f32 {
        self.factor
    }

    /// Advances the factor by one frame's increment, clamped to one.
    pub fn advance(&mut self) {
        self.factor = (self.factor + self.increment).min(1.0);
    }

    /// Snaps the factor back to zero after a simulation step.
    pub fn reset(&mut self) {
        self.factor = 0.0;
    }

    /// Follows the session's event stream, resetting when the snake steps.
    pub fn observe(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::SnakeAdvanced { .. }))
        {
            self.factor = 0.0;
        }
    }
}

impl Default for RenderInterpolation {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPOLATION_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_clamps_at_one() {
        let mut interpolation = RenderInterpolation::new(0.4);
        for _ in 0..5 {
            interpolation.advance();
        }
        assert_eq!(interpolation.factor(), 1.0);
    }

    #[test]
    fn interval_follows_speed_events() {
        let mut clock = FixedTickClock::new(Duration::from_millis(120));
        clock.observe(&[Event::SpeedRaised {
            interval: Duration::from_millis(118),
        }]);
        assert_eq!(clock.interval(), Duration::from_millis(118));
    }
}
