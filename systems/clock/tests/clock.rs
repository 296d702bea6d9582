use std::time::Duration;

use neon_snake_core::{Cell, Event};
use neon_snake_system_clock::{FixedTickClock, RenderInterpolation};

#[test]
fn no_step_is_due_before_the_interval_elapses() {
    let mut clock = FixedTickClock::new(Duration::from_millis(120));
    clock.reset(Duration::ZERO);

    assert!(!clock.frame(Duration::from_millis(60)));
    assert!(!clock.frame(Duration::from_millis(119)));
    assert!(clock.frame(Duration::from_millis(120)));
}

#[test]
fn a_long_gap_yields_exactly_one_step() {
    let mut clock = FixedTickClock::new(Duration::from_millis(100));
    clock.reset(Duration::ZERO);

    // Ten intervals passed while the tab was backgrounded; the policy is a
    // single step with the reference re-anchored at the frame timestamp.
    assert!(clock.frame(Duration::from_millis(1000)));
    assert!(!clock.frame(Duration::from_millis(1050)));
    assert!(clock.frame(Duration::from_millis(1100)));
}

#[test]
fn reset_reanchors_the_reference_timestamp() {
    let mut clock = FixedTickClock::new(Duration::from_millis(100));
    clock.reset(Duration::ZERO);
    assert!(clock.frame(Duration::from_millis(100)));

    clock.reset(Duration::from_millis(500));
    assert!(!clock.frame(Duration::from_millis(550)));
    assert!(clock.frame(Duration::from_millis(600)));
}

#[test]
fn steps_track_a_ratcheting_interval() {
    let mut clock = FixedTickClock::new(Duration::from_millis(120));
    clock.reset(Duration::ZERO);

    clock.observe(&[Event::SpeedRaised {
        interval: Duration::from_millis(70),
    }]);

    assert!(!clock.frame(Duration::from_millis(69)));
    assert!(clock.frame(Duration::from_millis(70)));
}

#[test]
fn interpolation_advances_per_frame_and_resets_on_steps() {
    let mut interpolation = RenderInterpolation::default();
    interpolation.advance();
    interpolation.advance();
    assert!((interpolation.factor() - 0.4).abs() < f32::EPSILON);

    interpolation.observe(&[Event::SnakeAdvanced {
        from: Cell::new(100, 100),
        to: Cell::new(120, 100),
    }]);
    assert_eq!(interpolation.factor(), 0.0);

    interpolation.observe(&[Event::SessionPaused]);
    interpolation.advance();
    assert!((interpolation.factor() - 0.2).abs() < f32::EPSILON);
}
