#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input routing that funnels heterogeneous sources into commands.
//!
//! Keyboards, swipe gestures and tap zones all collapse into the single
//! direction-request contract; each source is a thin adapter with no
//! game-logic knowledge. The router holds no game state and consults only
//! the session state snapshot passed by the driver.

use glam::Vec2;
use neon_snake_core::{Command, Direction, SessionState};

/// Minimum displacement, in pixels, for a touch to classify as a swipe.
pub const MIN_SWIPE_DISTANCE: f32 = 30.0;

/// Physical keys the router understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow key steering the snake upward.
    ArrowUp,
    /// Arrow key steering the snake downward.
    ArrowDown,
    /// Arrow key steering the snake leftward.
    ArrowLeft,
    /// Arrow key steering the snake rightward.
    ArrowRight,
    /// Pause toggle, bound to `P`.
    Pause,
    /// Start-a-new-game shortcut, bound to `R`.
    Restart,
}

/// Screen quadrant a tap-zone overlay reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TapZone {
    /// Zone above the playfield.
    Up,
    /// Zone below the playfield.
    Down,
    /// Zone left of the playfield.
    Left,
    /// Zone right of the playfield.
    Right,
}

impl TapZone {
    /// Direction a tap in this zone requests.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Up => Direction::Up,
            Self::Down => Direction::Down,
            Self::Left => Direction::Left,
            Self::Right => Direction::Right,
        }
    }
}

/// Translates normalized input samples into session commands.
#[derive(Debug, Default)]
pub struct InputRouter;

impl InputRouter {
    /// Maps a key press to a command given the current session state.
    #[must_use]
    pub fn key_command(&self, state: SessionState, key: Key) -> Option<Command> {
        match key {
            Key::ArrowUp => self.direction_command(state, Direction::Up),
            Key::ArrowDown => self.direction_command(state, Direction::Down),
            Key::ArrowLeft => self.direction_command(state, Direction::Left),
            Key::ArrowRight => self.direction_command(state, Direction::Right),
            Key::Pause => state.is_in_game().then_some(Command::PauseToggle),
            Key::Restart => (!state.is_in_game()).then_some(Command::Start),
        }
    }

    /// Maps a direction intent (swipe, tap zone) to a command.
    ///
    /// Direction requests are meaningful only while a game is actively
    /// running; everything else is a no-op rather than an error.
    #[must_use]
    pub fn direction_command(&self, state: SessionState, direction: Direction) -> Option<Command> {
        (state == SessionState::Running).then_some(Command::RequestDirection { direction })
    }
}

/// Classifies touch start/end pairs into directional gestures.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwipeTracker {
    origin: Option<Vec2>,
}

impl SwipeTracker {
    /// Records where a touch began.
    pub fn begin(&mut self, position: Vec2) {
        self.origin = Some(position);
    }

    /// Discards any in-flight touch, e.g. when the host cancels it.
    pub fn cancel(&mut self) {
        self.origin = None;
    }

    /// Classifies the completed touch, consuming the recorded origin.
    ///
    /// Returns a direction only when the displacement on some axis exceeds
    /// [`MIN_SWIPE_DISTANCE`]; shorter movements are taps and yield `None`.
    /// The axis with the greater absolute displacement wins.
    pub fn finish(&mut self, position: Vec2) -> Option<Direction> {
        let origin = self.origin.take()?;
        let delta = position - origin;

        if delta.x.abs() <= MIN_SWIPE_DISTANCE && delta.y.abs() <= MIN_SWIPE_DISTANCE {
            return None;
        }

        if delta.x.abs() > delta.y.abs() {
            Some(if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if delta.y > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_zones_map_straight_to_directions() {
        assert_eq!(TapZone::Up.direction(), Direction::Up);
        assert_eq!(TapZone::Right.direction(), Direction::Right);
    }

    #[test]
    fn finish_without_begin_is_ignored() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.finish(Vec2::new(100.0, 100.0)), None);
    }
}
