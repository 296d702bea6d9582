#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state management for Neon Snake.
//!
//! All mutation funnels through [`apply`], which executes one [`Command`]
//! against the [`Session`] and broadcasts [`Event`] values describing what
//! changed. Renderers and systems read state exclusively through the
//! [`query`] module's immutable snapshots.

pub mod spawn;

use std::{collections::VecDeque, time::Duration};

use neon_snake_core::{
    Cell, Command, ConfigError, Direction, Event, FoodKind, GameConfig, Grid, SessionState,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::spawn::SpawnOutcome;

/// Active food item occupying a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    /// Cell the food occupies.
    pub cell: Cell,
    /// Kind selected by the weighted sampler.
    pub kind: FoodKind,
    /// Points awarded on consumption; a multiplier pickup inflates this.
    pub points: u32,
}

/// Active multiplier bonus with its remaining wall-clock lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Multiplier {
    /// Cell the multiplier occupies.
    pub cell: Cell,
    /// Wall-clock time left before the bonus expires unconsumed.
    pub remaining: Duration,
}

/// Represents the authoritative Neon Snake session state.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    grid: Grid,
    state: SessionState,
    snake: VecDeque<Cell>,
    direction: Direction,
    pending: VecDeque<Direction>,
    food: Option<Food>,
    multiplier: Option<Multiplier>,
    score: u32,
    high_score: u32,
    tick_interval: Duration,
    last_ratchet_score: u32,
    rng: ChaCha8Rng,
}

impl Session {
    /// Creates a new session, rejecting invalid configuration up front.
    ///
    /// The session starts in [`SessionState::Idle`] with a seeded snake and
    /// food so renderers have something to draw before the first game.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::from_surface(config.surface_width, config.surface_height, config.cell_size)?;
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);

        let mut session = Self {
            grid,
            state: SessionState::Idle,
            snake: VecDeque::new(),
            direction: Direction::Right,
            pending: VecDeque::new(),
            food: None,
            multiplier: None,
            score: 0,
            high_score: 0,
            tick_interval: config.initial_interval,
            last_ratchet_score: 0,
            config,
            rng,
        };
        let mut seed_events = Vec::new();
        session.reset_entities(&mut seed_events);
        Ok(session)
    }

    fn reset_entities(&mut self, out_events: &mut Vec<Event>) {
        self.snake = seed_snake(&self.grid);
        self.direction = Direction::Right;
        self.pending.clear();
        self.food = None;
        self.multiplier = None;
        self.score = 0;
        self.tick_interval = self.config.initial_interval;
        self.last_ratchet_score = 0;
        self.respawn_food(out_events);
    }

    fn begin_game(&mut self, out_events: &mut Vec<Event>) {
        // Running first: spawning into a grid the seed snake already fills
        // finishes the game immediately as a win.
        self.state = SessionState::Running;
        self.reset_entities(out_events);
    }

    fn respawn_food(&mut self, out_events: &mut Vec<Event>) {
        let snake_cells: Vec<Cell> = self.snake.iter().copied().collect();
        let multiplier_cell = self.multiplier.map(|multiplier| multiplier.cell);
        match spawn::spawn_food(
            &mut self.rng,
            &self.grid,
            &snake_cells,
            multiplier_cell,
            &self.config.food_table,
        ) {
            SpawnOutcome::Food(food) => {
                out_events.push(Event::FoodSpawned {
                    cell: food.cell,
                    kind: food.kind,
                });
                self.food = Some(food);
            }
            SpawnOutcome::GridFull => {
                self.food = None;
                self.finish(SessionState::Won, out_events);
            }
        }
    }

    fn finish(&mut self, outcome: SessionState, out_events: &mut Vec<Event>) {
        debug_assert!(outcome.is_terminal(), "finish requires a terminal state");
        self.state = outcome;
        self.multiplier = None;
        self.pending.clear();
        match outcome {
            SessionState::Won => out_events.push(Event::GameWon { score: self.score }),
            _ => out_events.push(Event::GameLost { score: self.score }),
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        let Some(&head) = self.snake.front() else {
            // An empty snake is a programming defect; abandon the game
            // rather than attempt partial recovery mid-step.
            debug_assert!(false, "step executed against an empty snake");
            self.state = SessionState::Idle;
            return;
        };

        if let Some(requested) = self.pending.pop_front() {
            if !requested.is_opposite(self.direction) {
                self.direction = requested;
            }
        }

        let (dx, dy) = self.direction.vector(self.grid.cell_size());
        let new_head = self.grid.wrap(head.translated(dx, dy));
        self.snake.push_front(new_head);
        out_events.push(Event::SnakeAdvanced {
            from: head,
            to: new_head,
        });

        // Multiplier resolves before food so a tick landing on both cells
        // scores the inflated value.
        if let Some(multiplier) = self.multiplier.take() {
            if multiplier.cell == new_head {
                if let Some(food) = self.food.as_mut() {
                    food.points = food.points.saturating_mul(self.config.multiplier_factor);
                }
                out_events.push(Event::MultiplierConsumed {
                    cell: multiplier.cell,
                });
            } else {
                self.multiplier = Some(multiplier);
            }
        }

        match self.food {
            Some(food) if food.cell == new_head => {
                self.food = None;
                self.score = self.score.saturating_add(food.points);
                self.high_score = self.high_score.max(self.score);
                out_events.push(Event::FoodConsumed {
                    kind: food.kind,
                    points: food.points,
                    score: self.score,
                });
                self.ratchet_speed(out_events);
                self.respawn_food(out_events);
                if self.state.is_terminal() {
                    return;
                }
            }
            _ => {
                let _ = self.snake.pop_back();
            }
        }

        if self.snake.iter().skip(1).any(|cell| *cell == new_head) {
            self.finish(SessionState::Lost, out_events);
            return;
        }

        if self.multiplier.is_none() && self.rng.gen_bool(self.config.multiplier_chance) {
            let snake_cells: Vec<Cell> = self.snake.iter().copied().collect();
            let food_cell = self.food.map(|food| food.cell);
            if let Some(cell) =
                spawn::spawn_multiplier(&mut self.rng, &self.grid, &snake_cells, food_cell)
            {
                self.multiplier = Some(Multiplier {
                    cell,
                    remaining: self.config.multiplier_duration,
                });
                out_events.push(Event::MultiplierSpawned { cell });
            }
        }
    }

    fn ratchet_speed(&mut self, out_events: &mut Vec<Event>) {
        let threshold = self.config.speed_score_threshold;
        if self.score == 0 || self.score % threshold != 0 || self.score == self.last_ratchet_score {
            return;
        }
        self.last_ratchet_score = self.score;

        if self.tick_interval > self.config.interval_floor {
            self.tick_interval = self
                .tick_interval
                .saturating_sub(self.config.interval_decrement)
                .max(self.config.interval_floor);
            out_events.push(Event::SpeedRaised {
                interval: self.tick_interval,
            });
        }
    }

    fn advance_wall_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        // The expiry timer keeps counting while paused; only the simulation
        // steps are suspended.
        if !self.state.is_in_game() {
            return;
        }
        if let Some(mut multiplier) = self.multiplier.take() {
            multiplier.remaining = multiplier.remaining.saturating_sub(dt);
            if multiplier.remaining.is_zero() {
                out_events.push(Event::MultiplierExpired);
            } else {
                self.multiplier = Some(multiplier);
            }
        }
    }

    fn resize_surface(&mut self, width_px: i32, height_px: i32, out_events: &mut Vec<Event>) {
        let Ok(grid) = Grid::from_surface(width_px, height_px, self.config.cell_size) else {
            // A surface too small to hold a single cell leaves the grid
            // unchanged; construction-time validation already guarantees the
            // session owns a usable grid.
            return;
        };

        self.grid = grid;
        self.config.surface_width = width_px;
        self.config.surface_height = height_px;

        for cell in self.snake.iter_mut() {
            *cell = grid.wrap(*cell);
        }
        out_events.push(Event::SurfaceResized {
            columns: grid.columns(),
            rows: grid.rows(),
        });

        let snake_cells: Vec<Cell> = self.snake.iter().copied().collect();

        if let Some(mut multiplier) = self.multiplier.take() {
            multiplier.cell = grid.wrap(multiplier.cell);
            let food_cell = self.food.map(|food| grid.wrap(food.cell));
            if snake_cells.contains(&multiplier.cell) || food_cell == Some(multiplier.cell) {
                match spawn::spawn_multiplier(&mut self.rng, &grid, &snake_cells, food_cell) {
                    Some(cell) => {
                        multiplier.cell = cell;
                        self.multiplier = Some(multiplier);
                        out_events.push(Event::MultiplierSpawned { cell });
                    }
                    None => out_events.push(Event::MultiplierExpired),
                }
            } else {
                self.multiplier = Some(multiplier);
            }
        }

        if let Some(mut food) = self.food.take() {
            food.cell = grid.wrap(food.cell);
            let multiplier_cell = self.multiplier.map(|multiplier| multiplier.cell);
            if snake_cells.contains(&food.cell) || multiplier_cell == Some(food.cell) {
                self.respawn_food(out_events);
            } else {
                self.food = Some(food);
            }
        }
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => match session.state {
            SessionState::Running => {}
            SessionState::Paused => {
                session.state = SessionState::Running;
                out_events.push(Event::SessionResumed);
            }
            SessionState::Idle | SessionState::Won | SessionState::Lost => {
                session.begin_game(out_events);
                out_events.push(Event::SessionStarted);
            }
        },
        Command::PauseToggle => match session.state {
            SessionState::Running => {
                session.state = SessionState::Paused;
                out_events.push(Event::SessionPaused);
            }
            SessionState::Paused => {
                session.state = SessionState::Running;
                out_events.push(Event::SessionResumed);
            }
            _ => {}
        },
        Command::Restart => {
            session.begin_game(out_events);
            out_events.push(Event::SessionRestarted);
        }
        Command::RequestDirection { direction } => {
            if session.state != SessionState::Running {
                return;
            }
            // An instant reversal is discarded here and again at dequeue
            // time, so a mistimed key repeat can never fold the snake onto
            // its own neck.
            if !direction.is_opposite(session.direction) {
                session.pending.push_back(direction);
            }
        }
        Command::Step => {
            if session.state == SessionState::Running {
                session.step(out_events);
            }
        }
        Command::Tick { dt } => session.advance_wall_clock(dt, out_events),
        Command::ResizeSurface {
            width_px,
            height_px,
        } => session.resize_surface(width_px, height_px, out_events),
    }
}

fn seed_snake(grid: &Grid) -> VecDeque<Cell> {
    let head = grid.cell_at(grid.columns() / 2, grid.rows() / 2);
    let tail = grid.wrap(head.translated(-grid.cell_size(), 0));
    let mut snake = VecDeque::with_capacity(2);
    snake.push_back(head);
    if tail != head {
        snake.push_back(tail);
    }
    snake
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use neon_snake_core::{Cell, Direction, Grid, SessionState};

    use super::{Food, Multiplier, Session};

    /// Retrieves the session lifecycle state.
    #[must_use]
    pub fn state(session: &Session) -> SessionState {
        session.state
    }

    /// Score accumulated by the current game.
    #[must_use]
    pub fn score(session: &Session) -> u32 {
        session.score
    }

    /// Best score achieved since the session was constructed.
    #[must_use]
    pub fn high_score(session: &Session) -> u32 {
        session.high_score
    }

    /// Interval currently separating simulation steps.
    #[must_use]
    pub fn tick_interval(session: &Session) -> Duration {
        session.tick_interval
    }

    /// Grid the session currently simulates on.
    #[must_use]
    pub fn grid(session: &Session) -> Grid {
        session.grid
    }

    /// Active food item, absent only in the won terminal state.
    #[must_use]
    pub fn food(session: &Session) -> Option<Food> {
        session.food
    }

    /// Active multiplier bonus, if one is on the grid.
    #[must_use]
    pub fn multiplier(session: &Session) -> Option<Multiplier> {
        session.multiplier
    }

    /// Number of queued direction changes awaiting future steps.
    #[must_use]
    pub fn pending_direction_count(session: &Session) -> usize {
        session.pending.len()
    }

    /// Captures a read-only view of the snake for presentation.
    #[must_use]
    pub fn snake_view(session: &Session) -> SnakeView {
        SnakeView {
            cells: session.snake.iter().copied().collect(),
            direction: session.direction,
        }
    }

    /// Read-only snapshot of the snake's body, head first.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SnakeView {
        cells: Vec<Cell>,
        direction: Direction,
    }

    impl SnakeView {
        /// Cell currently occupied by the head.
        #[must_use]
        pub fn head(&self) -> Option<Cell> {
            self.cells.first().copied()
        }

        /// Body cells ordered head to tail.
        #[must_use]
        pub fn cells(&self) -> &[Cell] {
            &self.cells
        }

        /// Number of body segments.
        #[must_use]
        pub fn len(&self) -> usize {
            self.cells.len()
        }

        /// Reports whether the snapshot holds no segments.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.cells.is_empty()
        }

        /// Direction the snake is currently travelling.
        #[must_use]
        pub fn direction(&self) -> Direction {
            self.direction
        }
    }
}

/// Test scaffolding that plants entities at known positions.
///
/// Only compiled for consumers that opt into the `session_scaffolding`
/// feature; scenario suites use it to pin down spawn-engine randomness.
#[cfg(feature = "session_scaffolding")]
pub mod scaffolding {
    use std::collections::VecDeque;
    use std::time::Duration;

    use neon_snake_core::{Cell, Direction, FoodKind};

    use super::{Food, Multiplier, Session};

    /// Replaces the snake's body and travel direction.
    pub fn place_snake(session: &mut Session, cells: &[Cell], direction: Direction) {
        session.snake = cells.iter().copied().collect::<VecDeque<Cell>>();
        session.direction = direction;
        session.pending.clear();
    }

    /// Replaces the active food item.
    pub fn place_food(session: &mut Session, cell: Cell, kind: FoodKind, points: u32) {
        session.food = Some(Food { cell, kind, points });
    }

    /// Replaces the active multiplier bonus.
    pub fn place_multiplier(session: &mut Session, cell: Cell, remaining: Duration) {
        session.multiplier = Some(Multiplier { cell, remaining });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_snake_core::{Command, Direction, Event, GameConfig, SessionState};

    fn session() -> Session {
        Session::new(GameConfig::default()).expect("default config is valid")
    }

    fn small_session() -> Session {
        let config = GameConfig {
            surface_width: 200,
            surface_height: 200,
            ..GameConfig::default()
        };
        Session::new(config).expect("valid config")
    }

    #[test]
    fn new_session_is_idle_with_seeded_entities() {
        let session = session();
        assert_eq!(query::state(&session), SessionState::Idle);
        assert_eq!(query::snake_view(&session).len(), 2);
        assert!(query::food(&session).is_some());
        assert!(query::multiplier(&session).is_none());
        assert_eq!(query::score(&session), 0);
    }

    #[test]
    fn snake_seeds_at_grid_center_heading_right() {
        let session = small_session();
        let view = query::snake_view(&session);
        assert_eq!(view.cells(), &[Cell::new(100, 100), Cell::new(80, 100)]);
        assert_eq!(view.direction(), Direction::Right);
    }

    #[test]
    fn start_transitions_idle_to_running() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        assert_eq!(query::state(&session), SessionState::Running);
        assert!(events.contains(&Event::SessionStarted));
    }

    #[test]
    fn start_resumes_a_paused_game_without_reseeding() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        apply(&mut session, Command::Step, &mut events);
        let score_snapshot = query::score(&session);
        let snake_snapshot = query::snake_view(&session);

        apply(&mut session, Command::PauseToggle, &mut events);
        assert_eq!(query::state(&session), SessionState::Paused);

        events.clear();
        apply(&mut session, Command::Start, &mut events);
        assert_eq!(query::state(&session), SessionState::Running);
        assert_eq!(events, vec![Event::SessionResumed]);
        assert_eq!(query::score(&session), score_snapshot);
        assert_eq!(query::snake_view(&session), snake_snapshot);
    }

    #[test]
    fn pause_toggle_round_trips_and_ignores_idle() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::PauseToggle, &mut events);
        assert_eq!(query::state(&session), SessionState::Idle);

        apply(&mut session, Command::Start, &mut events);
        apply(&mut session, Command::PauseToggle, &mut events);
        assert_eq!(query::state(&session), SessionState::Paused);
        apply(&mut session, Command::PauseToggle, &mut events);
        assert_eq!(query::state(&session), SessionState::Running);
    }

    #[test]
    fn steps_are_suspended_while_paused() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        apply(&mut session, Command::PauseToggle, &mut events);

        let before = query::snake_view(&session);
        apply(&mut session, Command::Step, &mut events);
        assert_eq!(query::snake_view(&session), before);
    }

    #[test]
    fn direction_requests_are_ignored_unless_running() {
        let mut session = session();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::RequestDirection {
                direction: Direction::Up,
            },
            &mut events,
        );
        assert_eq!(query::pending_direction_count(&session), 0);

        apply(&mut session, Command::Start, &mut events);
        apply(
            &mut session,
            Command::RequestDirection {
                direction: Direction::Up,
            },
            &mut events,
        );
        assert_eq!(query::pending_direction_count(&session), 1);
    }

    #[test]
    fn reversal_requests_are_discarded_at_enqueue_time() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        apply(
            &mut session,
            Command::RequestDirection {
                direction: Direction::Left,
            },
            &mut events,
        );
        assert_eq!(query::pending_direction_count(&session), 0);
    }

    #[test]
    fn one_queued_direction_is_consumed_per_step() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        for direction in [Direction::Up, Direction::Down] {
            apply(
                &mut session,
                Command::RequestDirection { direction },
                &mut events,
            );
        }
        assert_eq!(query::pending_direction_count(&session), 2);

        apply(&mut session, Command::Step, &mut events);
        assert_eq!(query::pending_direction_count(&session), 1);
        assert_eq!(query::snake_view(&session).direction(), Direction::Up);
    }

    #[test]
    fn wall_clock_expires_the_multiplier() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        session.multiplier = Some(Multiplier {
            cell: Cell::new(0, 0),
            remaining: Duration::from_millis(3000),
        });

        events.clear();
        apply(
            &mut session,
            Command::Tick {
                dt: Duration::from_millis(2999),
            },
            &mut events,
        );
        assert!(query::multiplier(&session).is_some());
        assert!(events.is_empty());

        apply(
            &mut session,
            Command::Tick {
                dt: Duration::from_millis(1),
            },
            &mut events,
        );
        assert!(query::multiplier(&session).is_none());
        assert_eq!(events, vec![Event::MultiplierExpired]);
    }

    #[test]
    fn multiplier_timer_keeps_counting_while_paused() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        session.multiplier = Some(Multiplier {
            cell: Cell::new(0, 0),
            remaining: Duration::from_millis(100),
        });
        apply(&mut session, Command::PauseToggle, &mut events);

        apply(
            &mut session,
            Command::Tick {
                dt: Duration::from_millis(200),
            },
            &mut events,
        );
        assert!(query::multiplier(&session).is_none());
    }

    #[test]
    fn restart_resets_score_but_preserves_high_score() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        session.score = 230;
        session.high_score = 230;

        events.clear();
        apply(&mut session, Command::Restart, &mut events);
        assert_eq!(query::state(&session), SessionState::Running);
        assert_eq!(query::score(&session), 0);
        assert_eq!(query::high_score(&session), 230);
        assert!(events.contains(&Event::SessionRestarted));
    }

    #[test]
    fn restart_cancels_a_live_multiplier() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        session.multiplier = Some(Multiplier {
            cell: Cell::new(0, 0),
            remaining: Duration::from_millis(3000),
        });

        apply(&mut session, Command::Restart, &mut events);
        assert!(query::multiplier(&session).is_none());
    }

    #[test]
    fn resize_rewraps_entities_into_the_new_extent() {
        let mut session = session();
        let mut events = Vec::new();
        apply(&mut session, Command::Start, &mut events);
        session.snake = VecDeque::from([Cell::new(360, 360), Cell::new(340, 360)]);
        session.food = Some(Food {
            cell: Cell::new(300, 300),
            kind: FoodKind::Regular,
            points: 10,
        });

        events.clear();
        apply(
            &mut session,
            Command::ResizeSurface {
                width_px: 200,
                height_px: 200,
            },
            &mut events,
        );

        assert!(events.contains(&Event::SurfaceResized {
            columns: 10,
            rows: 10
        }));
        let grid = query::grid(&session);
        for cell in query::snake_view(&session).cells() {
            assert!(grid.contains(*cell));
        }
        let food = query::food(&session).expect("food survives the resize");
        assert!(grid.contains(food.cell));
    }

    #[test]
    fn resize_to_an_unusable_surface_is_ignored() {
        let mut session = session();
        let mut events = Vec::new();
        let grid_before = query::grid(&session);
        apply(
            &mut session,
            Command::ResizeSurface {
                width_px: 10,
                height_px: 10,
            },
            &mut events,
        );
        assert_eq!(query::grid(&session), grid_before);
        assert!(events.is_empty());
    }
}
