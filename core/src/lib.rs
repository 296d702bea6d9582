#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Snake simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems and renderers to react to deterministically. Renderers consume
//! immutable snapshots exposed by the session's query layer and never mutate
//! state directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Neon Snake ready.";

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a new game, or resumes the current one when paused.
    Start,
    /// Toggles the paused state of a running game.
    PauseToggle,
    /// Abandons the current game and immediately starts a fresh one.
    Restart,
    /// Queues a direction change to take effect on an upcoming step.
    RequestDirection {
        /// Direction the snake should travel next.
        direction: Direction,
    },
    /// Executes exactly one fixed-timestep simulation step.
    Step,
    /// Advances the session's wall clock by the provided delta time.
    Tick {
        /// Wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Rebuilds the grid from new surface dimensions, realigning entities.
    ResizeSurface {
        /// New surface width measured in pixels.
        width_px: i32,
        /// New surface height measured in pixels.
        height_px: i32,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new game began and entity state was re-seeded.
    SessionStarted,
    /// A running game was suspended.
    SessionPaused,
    /// A paused game resumed ticking.
    SessionResumed,
    /// The previous game was abandoned and a fresh one began.
    SessionRestarted,
    /// The snake's head advanced by one cell.
    SnakeAdvanced {
        /// Cell the head occupied before the step.
        from: Cell,
        /// Cell the head occupies after the step.
        to: Cell,
    },
    /// A new food item entered the grid.
    FoodSpawned {
        /// Cell the food occupies.
        cell: Cell,
        /// Kind selected by the weighted sampler.
        kind: FoodKind,
    },
    /// The snake consumed the active food item.
    FoodConsumed {
        /// Kind of the consumed food.
        kind: FoodKind,
        /// Points awarded, including any multiplier effect.
        points: u32,
        /// Score total after the award.
        score: u32,
    },
    /// A multiplier bonus entered the grid.
    MultiplierSpawned {
        /// Cell the multiplier occupies.
        cell: Cell,
    },
    /// The snake consumed the multiplier bonus.
    MultiplierConsumed {
        /// Cell the multiplier occupied.
        cell: Cell,
    },
    /// The multiplier bonus timed out without being consumed.
    MultiplierExpired,
    /// The tick cadence accelerated after a score threshold was crossed.
    SpeedRaised {
        /// New interval between simulation steps.
        interval: Duration,
    },
    /// The grid was rebuilt after a surface resize.
    SurfaceResized {
        /// Number of columns in the rebuilt grid.
        columns: u32,
        /// Number of rows in the rebuilt grid.
        rows: u32,
    },
    /// The snake filled the entire grid; the game ended in a win.
    GameWon {
        /// Final score of the winning game.
        score: u32,
    },
    /// The snake collided with its own body; the game ended in a loss.
    GameLost {
        /// Final score of the lost game.
        score: u32,
    },
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing y coordinates.
    Up,
    /// Movement toward increasing y coordinates.
    Down,
    /// Movement toward decreasing x coordinates.
    Left,
    /// Movement toward increasing x coordinates.
    Right,
}

impl Direction {
    /// Returns the direction pointing exactly opposite to this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` is the exact reverse of this direction.
    #[must_use]
    pub fn is_opposite(self, other: Self) -> bool {
        self.opposite() == other
    }

    /// Unit vector for this direction scaled by the provided cell size.
    #[must_use]
    pub const fn vector(self, cell_size: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -cell_size),
            Self::Down => (0, cell_size),
            Self::Left => (-cell_size, 0),
            Self::Right => (cell_size, 0),
        }
    }
}

/// Location of a single grid cell expressed in surface pixels.
///
/// Both coordinates are always exact multiples of the configured cell size;
/// the simulation step guarantees alignment by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new cell at the provided pixel coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate of the cell's upper-left corner.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate of the cell's upper-left corner.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns this cell translated by the provided pixel offsets.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Kinds of food the spawn engine can produce, ordered by rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Common food worth the base point value.
    Regular,
    /// Uncommon food worth a medium point value.
    Bonus,
    /// Rare food worth a high point value.
    Super,
    /// Rarest food worth the top point value.
    Mega,
}

/// Lifecycle states of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No game has been started yet, or a finished game was acknowledged.
    Idle,
    /// A game is in progress and simulation steps execute on schedule.
    Running,
    /// A game is in progress but simulation steps are suspended.
    Paused,
    /// The snake filled the grid; terminal until an explicit restart.
    Won,
    /// The snake collided with itself; terminal until an explicit restart.
    Lost,
}

impl SessionState {
    /// Reports whether a game is in progress, paused or not.
    #[must_use]
    pub const fn is_in_game(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Reports whether the state ends a game until a restart.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Discrete coordinate space the snake inhabits.
///
/// The grid owns torus wrap arithmetic: coordinates are wrapped, never
/// clamped, so the snake re-enters from the opposite edge. Surface pixels
/// beyond the last whole cell are dead border and never hold entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    cell_size: i32,
    columns: u32,
    rows: u32,
}

impl Grid {
    /// Derives a grid from surface pixel dimensions and a cell size.
    ///
    /// Columns and rows are the floor of the extent divided by `cell_size`.
    pub fn from_surface(width_px: i32, height_px: i32, cell_size: i32) -> Result<Self, ConfigError> {
        if cell_size <= 0 {
            return Err(ConfigError::NonPositiveCellSize { cell_size });
        }

        let columns = (width_px / cell_size).max(0) as u32;
        let rows = (height_px / cell_size).max(0) as u32;
        if columns == 0 || rows == 0 {
            return Err(ConfigError::ZeroAreaGrid {
                width_px,
                height_px,
                cell_size,
            });
        }

        Ok(Self {
            cell_size,
            columns,
            rows,
        })
    }

    /// Side length of a single square cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Playable width of the grid in pixels.
    #[must_use]
    pub const fn width_px(&self) -> i32 {
        self.columns as i32 * self.cell_size
    }

    /// Playable height of the grid in pixels.
    #[must_use]
    pub const fn height_px(&self) -> i32 {
        self.rows as i32 * self.cell_size
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Cell anchored at the provided column and row indices.
    #[must_use]
    pub const fn cell_at(&self, column: u32, row: u32) -> Cell {
        Cell::new(
            column as i32 * self.cell_size,
            row as i32 * self.cell_size,
        )
    }

    /// Wraps a possibly out-of-range cell onto the torus.
    ///
    /// The result always lies within the playable extent and is snapped to
    /// an exact cell-size multiple.
    #[must_use]
    pub fn wrap(&self, cell: Cell) -> Cell {
        let x = cell.x().rem_euclid(self.width_px());
        let y = cell.y().rem_euclid(self.height_px());
        Cell::new(
            x.div_euclid(self.cell_size) * self.cell_size,
            y.div_euclid(self.cell_size) * self.cell_size,
        )
    }

    /// Reports whether the cell lies within the playable extent.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() >= 0 && cell.x() < self.width_px() && cell.y() >= 0 && cell.y() < self.height_px()
    }
}

/// Weighted entry in the food spawn table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodSpec {
    /// Kind produced when this entry is sampled.
    pub kind: FoodKind,
    /// Base points awarded when food of this kind is consumed.
    pub points: u32,
    /// Sampling probability; the table's weights must sum to one.
    pub weight: f64,
}

impl FoodSpec {
    /// Creates a new weighted food table entry.
    #[must_use]
    pub const fn new(kind: FoodKind, points: u32, weight: f64) -> Self {
        Self {
            kind,
            points,
            weight,
        }
    }
}

/// Tolerance applied when checking that food weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Construction-time configuration for a game session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Side length of a single grid cell in pixels.
    pub cell_size: i32,
    /// Rendering surface width in pixels.
    pub surface_width: i32,
    /// Rendering surface height in pixels.
    pub surface_height: i32,
    /// Interval between simulation steps when a game begins.
    pub initial_interval: Duration,
    /// Lower bound the tick interval can never ratchet below.
    pub interval_floor: Duration,
    /// Amount removed from the tick interval at each ratchet.
    pub interval_decrement: Duration,
    /// Score granularity that triggers a ratchet when landed on exactly.
    pub speed_score_threshold: u32,
    /// Per-step probability of a multiplier spawn attempt while absent.
    pub multiplier_chance: f64,
    /// Wall-clock lifetime of an unconsumed multiplier.
    pub multiplier_duration: Duration,
    /// Factor applied to the active food's points on multiplier pickup.
    pub multiplier_factor: u32,
    /// Weighted table the spawn engine samples food kinds from.
    pub food_table: Vec<FoodSpec>,
    /// Seed for the session's deterministic random number generator.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            surface_width: 380,
            surface_height: 380,
            initial_interval: Duration::from_millis(120),
            interval_floor: Duration::from_millis(70),
            interval_decrement: Duration::from_millis(2),
            speed_score_threshold: 100,
            multiplier_chance: 0.01,
            multiplier_duration: Duration::from_millis(3000),
            multiplier_factor: 5,
            food_table: vec![
                FoodSpec::new(FoodKind::Regular, 10, 0.70),
                FoodSpec::new(FoodKind::Bonus, 30, 0.15),
                FoodSpec::new(FoodKind::Super, 50, 0.10),
                FoodSpec::new(FoodKind::Mega, 100, 0.05),
            ],
            rng_seed: 0x5eed_0f00_d5e5_510e,
        }
    }
}

impl GameConfig {
    /// Validates the configuration, rejecting it before a session starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = Grid::from_surface(self.surface_width, self.surface_height, self.cell_size)?;

        if self.initial_interval.is_zero() || self.interval_floor.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.interval_floor > self.initial_interval {
            return Err(ConfigError::FloorAboveInitialInterval {
                floor: self.interval_floor,
                initial: self.initial_interval,
            });
        }
        if self.speed_score_threshold == 0 {
            return Err(ConfigError::ZeroScoreThreshold);
        }
        if !(0.0..=1.0).contains(&self.multiplier_chance) {
            return Err(ConfigError::ChanceOutOfRange {
                chance: self.multiplier_chance,
            });
        }
        if self.multiplier_factor == 0 {
            return Err(ConfigError::ZeroMultiplierFactor);
        }
        if self.food_table.is_empty() {
            return Err(ConfigError::EmptyFoodTable);
        }
        if self.food_table.iter().any(|spec| spec.weight < 0.0) {
            return Err(ConfigError::NegativeFoodWeight);
        }

        let weight_sum: f64 = self.food_table.iter().map(|spec| spec.weight).sum();
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::FoodWeightsNotNormalized { sum: weight_sum });
        }

        Ok(())
    }
}

/// Reasons a configuration is rejected before a session can start.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The cell size must be a positive number of pixels.
    #[error("cell size must be positive, got {cell_size}")]
    NonPositiveCellSize {
        /// Offending cell size.
        cell_size: i32,
    },
    /// The surface does not contain even a single whole cell.
    #[error("surface {width_px}x{height_px} holds no whole {cell_size}px cell")]
    ZeroAreaGrid {
        /// Surface width supplied at construction.
        width_px: i32,
        /// Surface height supplied at construction.
        height_px: i32,
        /// Cell size supplied at construction.
        cell_size: i32,
    },
    /// Tick intervals of zero would stall or spin the scheduler.
    #[error("tick interval and floor must be non-zero")]
    ZeroTickInterval,
    /// The interval floor must not exceed the starting interval.
    #[error("interval floor {floor:?} exceeds initial interval {initial:?}")]
    FloorAboveInitialInterval {
        /// Configured interval floor.
        floor: Duration,
        /// Configured initial interval.
        initial: Duration,
    },
    /// The speed ratchet needs a positive score granularity.
    #[error("speed score threshold must be positive")]
    ZeroScoreThreshold,
    /// Spawn probabilities live in the closed unit interval.
    #[error("multiplier chance {chance} outside [0, 1]")]
    ChanceOutOfRange {
        /// Offending probability.
        chance: f64,
    },
    /// A multiplier factor of zero would erase the food's value.
    #[error("multiplier factor must be positive")]
    ZeroMultiplierFactor,
    /// The spawn engine needs at least one food kind to sample.
    #[error("food table must not be empty")]
    EmptyFoodTable,
    /// Negative weights break cumulative-probability sampling.
    #[error("food weights must be non-negative")]
    NegativeFoodWeight,
    /// The weight table must form a probability distribution.
    #[error("food weights sum to {sum}, expected 1.0")]
    FoodWeightsNotNormalized {
        /// Actual sum of the configured weights.
        sum: f64,
    },
}
