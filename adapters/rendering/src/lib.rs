#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Neon Snake presentation backends.
//!
//! The simulation never draws; backends receive a declarative [`Scene`]
//! assembled from session query snapshots and the current interpolation
//! factor. Head positioning handles the torus topology explicitly so a
//! wrap never flashes as a full-screen teleport.

use anyhow::Result as AnyResult;
use glam::Vec2;
use neon_snake_core::{Cell, FoodKind, Grid, SessionState};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill color of the snake's head.
pub const SNAKE_HEAD_COLOR: Color = Color::from_rgb_u8(0xff, 0x5f, 0x1f);

/// Base fill color of the snake's body segments.
pub const SNAKE_BODY_COLOR: Color = Color::from_rgb_u8(0xc8, 0x44, 0x0f);

/// Fill color of the multiplier bonus star.
pub const MULTIPLIER_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0xff);

/// Color used when drawing grid lines.
pub const GRID_LINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.07);

/// Fill color associated with a food kind.
#[must_use]
pub const fn food_color(kind: FoodKind) -> Color {
    match kind {
        FoodKind::Regular => Color::from_rgb_u8(0xff, 0x30, 0x3f),
        FoodKind::Bonus => Color::from_rgb_u8(0xff, 0xfc, 0x31),
        FoodKind::Super => Color::from_rgb_u8(0xaa, 0x00, 0xff),
        FoodKind::Mega => Color::from_rgb_u8(0x00, 0xdf, 0xfc),
    }
}

/// Body segment color fading toward the tail.
#[must_use]
pub fn body_segment_color(index: usize, segment_count: usize) -> Color {
    if segment_count <= 1 {
        return SNAKE_BODY_COLOR;
    }
    let fade = index as f32 / (segment_count - 1) as f32;
    SNAKE_BODY_COLOR.lighten(fade * 0.35)
}

/// Describes the square cell grid that backends draw beneath the entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell in pixels.
    pub cell_size: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Derives a drawable grid description from the simulation grid.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            cell_size: grid.cell_size() as f32,
            line_color: GRID_LINE_COLOR,
        }
    }

    /// Total width of the playable area in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the playable area in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }
}

/// Snake body ready for drawing, head position already interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakePresentation {
    /// Draw position of the head in surface pixels.
    pub head: Vec2,
    /// Body cells from neck to tail at their grid positions.
    pub body: Vec<Vec2>,
    /// Fill color of the head.
    pub head_color: Color,
}

/// Food item ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodPresentation {
    /// Draw position in surface pixels.
    pub position: Vec2,
    /// Kind driving shape accents in richer backends.
    pub kind: FoodKind,
    /// Fill color resolved from the palette.
    pub color: Color,
}

/// Multiplier bonus ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultiplierPresentation {
    /// Draw position in surface pixels.
    pub position: Vec2,
    /// Fill color resolved from the palette.
    pub color: Color,
}

/// Score readout accompanying the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Score of the current game.
    pub score: u32,
    /// Best score since the session was constructed.
    pub high_score: u32,
    /// Session lifecycle state, e.g. to overlay pause or game-over text.
    pub state: SessionState,
}

/// Scene description combining the grid, entities and HUD for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Cell grid composing the playfield.
    pub grid: GridPresentation,
    /// Snake with its interpolated head position.
    pub snake: SnakePresentation,
    /// Active food item, absent once the grid is filled.
    pub food: Option<FoodPresentation>,
    /// Active multiplier bonus, if any.
    pub multiplier: Option<MultiplierPresentation>,
    /// Score readout.
    pub hud: HudPresentation,
}

impl Scene {
    /// Assembles a scene from session snapshots and an interpolation factor.
    #[must_use]
    pub fn compose(
        grid: &Grid,
        snake_cells: &[Cell],
        food: Option<(Cell, FoodKind)>,
        multiplier: Option<Cell>,
        hud: HudPresentation,
        interpolation: f32,
    ) -> Self {
        let head = snake_cells.first().copied();
        let neck = snake_cells.get(1).copied();
        let head_position = match (head, neck) {
            (Some(head), Some(neck)) => interpolated_head_position(neck, head, interpolation, grid),
            (Some(head), None) => cell_position(head),
            (None, _) => Vec2::ZERO,
        };

        Self {
            grid: GridPresentation::from_grid(grid),
            snake: SnakePresentation {
                head: head_position,
                body: snake_cells.iter().skip(1).copied().map(cell_position).collect(),
                head_color: SNAKE_HEAD_COLOR,
            },
            food: food.map(|(cell, kind)| FoodPresentation {
                position: cell_position(cell),
                kind,
                color: food_color(kind),
            }),
            multiplier: multiplier.map(|cell| MultiplierPresentation {
                position: cell_position(cell),
                color: MULTIPLIER_COLOR,
            }),
            hud,
        }
    }
}

/// Backend seam implemented by concrete presentation layers.
pub trait RenderBackend {
    /// Presents one assembled scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Converts a grid cell to its draw position in surface pixels.
#[must_use]
pub fn cell_position(cell: Cell) -> Vec2 {
    Vec2::new(cell.x() as f32, cell.y() as f32)
}

/// Blends the head's draw position between its previous and current cell.
///
/// When the raw positional delta exceeds half the grid extent on an axis
/// the head wrapped across the torus edge this step; the delta is unwrapped
/// by a full extent before blending and the blended position re-wrapped, so
/// the head slides off one edge and onto the other instead of teleporting.
#[must_use]
pub fn interpolated_head_position(previous: Cell, current: Cell, factor: f32, grid: &Grid) -> Vec2 {
    let width = grid.width_px() as f32;
    let height = grid.height_px() as f32;
    let factor = factor.clamp(0.0, 1.0);

    let mut diff = cell_position(current) - cell_position(previous);
    if diff.x.abs() > width / 2.0 {
        diff.x -= width * diff.x.signum();
    }
    if diff.y.abs() > height / 2.0 {
        diff.y -= height * diff.y.signum();
    }

    let blended = cell_position(previous) + diff * factor;
    Vec2::new(blended.x.rem_euclid(width), blended.y.rem_euclid(height))
}
