//! Spawn engine choosing unoccupied cells and weighted entity payloads.
//!
//! Both entry points enumerate the full grid and exclude occupied cells, so
//! every produced position is grid-aligned by construction. Sampling runs on
//! the caller's generator; the session owns a seeded generator, which keeps
//! whole games deterministically replayable.

use neon_snake_core::{Cell, FoodSpec, Grid};
use rand::Rng;

use crate::Food;

/// Result of asking the spawn engine for a new food item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A food item was placed on a free cell.
    Food(Food),
    /// No free cell remains; the snake fills the grid and the game is won.
    GridFull,
}

/// Spawns a food item on a uniformly chosen free cell.
///
/// Cells occupied by the snake or the multiplier are excluded. An exhausted
/// grid reports [`SpawnOutcome::GridFull`], the designed win condition.
pub fn spawn_food<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    snake: &[Cell],
    multiplier: Option<Cell>,
    table: &[FoodSpec],
) -> SpawnOutcome {
    let free = free_cells(grid, |cell| {
        snake.contains(&cell) || multiplier == Some(cell)
    });
    if free.is_empty() {
        return SpawnOutcome::GridFull;
    }

    let cell = free[rng.gen_range(0..free.len())];
    let spec = choose_kind(rng, table);
    SpawnOutcome::Food(Food {
        cell,
        kind: spec.kind,
        points: spec.points,
    })
}

/// Spawns a multiplier bonus on a uniformly chosen free cell.
///
/// Cells occupied by the snake or the food are excluded. Declining to spawn
/// on a full grid is a silent no-op, not an error.
pub fn spawn_multiplier<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    snake: &[Cell],
    food: Option<Cell>,
) -> Option<Cell> {
    let free = free_cells(grid, |cell| snake.contains(&cell) || food == Some(cell));
    if free.is_empty() {
        return None;
    }

    Some(free[rng.gen_range(0..free.len())])
}

/// Samples a food kind by cumulative probability over the weight table.
///
/// The table is validated at construction to sum to one; the first entry
/// absorbs any residual rounding, matching a roll of exactly 1.0.
pub fn choose_kind<'table, R: Rng>(rng: &mut R, table: &'table [FoodSpec]) -> &'table FoodSpec {
    debug_assert!(!table.is_empty(), "choose_kind requires a non-empty table");
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for spec in table {
        cumulative += spec.weight;
        if roll < cumulative {
            return spec;
        }
    }
    &table[0]
}

fn free_cells<F>(grid: &Grid, is_occupied: F) -> Vec<Cell>
where
    F: Fn(Cell) -> bool,
{
    let mut cells = Vec::new();
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = grid.cell_at(column, row);
            if !is_occupied(cell) {
                cells.push(cell);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_snake_core::{FoodKind, GameConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid_3x3() -> Grid {
        Grid::from_surface(60, 60, 20).expect("valid grid")
    }

    #[test]
    fn spawned_food_avoids_snake_and_multiplier() {
        let grid = grid_3x3();
        let snake: Vec<Cell> = (0..3)
            .flat_map(|row| (0..3).map(move |column| (column, row)))
            .filter(|&(column, row)| !(column == 2 && row == 2))
            .map(|(column, row)| grid.cell_at(column, row))
            .collect();
        let multiplier = None;

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let table = GameConfig::default().food_table;
        match spawn_food(&mut rng, &grid, &snake, multiplier, &table) {
            SpawnOutcome::Food(food) => assert_eq!(food.cell, grid.cell_at(2, 2)),
            SpawnOutcome::GridFull => panic!("one cell was free"),
        }
    }

    #[test]
    fn full_grid_reports_the_win_condition() {
        let grid = grid_3x3();
        let snake: Vec<Cell> = (0..3)
            .flat_map(|row| (0..3).map(move |column| (column, row)))
            .map(|(column, row)| grid.cell_at(column, row))
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let table = GameConfig::default().food_table;
        assert_eq!(
            spawn_food(&mut rng, &grid, &snake, None, &table),
            SpawnOutcome::GridFull
        );
    }

    #[test]
    fn multiplier_declines_to_spawn_on_a_full_grid() {
        let grid = grid_3x3();
        let snake: Vec<Cell> = (0..3)
            .flat_map(|row| (0..3).map(move |column| (column, row)))
            .map(|(column, row)| grid.cell_at(column, row))
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(spawn_multiplier(&mut rng, &grid, &snake, None), None);
    }

    #[test]
    fn multiplier_excludes_the_food_cell() {
        let grid = grid_3x3();
        let snake: Vec<Cell> = (0..3)
            .flat_map(|row| (0..3).map(move |column| (column, row)))
            .filter(|&(column, row)| !(row == 2 && column >= 1))
            .map(|(column, row)| grid.cell_at(column, row))
            .collect();
        let food = Some(grid.cell_at(1, 2));

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            spawn_multiplier(&mut rng, &grid, &snake, food),
            Some(grid.cell_at(2, 2))
        );
    }

    #[test]
    fn spawned_cells_are_grid_aligned() {
        let grid = Grid::from_surface(380, 380, 20).expect("valid grid");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let table = GameConfig::default().food_table;
        for _ in 0..100 {
            match spawn_food(&mut rng, &grid, &[], None, &table) {
                SpawnOutcome::Food(food) => {
                    assert_eq!(food.cell.x() % grid.cell_size(), 0);
                    assert_eq!(food.cell.y() % grid.cell_size(), 0);
                    assert!(grid.contains(food.cell));
                }
                SpawnOutcome::GridFull => panic!("empty snake cannot fill the grid"),
            }
        }
    }

    #[test]
    fn zero_weight_entries_are_never_sampled() {
        let table = vec![
            FoodSpec::new(FoodKind::Regular, 10, 1.0),
            FoodSpec::new(FoodKind::Mega, 100, 0.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            assert_eq!(choose_kind(&mut rng, &table).kind, FoodKind::Regular);
        }
    }
}
