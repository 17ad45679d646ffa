#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cellular automaton that seeds and smooths an arena into open caverns.

use arena_forge_core::{CellCoord, Grid, Smoothing, Tile};
use rand::Rng;

/// Birth/death rules applied to every cell on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellularAutomaton {
    birth_rate: u32,
    death_limit: u32,
}

impl CellularAutomaton {
    /// Creates an automaton using the provided neighbour thresholds.
    #[must_use]
    pub const fn new(birth_rate: u32, death_limit: u32) -> Self {
        Self {
            birth_rate,
            death_limit,
        }
    }

    /// Fills a fresh grid where each cell is independently open with
    /// probability `1 - initial_chance`.
    ///
    /// Cells are drawn in row-major order, one Bernoulli trial each.
    #[must_use]
    pub fn seed<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        initial_chance: f64,
        rng: &mut R,
    ) -> Grid {
        let open_chance = (1.0 - initial_chance).clamp(0.0, 1.0);
        let mut grid = Grid::new(width, height, Tile::Restricted);
        let cells: Vec<CellCoord> = grid.cells().collect();
        for cell in cells {
            if rng.gen_bool(open_chance) {
                grid.set(cell, Tile::Free);
            }
        }
        grid
    }

    /// Counts the open cells among the eight neighbours of `cell`.
    #[must_use]
    pub fn count_free_neighbours(grid: &Grid, cell: CellCoord) -> usize {
        grid.moore_neighbours(cell)
            .filter(|neighbour| grid.get(*neighbour) == Some(Tile::Free))
            .count()
    }

    /// Applies one generation of the rules and reports how many cells changed.
    ///
    /// Every cell reads its neighbourhood from the same snapshot of the
    /// previous generation.
    pub fn tick(&self, grid: &mut Grid) -> usize {
        if grid.is_empty() {
            return 0;
        }

        let snapshot = grid.clone();
        let mut modified = 0;
        for (cell, tile) in snapshot.iter() {
            let alive = Self::count_free_neighbours(&snapshot, cell);
            let alive = u32::try_from(alive).unwrap_or(u32::MAX);
            let next = if tile == Tile::Free {
                if alive < self.death_limit {
                    Tile::Restricted
                } else {
                    continue;
                }
            } else if alive > self.birth_rate {
                Tile::Free
            } else {
                continue;
            };

            grid.set(cell, next);
            modified += 1;
        }
        modified
    }

    /// Runs ticks according to the smoothing policy and returns how many ran.
    pub fn smooth(&self, grid: &mut Grid, smoothing: Smoothing) -> u32 {
        match smoothing {
            Smoothing::Fixed(ticks) => {
                for _ in 0..ticks {
                    let _ = self.tick(grid);
                }
                ticks
            }
            Smoothing::UntilStable { max_ticks } => {
                let mut previous = None;
                let mut ran = 0;
                while ran < max_ticks {
                    let modified = self.tick(grid);
                    ran += 1;
                    if previous == Some(modified) {
                        break;
                    }
                    previous = Some(modified);
                }
                ran
            }
        }
    }
}
