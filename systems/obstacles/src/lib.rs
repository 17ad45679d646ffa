#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random obstacle decoration over open floor.

use arena_forge_core::{CellCoord, CellMask, Grid, Tile};
use rand::Rng;

/// Scatters destructible obstacles across free cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleScatter {
    chance: f64,
}

impl ObstacleScatter {
    /// Creates a scatter that blocks each free cell with probability `chance`.
    ///
    /// The chance is clamped into `[0, 1]`.
    #[must_use]
    pub fn new(chance: f64) -> Self {
        let chance = if chance.is_nan() {
            0.0
        } else {
            chance.clamp(0.0, 1.0)
        };
        Self { chance }
    }

    /// Probability that a free cell receives an obstacle.
    #[must_use]
    pub const fn chance(&self) -> f64 {
        self.chance
    }

    /// Blocks free cells at random and returns how many were placed.
    ///
    /// Cells are visited in row-major order with one draw per free cell.
    /// Cells in `protected` are skipped without drawing.
    pub fn scatter<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        protected: Option<&CellMask>,
    ) -> usize {
        let open: Vec<CellCoord> = grid
            .iter()
            .filter(|&(cell, tile)| {
                tile == Tile::Free && !protected.is_some_and(|mask| mask.contains(cell))
            })
            .map(|(cell, _)| cell)
            .collect();

        let mut placed = 0;
        for cell in open {
            if rng.gen_bool(self.chance) {
                grid.set(cell, Tile::Blocked);
                placed += 1;
            }
        }
        placed
    }
}
