use arena_forge_core::{CellMask, Grid};
use arena_forge_system_spawning::SpawnPoint;
use serde::Serialize;

/// Finished arena together with the bookkeeping gathered while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    pub(crate) grid: Grid,
    pub(crate) spawns: Vec<SpawnPoint>,
    pub(crate) attempts: u32,
    pub(crate) passages: CellMask,
    pub(crate) obstacles: usize,
}

impl Arena {
    /// Final tile grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Spawn points ordered by player.
    #[must_use]
    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    /// Number of pipeline attempts needed, counting the successful one.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Cells opened by the linker on the successful attempt.
    #[must_use]
    pub const fn passages(&self) -> &CellMask {
        &self.passages
    }

    /// Number of obstacles scattered during decoration.
    #[must_use]
    pub const fn obstacles(&self) -> usize {
        self.obstacles
    }

    /// Consumes the arena, keeping only the grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Serialisable view of the arena.
    #[must_use]
    pub fn summary(&self) -> ArenaSummary {
        ArenaSummary {
            width: self.grid.width(),
            height: self.grid.height(),
            attempts: self.attempts,
            obstacles: self.obstacles,
            spawns: self.spawns.clone(),
            rows: self.grid.glyph_rows(),
        }
    }
}

/// Flat record of an arena suitable for JSON output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArenaSummary {
    /// Columns in the grid.
    pub width: u32,
    /// Rows in the grid.
    pub height: u32,
    /// Pipeline attempts used.
    pub attempts: u32,
    /// Obstacles placed.
    pub obstacles: usize,
    /// Spawn points ordered by player.
    pub spawns: Vec<SpawnPoint>,
    /// One glyph string per grid row.
    pub rows: Vec<String>,
}
