#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn placement that spreads players across the arena.
//!
//! Player one takes the deepest open cell. Every later player takes the
//! candidate whose mean walking distance to the spawns already chosen,
//! weighted together with its own depth, is largest. Chosen cells are
//! stamped with their player's marker and ringed with safe cells.

use std::collections::HashSet;

use arena_forge_core::{CellCoord, Grid, PlayerId, Tile, MAX_PLAYERS};
use arena_forge_system_pathfinding::PathFinder;
use arena_forge_system_regions::RegionIdentifier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight applied to a candidate's depth when scoring it.
const DEPTH_WEIGHT: f64 = 4.0;

/// Spawn point assigned to a single player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Player owning the spawn.
    pub player: PlayerId,
    /// Cell holding the spawn marker.
    pub cell: CellCoord,
}

/// Reasons spawn placement can fail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// Fewer interior cells exist than players requested.
    #[error("{required} spawns requested but only {available} interior cells are available")]
    InsufficientSpace {
        /// Number of spawns requested.
        required: usize,
        /// Number of candidate cells with non-zero depth.
        available: usize,
    },
    /// More players were requested than spawn markers exist.
    #[error("{players} players requested but at most {max} are supported", max = MAX_PLAYERS)]
    TooManyPlayers {
        /// Number of players requested.
        players: usize,
    },
}

/// Places player spawns on a linked, depth-analysed arena.
#[derive(Debug, Default)]
pub struct SpawnPlacer {
    finder: PathFinder,
}

impl SpawnPlacer {
    /// Creates a placer with an empty search workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses spawn cells for `players` players and stamps them on the grid.
    ///
    /// The regions must have been depth-analysed; members without a depth
    /// count as depth 0 and are never chosen. On error the grid is untouched.
    pub fn place(
        &mut self,
        grid: &mut Grid,
        regions: &RegionIdentifier,
        players: usize,
    ) -> Result<Vec<SpawnPoint>, SpawnError> {
        if players > usize::from(MAX_PLAYERS) {
            return Err(SpawnError::TooManyPlayers { players });
        }

        let mut candidates: Vec<(CellCoord, u32)> = regions
            .regions()
            .iter()
            .flat_map(|region| {
                region
                    .cells()
                    .iter()
                    .map(move |&cell| (cell, region.depth(cell).unwrap_or(0)))
            })
            .filter(|&(_, depth)| depth != 0)
            .collect();

        if candidates.len() < players {
            return Err(SpawnError::InsufficientSpace {
                required: players,
                available: candidates.len(),
            });
        }
        if players == 0 {
            return Ok(Vec::new());
        }

        candidates.sort_by(|left, right| right.1.cmp(&left.1));

        let mut chosen = vec![candidates[0].0];
        let mut used: HashSet<CellCoord> = HashSet::from([candidates[0].0]);
        while chosen.len() < players {
            let Some(next) = self.furthest_candidate(grid, &candidates, &chosen, &used) else {
                break;
            };
            let _ = used.insert(next);
            chosen.push(next);
        }

        let spawns: Vec<SpawnPoint> = chosen
            .into_iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                PlayerId::from_index(index).map(|player| SpawnPoint { player, cell })
            })
            .collect();
        stamp_spawns(grid, &spawns);
        Ok(spawns)
    }

    fn furthest_candidate(
        &mut self,
        grid: &Grid,
        candidates: &[(CellCoord, u32)],
        chosen: &[CellCoord],
        used: &HashSet<CellCoord>,
    ) -> Option<CellCoord> {
        let mut best: Option<(f64, CellCoord)> = None;
        for &(cell, depth) in candidates {
            if used.contains(&cell) {
                continue;
            }

            let total: f64 = chosen
                .iter()
                .map(|&spawn| {
                    let walked = self.finder.find(grid, spawn, cell, |tile| tile == Tile::Free);
                    walked.len() as f64 + DEPTH_WEIGHT * f64::from(depth)
                })
                .sum();
            let score = total / chosen.len() as f64;

            if best.map_or(true, |(current, _)| score > current) {
                best = Some((score, cell));
            }
        }
        best.map(|(_, cell)| cell)
    }
}

/// Writes spawn markers and turns their open or walled orthogonal
/// neighbours into safe cells.
fn stamp_spawns(grid: &mut Grid, spawns: &[SpawnPoint]) {
    for spawn in spawns {
        grid.set(spawn.cell, Tile::Spawn(spawn.player));
    }

    for spawn in spawns {
        let neighbours: Vec<CellCoord> = grid.cardinal_neighbours(spawn.cell).collect();
        for neighbour in neighbours {
            if matches!(grid.get(neighbour), Some(Tile::Free | Tile::Restricted)) {
                grid.set(neighbour, Tile::Safe);
            }
        }
    }
}
