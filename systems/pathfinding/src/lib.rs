#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A* search over the four-connected arena grid.

use std::{cmp::Reverse, collections::BinaryHeap};

use arena_forge_core::{CellCoord, Grid, Tile};

/// Ordered cells leading from a start cell to a goal.
///
/// The start cell is not part of the path; the goal is its last cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Number of steps along the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the path has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells visited after leaving the start, in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Final cell of the path.
    #[must_use]
    pub fn goal(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Iterates the cells in travel order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }
}

/// Reusable A* search workspace.
///
/// Score and parent buffers are kept between calls and resized only when
/// the grid dimensions change.
#[derive(Debug, Default)]
pub struct PathFinder {
    prepared_dimensions: Option<(u32, u32)>,
    g_scores: Vec<u32>,
    parents: Vec<Option<usize>>,
    closed: Vec<bool>,
    open: BinaryHeap<Reverse<(u32, u64, usize)>>,
}

impl PathFinder {
    /// Creates an empty search workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a shortest four-connected path from `start` to `goal`.
    ///
    /// Only cells whose tile satisfies `traversable` may be entered; the
    /// start cell itself is never tested. Open cells are expanded by lowest
    /// `g + h` with Manhattan `h`, ties going to the cell queued first.
    /// Returns an empty path when the goal is unreachable, equals the start,
    /// or lies outside the grid.
    pub fn find<F>(&mut self, grid: &Grid, start: CellCoord, goal: CellCoord, traversable: F) -> Path
    where
        F: Fn(Tile) -> bool,
    {
        if start == goal || !grid.contains(start) || !grid.contains(goal) {
            return Path::default();
        }

        let width = grid.width();
        self.prepare_workspace(grid.width(), grid.height());
        let (Some(start_index), Some(goal_index)) = (index(start, width), index(goal, width)) else {
            return Path::default();
        };

        let mut sequence = 0_u64;
        self.g_scores[start_index] = 0;
        self.open
            .push(Reverse((start.manhattan_distance(goal), sequence, start_index)));

        while let Some(Reverse((_, _, current))) = self.open.pop() {
            if self.closed[current] {
                continue;
            }
            if current == goal_index {
                return self.trace(goal_index, width);
            }
            self.closed[current] = true;

            let Some(cell) = coord(current, width) else {
                continue;
            };
            let next_g = self.g_scores[current].saturating_add(1);
            for neighbour in grid.cardinal_neighbours(cell) {
                if !grid.get(neighbour).is_some_and(&traversable) {
                    continue;
                }
                let Some(neighbour_index) = index(neighbour, width) else {
                    continue;
                };
                if self.closed[neighbour_index] || next_g >= self.g_scores[neighbour_index] {
                    continue;
                }

                self.g_scores[neighbour_index] = next_g;
                self.parents[neighbour_index] = Some(current);
                sequence += 1;
                let f = next_g.saturating_add(neighbour.manhattan_distance(goal));
                self.open.push(Reverse((f, sequence, neighbour_index)));
            }
        }

        Path::default()
    }

    fn prepare_workspace(&mut self, columns: u32, rows: u32) {
        let node_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        if self.prepared_dimensions != Some((columns, rows)) {
            self.prepared_dimensions = Some((columns, rows));
            self.g_scores.resize(node_count, u32::MAX);
            self.parents.resize(node_count, None);
            self.closed.resize(node_count, false);
        }

        self.g_scores.fill(u32::MAX);
        self.parents.fill(None);
        self.closed.fill(false);
        self.open.clear();
    }

    fn trace(&self, goal_index: usize, width: u32) -> Path {
        let mut cells = Vec::new();
        let mut current = Some(goal_index);
        while let Some(node) = current {
            let Some(parent) = self.parents[node] else {
                break;
            };
            cells.extend(coord(node, width));
            current = Some(parent);
        }
        cells.reverse();
        Path { cells }
    }
}

fn index(cell: CellCoord, width: u32) -> Option<usize> {
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(width).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn coord(index: usize, width: u32) -> Option<CellCoord> {
    let index = u32::try_from(index).ok()?;
    let width = width.max(1);
    Some(CellCoord::new(index % width, index / width))
}
