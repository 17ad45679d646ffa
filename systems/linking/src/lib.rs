#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Carves passages until every region connects back to the main region.

use arena_forge_core::{CellCoord, CellMask, Grid, Tile};
use arena_forge_system_regions::{Region, RegionId, RegionIdentifier};

/// Summary of a linking pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkReport {
    rounds: u32,
    passages: u32,
    carved: CellMask,
}

impl LinkReport {
    /// Number of proximity rounds that ran.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Number of passages carved.
    #[must_use]
    pub const fn passages(&self) -> u32 {
        self.passages
    }

    /// Every cell stamped open while carving passages.
    #[must_use]
    pub const fn carved(&self) -> &CellMask {
        &self.carved
    }

    /// Consumes the report, yielding the passage mask.
    #[must_use]
    pub fn into_carved(self) -> CellMask {
        self.carved
    }
}

/// Joins disconnected regions with disc-widened straight passages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionLinker {
    passage_size: u32,
}

impl RegionLinker {
    /// Creates a linker stamping discs of the given radius along passages.
    #[must_use]
    pub const fn new(passage_size: u32) -> Self {
        Self { passage_size }
    }

    /// Radius of the disc stamped at every passage point.
    #[must_use]
    pub const fn passage_size(&self) -> u32 {
        self.passage_size
    }

    /// Links every region in `regions` to the main region, carving the grid.
    ///
    /// Round `k` joins each still-unlinked region to its `k`-th nearest
    /// region by centroid. Once `k` runs past the region list the nearest
    /// region already linked to main is used instead. A round past the
    /// region list that carves nothing ends the pass, so the loop always
    /// terminates.
    pub fn link_all(&self, grid: &mut Grid, regions: &mut RegionIdentifier) -> LinkReport {
        let mut report = LinkReport {
            carved: CellMask::for_grid(grid),
            ..LinkReport::default()
        };
        regions.mark_main();

        let mut round = 0_usize;
        while !regions.all_linked_main() {
            round += 1;
            report.rounds += 1;
            let carved_before = report.passages;

            for index in 0..regions.len() {
                let source = RegionId::new(index);
                let Some(region) = regions.region(source) else {
                    continue;
                };
                if region.is_linked_main() {
                    continue;
                }
                let Some(target) = select_target(regions, source, round) else {
                    continue;
                };
                let Some(other) = regions.region(target) else {
                    continue;
                };
                let Some((from, to)) = closest_pair(region, other) else {
                    continue;
                };

                for point in line_between(from, to) {
                    stamp_disc(grid, point, self.passage_size, &mut report.carved);
                }
                regions.link(source, target);
                report.passages += 1;
            }

            if report.passages == carved_before && round >= regions.len() {
                break;
            }
        }

        report
    }
}

/// Picks the region `source` should link to during `round`.
fn select_target(regions: &RegionIdentifier, source: RegionId, round: usize) -> Option<RegionId> {
    let origin = regions.region(source)?.centroid();
    let distance = |id: RegionId| {
        regions
            .region(id)
            .map_or(f64::INFINITY, |region| region.centroid().distance(origin))
    };

    let mut ordered: Vec<RegionId> = regions.ids().collect();
    ordered.sort_by(|&left, &right| {
        distance(left)
            .total_cmp(&distance(right))
            .then_with(|| (left != source).cmp(&(right != source)))
    });

    if let Some(&target) = ordered.get(round) {
        return Some(target);
    }

    ordered.into_iter().find(|&id| {
        id != source
            && regions
                .region(id)
                .is_some_and(Region::is_linked_main)
    })
}

/// Finds the pair of boundary cells with the smallest Euclidean distance.
///
/// Pairs are scanned source-major; the first minimum wins.
fn closest_pair(source: &Region, target: &Region) -> Option<(CellCoord, CellCoord)> {
    let mut best: Option<(u64, CellCoord, CellCoord)> = None;
    for &from in source.boundary() {
        for &to in target.boundary() {
            let distance = squared_distance(from, to);
            if best.map_or(true, |(current, _, _)| distance < current) {
                best = Some((distance, from, to));
            }
        }
    }
    best.map(|(_, from, to)| (from, to))
}

fn squared_distance(from: CellCoord, to: CellCoord) -> u64 {
    let dx = u64::from(from.column().abs_diff(to.column()));
    let dy = u64::from(from.row().abs_diff(to.row()));
    dx * dx + dy * dy
}

/// Rasterises the straight line from `from` towards `to`.
///
/// `from` is the first point and `to` itself is never emitted; the last
/// point is its neighbour, which the stamped disc bridges. The walk advances one cell along the longer axis per step and moves
/// along the shorter axis whenever the accumulated slope reaches a whole
/// cell. The accumulator starts at half the long delta.
#[must_use]
pub fn line_between(from: CellCoord, to: CellCoord) -> Vec<CellCoord> {
    let dx = i64::from(to.column()) - i64::from(from.column());
    let dy = i64::from(to.row()) - i64::from(from.row());

    let (longest, shortest, step, gradient_step, steep) = if dx.abs() >= dy.abs() {
        (dx.abs(), dy.abs(), dx.signum(), dy.signum(), false)
    } else {
        (dy.abs(), dx.abs(), dy.signum(), dx.signum(), true)
    };

    let mut x = i64::from(from.column());
    let mut y = i64::from(from.row());
    // Doubled so the half-delta start stays integral.
    let mut accumulated = longest;
    let mut line = Vec::with_capacity(usize::try_from(longest).unwrap_or(0));

    for _ in 0..longest {
        line.extend(cell_at(x, y));
        if steep {
            y += step;
        } else {
            x += step;
        }
        accumulated += 2 * shortest;
        if accumulated >= 2 * longest {
            if steep {
                x += gradient_step;
            } else {
                y += gradient_step;
            }
            accumulated -= 2 * longest;
        }
    }
    line
}

fn cell_at(x: i64, y: i64) -> Option<CellCoord> {
    Some(CellCoord::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
}

/// Opens every in-grid cell within `radius` of `centre`, recording each in `carved`.
///
/// A cell belongs to the disc when its squared offset is at most `radius²`.
pub fn stamp_disc(grid: &mut Grid, centre: CellCoord, radius: u32, carved: &mut CellMask) {
    let radius = i32::try_from(radius).unwrap_or(i32::MAX / 2);
    let limit = i64::from(radius) * i64::from(radius);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) > limit {
                continue;
            }
            let Some(cell) = grid.offset(centre, dx, dy) else {
                continue;
            };
            grid.set(cell, Tile::Free);
            let _ = carved.insert(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_to_itself_is_empty() {
        let cell = CellCoord::new(2, 3);
        assert!(line_between(cell, cell).is_empty());
    }

    fn strip(points: &[(u32, u32)]) -> Region {
        let cells = points
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect();
        Region::from_cells(cells, 12, 3)
    }

    #[test]
    fn rounds_past_the_list_fall_back_to_the_nearest_linked_main_region() {
        let mut regions = RegionIdentifier::from_regions(
            Tile::Free,
            vec![
                strip(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]),
                strip(&[(6, 1), (7, 1), (8, 1)]),
                strip(&[(11, 1)]),
            ],
        );
        regions.mark_main();
        let far = RegionId::new(2);

        assert_eq!(select_target(&regions, far, 1), Some(RegionId::new(1)));
        assert_eq!(select_target(&regions, far, 2), Some(RegionId::new(0)));
        assert_eq!(select_target(&regions, far, 3), Some(RegionId::new(0)));

        regions.link(RegionId::new(1), RegionId::new(0));
        assert_eq!(select_target(&regions, far, 7), Some(RegionId::new(1)));
    }

    #[test]
    fn squared_distance_is_symmetric() {
        let a = CellCoord::new(1, 5);
        let b = CellCoord::new(4, 1);
        assert_eq!(squared_distance(a, b), 25);
        assert_eq!(squared_distance(b, a), 25);
    }
}
