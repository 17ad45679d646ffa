#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connected-region discovery and per-region analysis.
//!
//! [`RegionIdentifier::scan`] labels the 4-connected components of one tile
//! kind and owns the resulting [`Region`] list together with the link graph
//! the linker grows while carving passages. Regions are sorted by size, so
//! index 0 is always the main region.

use std::collections::{HashMap, HashSet, VecDeque};

use arena_forge_core::{CellCoord, CellMask, Grid, Position, Tile, CARDINAL_OFFSETS, MOORE_OFFSETS};

/// Index of a region within its [`RegionIdentifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    /// Creates a region identifier from its index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Retrieves the underlying index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// One connected component of open cells captured at scan time.
#[derive(Clone, Debug)]
pub struct Region {
    cells: Vec<CellCoord>,
    members: HashSet<CellCoord>,
    centroid: Position,
    boundary: Vec<CellCoord>,
    depth: HashMap<CellCoord, u32>,
    grid_width: u32,
    grid_height: u32,
    links: Vec<RegionId>,
    linked_main: bool,
}

impl Region {
    /// Builds a region from its member cells on a `grid_width`×`grid_height` grid.
    ///
    /// Duplicate cells are ignored. The centroid and boundary are computed
    /// immediately; depth waits for [`Region::analyse_depth`].
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>, grid_width: u32, grid_height: u32) -> Self {
        let mut members = HashSet::with_capacity(cells.len());
        let cells: Vec<CellCoord> = cells
            .into_iter()
            .filter(|cell| members.insert(*cell))
            .collect();

        let sum = cells
            .iter()
            .fold(Position::default(), |sum, cell| sum + cell.to_position());
        let centroid = if cells.is_empty() {
            sum
        } else {
            sum / cells.len() as f64
        };

        let mut region = Self {
            cells,
            members,
            centroid,
            boundary: Vec::new(),
            depth: HashMap::new(),
            grid_width,
            grid_height,
            links: Vec::new(),
            linked_main: false,
        };
        region.boundary = region.find_boundary();
        region
    }

    /// Member cells in discovery order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of member cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the region holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the cell belongs to the region.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.members.contains(&cell)
    }

    /// Mean coordinate of the member cells.
    #[must_use]
    pub const fn centroid(&self) -> Position {
        self.centroid
    }

    /// Members on the grid edge or orthogonally adjacent to a non-member.
    #[must_use]
    pub fn boundary(&self) -> &[CellCoord] {
        &self.boundary
    }

    /// Depth of a member cell, available once [`Region::analyse_depth`] ran.
    #[must_use]
    pub fn depth(&self, cell: CellCoord) -> Option<u32> {
        self.depth.get(&cell).copied()
    }

    /// Reports whether depth analysis populated every member.
    #[must_use]
    pub fn is_depth_analysed(&self) -> bool {
        self.depth.len() == self.cells.len()
    }

    /// Regions this region was linked to, duplicates included.
    #[must_use]
    pub fn links(&self) -> &[RegionId] {
        &self.links
    }

    /// Reports whether a chain of links connects the region to the main region.
    #[must_use]
    pub const fn is_linked_main(&self) -> bool {
        self.linked_main
    }

    /// Computes the distance-to-boundary of every member.
    ///
    /// A member on the outer ring of the grid has depth 0. Otherwise the
    /// depth is the king-move hop count to the nearest cell outside the
    /// region, capped by the hop count to the grid's outer ring. A single
    /// breadth-first pass seeded from both kinds of edge produces the values.
    pub fn analyse_depth(&mut self) {
        self.depth.clear();
        let mut queue = VecDeque::new();

        for &cell in &self.cells {
            if self.on_grid_edge(cell) {
                let _ = self.depth.insert(cell, 0);
                queue.push_back(cell);
            }
        }

        for &cell in &self.cells {
            if self.depth.contains_key(&cell) {
                continue;
            }
            let touches_outside = MOORE_OFFSETS.iter().any(|&(dx, dy)| {
                self.in_grid(cell, dx, dy)
                    .is_some_and(|neighbour| !self.members.contains(&neighbour))
            });
            if touches_outside {
                let _ = self.depth.insert(cell, 1);
                queue.push_back(cell);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(&current) = self.depth.get(&cell) else {
                continue;
            };
            for &(dx, dy) in &MOORE_OFFSETS {
                let Some(neighbour) = self.in_grid(cell, dx, dy) else {
                    continue;
                };
                if !self.members.contains(&neighbour) || self.depth.contains_key(&neighbour) {
                    continue;
                }
                let _ = self.depth.insert(neighbour, current + 1);
                queue.push_back(neighbour);
            }
        }
    }

    fn find_boundary(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .copied()
            .filter(|&cell| {
                self.on_grid_edge(cell)
                    || CARDINAL_OFFSETS
                        .iter()
                        .any(|&(dx, dy)| match self.in_grid(cell, dx, dy) {
                            Some(neighbour) => !self.members.contains(&neighbour),
                            None => true,
                        })
            })
            .collect()
    }

    fn on_grid_edge(&self, cell: CellCoord) -> bool {
        cell.column() == 0
            || cell.row() == 0
            || cell.column() + 1 >= self.grid_width
            || cell.row() + 1 >= self.grid_height
    }

    fn in_grid(&self, cell: CellCoord, dx: i32, dy: i32) -> Option<CellCoord> {
        cell.offset(dx, dy)
            .filter(|shifted| shifted.column() < self.grid_width && shifted.row() < self.grid_height)
    }
}

/// Ordered set of regions discovered on one grid snapshot.
#[derive(Clone, Debug)]
pub struct RegionIdentifier {
    target: Tile,
    regions: Vec<Region>,
}

impl RegionIdentifier {
    /// Labels every 4-connected component of `target` cells on the grid.
    ///
    /// Regions are sorted by member count, largest first; equal sizes keep
    /// their discovery order.
    #[must_use]
    pub fn scan(grid: &Grid, target: Tile) -> Self {
        let mut visited = CellMask::for_grid(grid);
        let mut regions = Vec::new();

        for start in grid.cells() {
            if grid.get(start) != Some(target) || !visited.insert(start) {
                continue;
            }

            let mut cells = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(cell) = queue.pop_front() {
                cells.push(cell);
                for neighbour in grid.cardinal_neighbours(cell) {
                    if grid.get(neighbour) == Some(target) && visited.insert(neighbour) {
                        queue.push_back(neighbour);
                    }
                }
            }

            regions.push(Region::from_cells(cells, grid.width(), grid.height()));
        }

        Self::from_regions(target, regions)
    }

    /// Wraps hand-built regions, sorting them the same way [`scan`](Self::scan) does.
    ///
    /// Regions without cells are dropped; they have no boundary to link through.
    #[must_use]
    pub fn from_regions(target: Tile, mut regions: Vec<Region>) -> Self {
        regions.retain(|region| !region.is_empty());
        regions.sort_by(|left, right| right.len().cmp(&left.len()));
        Self { target, regions }
    }

    /// Tile kind the regions were built from.
    #[must_use]
    pub const fn target(&self) -> Tile {
        self.target
    }

    /// Regions ordered by size, largest first.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Looks up a region by identifier.
    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.get())
    }

    /// Identifiers of every region in order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> {
        (0..self.regions.len()).map(RegionId::new)
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Reports whether no region was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Largest region, if any.
    #[must_use]
    pub fn main(&self) -> Option<&Region> {
        self.regions.first()
    }

    /// Total number of member cells across all regions.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.regions.iter().map(Region::len).sum()
    }

    /// Runs depth analysis for every region.
    pub fn analyse_depth(&mut self) {
        for region in &mut self.regions {
            region.analyse_depth();
        }
    }

    /// Flags the largest region as linked to main.
    pub fn mark_main(&mut self) {
        if let Some(main) = self.regions.first_mut() {
            main.linked_main = true;
        }
    }

    /// Reports whether every region is linked to main.
    #[must_use]
    pub fn all_linked_main(&self) -> bool {
        self.regions.iter().all(Region::is_linked_main)
    }

    /// Records a mutual link and spreads the linked-main flag across it.
    ///
    /// Links are recorded even when the pair was already linked.
    pub fn link(&mut self, first: RegionId, second: RegionId) {
        if first.get() >= self.regions.len() || second.get() >= self.regions.len() {
            debug_assert!(false, "link between unknown regions {first:?} and {second:?}");
            return;
        }

        self.regions[first.get()].links.push(second);
        self.regions[second.get()].links.push(first);

        if self.regions[first.get()].linked_main {
            self.propagate_main(second);
        } else if self.regions[second.get()].linked_main {
            self.propagate_main(first);
        }
    }

    fn propagate_main(&mut self, start: RegionId) {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let Some(region) = self.regions.get_mut(id.get()) else {
                continue;
            };
            if region.linked_main {
                continue;
            }
            region.linked_main = true;
            pending.extend(region.links.iter().copied());
        }
    }
}
