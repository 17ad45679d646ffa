#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arena Forge generator.
//!
//! This crate defines the vocabulary every generation phase speaks: cell
//! coordinates and real-valued positions, the closed [`Tile`] alphabet, the
//! dense [`Grid`] that phases read and mutate, and the validated
//! [`GeneratorConfig`]. Systems receive grids by reference and never own
//! global state; only the generator owns the random source.

use std::{
    fmt,
    ops::{Add, Div, Mul, Sub},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of players a single arena can host.
///
/// Spawn markers are rendered as base-36 digits, so the alphabet stops at `z`.
pub const MAX_PLAYERS: u8 = 35;

/// Offsets of the four orthogonal neighbours of a cell.
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Offsets of the eight cells surrounding a cell.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
];

/// One-based identifier of a player owning a spawn point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Creates a player identifier, rejecting values outside `1..=MAX_PLAYERS`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value == 0 || value > MAX_PLAYERS {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Creates the identifier for the player at the zero-based `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        let value = u8::try_from(index.checked_add(1)?).ok()?;
        Self::new(value)
    }

    /// Retrieves the one-based numeric value of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Closed alphabet of symbols a grid cell may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable wall.
    Restricted,
    /// Open floor.
    Free,
    /// Destructible obstacle scattered over open floor.
    Blocked,
    /// Buffer cell around a spawn that obstacles never occupy.
    Safe,
    /// Spawn point owned by a single player.
    Spawn(PlayerId),
}

impl Tile {
    /// Canonical single-character symbol for the tile.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Restricted => '#',
            Self::Free => ' ',
            Self::Blocked => 'X',
            Self::Safe => 'S',
            Self::Spawn(player) => char::from_digit(u32::from(player.get()), 36).unwrap_or('?'),
        }
    }

    /// Parses a canonical symbol back into a tile.
    #[must_use]
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Restricted),
            ' ' => Some(Self::Free),
            'X' => Some(Self::Blocked),
            'S' => Some(Self::Safe),
            digit @ ('1'..='9' | 'a'..='z') => {
                let value = digit.to_digit(36)?;
                PlayerId::new(u8::try_from(value).ok()?).map(Self::Spawn)
            }
            _ => None,
        }
    }

    /// Reports whether a player can stand on the tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Free | Self::Safe | Self::Spawn(_))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev (king move) distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Shifts the coordinate by a signed offset.
    ///
    /// Returns `None` when either component would become negative or overflow.
    /// Grid bounds are not checked; see [`Grid::offset`].
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }

    /// Converts the cell into a real-valued position.
    #[must_use]
    pub fn to_position(self) -> Position {
        Position::new(f64::from(self.column), f64::from(self.row))
    }
}

/// Real-valued 2D vector used for centroids and Euclidean distances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a position from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        (self - other).magnitude()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, scale: f64) -> Position {
        Position::new(self.x * scale, self.y * scale)
    }
}

impl Div<f64> for Position {
    type Output = Position;

    fn div(self, divisor: f64) -> Position {
        Position::new(self.x / divisor, self.y / divisor)
    }
}

/// Dense row-major table of tiles describing one arena.
///
/// Dimensions are fixed at construction. Every cell always holds exactly one
/// [`Tile`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid where every cell holds `fill`.
    #[must_use]
    pub fn new(width: u32, height: u32, fill: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; cell_count(width, height)],
        }
    }

    /// Parses a grid from rows of canonical glyphs.
    ///
    /// Every row must have the same length and contain only glyphs produced by
    /// [`Tile::glyph`].
    pub fn from_glyph_rows(rows: &[&str]) -> Result<Self, GridParseError> {
        let height = u32::try_from(rows.len()).map_err(|_| GridParseError::TooLarge)?;
        let width = rows.first().map_or(0, |row| row.chars().count());
        let width = u32::try_from(width).map_err(|_| GridParseError::TooLarge)?;

        let mut tiles = Vec::with_capacity(cell_count(width, height));
        for (row_index, row) in rows.iter().enumerate() {
            let row_width = row.chars().count();
            if u32::try_from(row_width).ok() != Some(width) {
                return Err(GridParseError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row_width,
                });
            }

            for glyph in row.chars() {
                let tile = Tile::from_glyph(glyph).ok_or(GridParseError::UnknownGlyph(glyph))?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the grid has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Returns the tile stored at the provided cell, if it lies in the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Overwrites the tile stored at the provided cell.
    ///
    /// Writing outside the grid is a programmer error.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) {
        let Some(slot) = self.index(cell).and_then(|index| self.tiles.get_mut(index)) else {
            debug_assert!(false, "write outside grid at {cell:?}");
            return;
        };
        *slot = tile;
    }

    /// Returns the in-bounds cell located at a signed offset from `cell`.
    #[must_use]
    pub fn offset(&self, cell: CellCoord, dx: i32, dy: i32) -> Option<CellCoord> {
        cell.offset(dx, dy).filter(|shifted| self.contains(*shifted))
    }

    /// Iterates the in-bounds orthogonal neighbours of `cell`.
    pub fn cardinal_neighbours(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        CARDINAL_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(cell, dx, dy))
    }

    /// Iterates the in-bounds cells surrounding `cell`, diagonals included.
    pub fn moore_neighbours(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        MOORE_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(cell, dx, dy))
    }

    /// Reports whether the cell lies on the outermost ring of the grid.
    #[must_use]
    pub fn is_on_edge(&self, cell: CellCoord) -> bool {
        self.contains(cell)
            && (cell.column() == 0
                || cell.row() == 0
                || cell.column() + 1 == self.width
                || cell.row() + 1 == self.height)
    }

    /// Iterates every cell coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Iterates every cell together with its tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        self.cells().zip(self.tiles.iter().copied())
    }

    /// Counts the cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }

    /// Renders each row as a string of canonical glyphs.
    #[must_use]
    pub fn glyph_rows(&self) -> Vec<String> {
        let width = usize::try_from(self.width).unwrap_or(0);
        if width == 0 {
            return vec![String::new(); usize::try_from(self.height).unwrap_or(0)];
        }

        self.tiles
            .chunks(width)
            .map(|row| row.iter().map(|tile| tile.glyph()).collect())
            .collect()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.glyph_rows().iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

/// Reasons a glyph listing could not be parsed into a [`Grid`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    /// A row's length differs from the first row.
    #[error("row {row} has {found} glyphs, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: u32,
        /// Width of the offending row.
        found: usize,
    },
    /// The listing contains a symbol outside the tile alphabet.
    #[error("unknown glyph {0:?}")]
    UnknownGlyph(char),
    /// The listing exceeds the addressable grid size.
    #[error("grid listing is too large")]
    TooLarge,
}

/// Dense set of cells sized to match a grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CellMask {
    /// Creates an empty mask covering a `width`×`height` grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; cell_count(width, height)],
        }
    }

    /// Creates an empty mask with the same dimensions as `grid`.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    /// Adds the cell to the mask, returning `true` if it was not yet present.
    ///
    /// Cells outside the mask bounds are ignored and report `false`.
    pub fn insert(&mut self, cell: CellCoord) -> bool {
        let Some(bit) = self.index(cell).and_then(|index| self.bits.get_mut(index)) else {
            return false;
        };
        let inserted = !*bit;
        *bit = true;
        inserted
    }

    /// Reports whether the cell belongs to the mask.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.bits.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of cells in the mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Reports whether the mask holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|bit| *bit)
    }

    /// Iterates the cells in the mask in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width.max(1);
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % width, index / width))
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// How the cellular automaton decides when to stop smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Smoothing {
    /// Run exactly the provided number of ticks.
    Fixed(u32),
    /// Run until the modified-cell count stops changing, capped at `max_ticks`.
    UntilStable {
        /// Upper bound on the number of ticks.
        max_ticks: u32,
    },
}

/// Tuning knobs controlling every phase of arena generation.
///
/// Missing fields fall back to their defaults when deserialised, so partial
/// configuration files are accepted. Call [`GeneratorConfig::validate`]
/// before use; the generator does so on construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// A wall with strictly more open neighbours than this becomes open.
    pub birth_rate: u32,
    /// An open cell with strictly fewer open neighbours than this becomes a wall.
    pub death_limit: u32,
    /// Chance that a seeded cell starts as a wall.
    pub initial_chance: f64,
    /// Fixed smoothing tick count; `None` smooths until stable.
    pub iterations: Option<u32>,
    /// Upper bound on ticks when smoothing until stable.
    pub max_smoothing: u32,
    /// Chance that an open cell receives an obstacle.
    pub obstacle_chance: f64,
    /// Radius of the disc stamped along every carved passage.
    pub passage_size: u32,
    /// Keeps carved passages free of obstacles so linking survives decoration.
    pub protect_passages: bool,
    /// Number of full pipeline attempts before giving up on spawn placement.
    pub max_attempts: u32,
    /// Seed for the generator's random stream; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Checks every field against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.birth_rate > 8 {
            return Err(ConfigError::NeighbourThreshold {
                field: "birth_rate",
                value: self.birth_rate,
            });
        }
        if self.death_limit > 8 {
            return Err(ConfigError::NeighbourThreshold {
                field: "death_limit",
                value: self.death_limit,
            });
        }
        check_probability("initial_chance", self.initial_chance)?;
        check_probability("obstacle_chance", self.obstacle_chance)?;
        if self.passage_size == 0 {
            return Err(ConfigError::PassageTooNarrow);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(())
    }

    /// Smoothing policy described by `iterations` and `max_smoothing`.
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        match self.iterations {
            Some(ticks) => Smoothing::Fixed(ticks),
            None => Smoothing::UntilStable {
                max_ticks: self.max_smoothing,
            },
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            birth_rate: 4,
            death_limit: 3,
            initial_chance: 0.55,
            iterations: None,
            max_smoothing: 25,
            obstacle_chance: 0.25,
            passage_size: 1,
            protect_passages: false,
            max_attempts: 64,
            seed: None,
        }
    }
}

/// Reasons a [`GeneratorConfig`] fails validation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A neighbour threshold exceeds the eight cells of a neighbourhood.
    #[error("{field} must be at most 8, got {value}")]
    NeighbourThreshold {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: u32,
    },
    /// A probability lies outside `[0, 1]` or is not finite.
    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f64,
    },
    /// Passages narrower than radius one cannot connect across diagonal steps.
    #[error("passage_size must be at least 1")]
    PassageTooNarrow,
    /// Generation needs at least one attempt.
    #[error("max_attempts must be at least 1")]
    NoAttempts,
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

fn cell_count(width: u32, height: u32) -> usize {
    let width = usize::try_from(width).unwrap_or(0);
    let height = usize::try_from(height).unwrap_or(0);
    width.checked_mul(height).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
        assert_eq!(origin.chebyshev_distance(destination), 3);
    }

    #[test]
    fn offset_rejects_negative_components() {
        let cell = CellCoord::new(0, 2);
        assert_eq!(cell.offset(-1, 0), None);
        assert_eq!(cell.offset(1, -2), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn position_arithmetic() {
        let a = Position::new(1.0, 2.0);
        let b = Position::new(4.0, 6.0);
        assert_eq!(b - a, Position::new(3.0, 4.0));
        assert_eq!(a + b, Position::new(5.0, 8.0));
        assert_eq!(a * 2.0, Position::new(2.0, 4.0));
        assert_eq!(b / 2.0, Position::new(2.0, 3.0));
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn player_ids_are_one_based_and_bounded() {
        assert_eq!(PlayerId::new(0), None);
        assert_eq!(PlayerId::from_index(0), PlayerId::new(1));
        assert_eq!(PlayerId::new(MAX_PLAYERS + 1), None);
        assert_eq!(PlayerId::from_index(usize::from(MAX_PLAYERS)), None);
    }

    #[test]
    fn glyphs_round_trip_through_the_alphabet() {
        let tiles = [
            Tile::Restricted,
            Tile::Free,
            Tile::Blocked,
            Tile::Safe,
            Tile::Spawn(PlayerId::new(1).expect("valid id")),
            Tile::Spawn(PlayerId::new(12).expect("valid id")),
        ];
        for tile in tiles {
            assert_eq!(Tile::from_glyph(tile.glyph()), Some(tile));
        }
        assert_eq!(Tile::Spawn(PlayerId::new(12).expect("valid id")).glyph(), 'c');
        assert_eq!(Tile::from_glyph('0'), None);
        assert_eq!(Tile::from_glyph('?'), None);
        assert_eq!(Tile::from_glyph('A'), None);
        assert_eq!(Tile::from_glyph('Z'), None);
        assert_eq!(
            Tile::from_glyph('z'),
            PlayerId::new(35).map(Tile::Spawn)
        );
        assert!(Grid::from_glyph_rows(&["#A#"]).is_err());
    }

    #[test]
    fn grid_parses_and_renders_rows() {
        let grid = Grid::from_glyph_rows(&["###", "# 1", "#XS"]).expect("valid rows");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(CellCoord::new(1, 1)), Some(Tile::Free));
        assert_eq!(grid.get(CellCoord::new(1, 2)), Some(Tile::Blocked));
        assert_eq!(grid.get(CellCoord::new(3, 0)), None);
        assert_eq!(grid.to_string(), "###\n# 1\n#XS");
        assert_eq!(grid.count(Tile::Restricted), 5);
    }

    #[test]
    fn grid_rejects_ragged_rows() {
        let error = Grid::from_glyph_rows(&["###", "#"]).expect_err("ragged rows");
        assert_eq!(
            error,
            GridParseError::RaggedRow {
                row: 1,
                expected: 3,
                found: 1,
            }
        );
    }

    #[test]
    fn neighbours_stay_inside_the_grid() {
        let grid = Grid::new(3, 2, Tile::Free);
        let corner: Vec<_> = grid.cardinal_neighbours(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
        assert_eq!(grid.moore_neighbours(CellCoord::new(1, 0)).count(), 5);
        assert!(grid.is_on_edge(CellCoord::new(2, 1)));
    }

    #[test]
    fn cells_iterate_row_major() {
        let grid = Grid::new(2, 2, Tile::Restricted);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn mask_tracks_membership() {
        let mut mask = CellMask::new(4, 3);
        assert!(mask.insert(CellCoord::new(3, 2)));
        assert!(!mask.insert(CellCoord::new(3, 2)));
        assert!(!mask.insert(CellCoord::new(4, 0)));
        assert!(mask.contains(CellCoord::new(3, 2)));
        assert_eq!(mask.len(), 1);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![CellCoord::new(3, 2)]);
    }

    #[test]
    fn default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.smoothing(), Smoothing::UntilStable { max_ticks: 25 });
    }

    #[test]
    fn config_rejects_out_of_range_values() {
        let config = GeneratorConfig {
            initial_chance: 1.5,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability {
                field: "initial_chance",
                ..
            })
        ));

        let config = GeneratorConfig {
            passage_size: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PassageTooNarrow));

        let config = GeneratorConfig {
            death_limit: 9,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NeighbourThreshold {
                field: "death_limit",
                value: 9,
            })
        ));
    }

    #[test]
    fn partial_config_files_fall_back_to_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"passage_size": 2, "seed": 7}"#).expect("valid json");
        assert_eq!(config.passage_size, 2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.birth_rate, 4);
        assert_eq!(config.iterations, None);
    }
}
