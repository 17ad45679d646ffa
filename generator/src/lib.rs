#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cave arena generation pipeline.
//!
//! [`ArenaGenerator`] drives the systems in a fixed order: seed a noise grid,
//! smooth it into caverns, scan the open regions, carve passages between
//! them, measure depth and place spawns. When spawn placement fails the whole
//! pipeline restarts with fresh randomness, up to the configured attempt cap.
//! A successful attempt is finished off with random obstacles.

mod arena;

use std::fmt;

use arena_forge_core::{ConfigError, GeneratorConfig, Grid, Tile, MAX_PLAYERS};
use arena_forge_system_automaton::CellularAutomaton;
use arena_forge_system_linking::RegionLinker;
use arena_forge_system_obstacles::ObstacleScatter;
use arena_forge_system_regions::RegionIdentifier;
use arena_forge_system_spawning::{SpawnError, SpawnPlacer};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use arena::{Arena, ArenaSummary};

/// Stage the generator is currently executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Filling a fresh grid with random walls.
    Seeding,
    /// Running the cellular automaton.
    Smoothing,
    /// Labelling open regions.
    RegionScan,
    /// Carving passages between regions.
    Linking,
    /// Measuring how far each open cell sits from a wall.
    DepthAnalysis,
    /// Choosing spawn cells.
    SpawnAttempt,
    /// Scattering obstacles.
    Decorating,
    /// Generation finished.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Seeding => "seeding",
            Self::Smoothing => "smoothing",
            Self::RegionScan => "region scan",
            Self::Linking => "linking",
            Self::DepthAnalysis => "depth analysis",
            Self::SpawnAttempt => "spawn attempt",
            Self::Decorating => "decorating",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Reasons arena generation can fail.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The requested grid has no cells.
    #[error("cannot generate a {width}x{height} arena")]
    DegenerateDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The player count is zero or exceeds the spawn marker alphabet.
    #[error("player count must be between 1 and {max}, got {players}", max = MAX_PLAYERS)]
    InvalidPlayerCount {
        /// Requested player count.
        players: usize,
    },
    /// Every attempt failed to place the spawns.
    #[error("no arena with room for every spawn after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Failure reported by the last attempt.
        source: SpawnError,
    },
}

/// Builds playable cave arenas from a validated configuration.
#[derive(Debug)]
pub struct ArenaGenerator<R = ChaCha8Rng> {
    config: GeneratorConfig,
    rng: R,
    placer: SpawnPlacer,
    phase: Phase,
}

impl ArenaGenerator<ChaCha8Rng> {
    /// Creates a generator seeded from `config.seed`, or from OS entropy when
    /// no seed is set.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> ArenaGenerator<R> {
    /// Creates a generator drawing from the supplied random source.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(config: GeneratorConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            placer: SpawnPlacer::new(),
            phase: Phase::Seeding,
        })
    }

    /// Configuration the generator was built with.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Phase reached by the most recent generation run.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Generates an arena and returns only its grid.
    pub fn generate(
        &mut self,
        width: u32,
        height: u32,
        players: usize,
    ) -> Result<Grid, GenerationError> {
        self.generate_arena(width, height, players)
            .map(Arena::into_grid)
    }

    /// Generates an arena with `players` spawn points.
    pub fn generate_arena(
        &mut self,
        width: u32,
        height: u32,
        players: usize,
    ) -> Result<Arena, GenerationError> {
        if width == 0 || height == 0 {
            return Err(GenerationError::DegenerateDimensions { width, height });
        }
        if players == 0 || players > usize::from(MAX_PLAYERS) {
            return Err(GenerationError::InvalidPlayerCount { players });
        }

        let max_attempts = self.config.max_attempts;
        let mut last_failure = None;
        for attempt in 1..=max_attempts {
            info!(
                "generating {width}x{height} arena for {players} players (attempt {attempt}/{max_attempts})"
            );
            match self.run_attempt(width, height, players, attempt) {
                Ok(arena) => {
                    info!(
                        "arena ready after {attempt} attempt(s) with {} obstacles",
                        arena.obstacles
                    );
                    return Ok(arena);
                }
                Err(error) => {
                    warn!("attempt {attempt} failed: {error}; restarting");
                    last_failure = Some(error);
                }
            }
        }

        Err(GenerationError::AttemptsExhausted {
            attempts: max_attempts,
            source: last_failure.unwrap_or(SpawnError::InsufficientSpace {
                required: players,
                available: 0,
            }),
        })
    }

    fn run_attempt(
        &mut self,
        width: u32,
        height: u32,
        players: usize,
        attempt: u32,
    ) -> Result<Arena, SpawnError> {
        self.enter(Phase::Seeding);
        let mut grid =
            CellularAutomaton::seed(width, height, self.config.initial_chance, &mut self.rng);

        self.enter(Phase::Smoothing);
        let automaton = CellularAutomaton::new(self.config.birth_rate, self.config.death_limit);
        let ticks = automaton.smooth(&mut grid, self.config.smoothing());
        debug!("smoothing ran {ticks} ticks");

        self.enter(Phase::RegionScan);
        let mut regions = RegionIdentifier::scan(&grid, Tile::Free);
        debug!(
            "found {} regions covering {} cells",
            regions.len(),
            regions.cell_count()
        );

        self.enter(Phase::Linking);
        let report = RegionLinker::new(self.config.passage_size).link_all(&mut grid, &mut regions);
        debug!(
            "carved {} passages over {} rounds",
            report.passages(),
            report.rounds()
        );

        self.enter(Phase::DepthAnalysis);
        regions.analyse_depth();

        self.enter(Phase::SpawnAttempt);
        let spawns = self.placer.place(&mut grid, &regions, players)?;

        self.enter(Phase::Decorating);
        let passages = report.into_carved();
        let protected = self.config.protect_passages.then_some(&passages);
        let obstacles = ObstacleScatter::new(self.config.obstacle_chance).scatter(
            &mut grid,
            &mut self.rng,
            protected,
        );

        self.enter(Phase::Done);
        Ok(Arena {
            grid,
            spawns,
            attempts: attempt,
            passages,
            obstacles,
        })
    }

    fn enter(&mut self, phase: Phase) {
        debug!("entering {phase}");
        self.phase = phase;
    }
}
