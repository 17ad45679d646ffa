#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates cave arenas.

mod settings;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use arena_forge_generator::{Arena, ArenaGenerator};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use crate::settings::{Overrides, Request, SettingsFile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One glyph row per grid row
    Text,
    /// Arena summary as a JSON object
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "arena-forge")]
#[command(about = "Generate cave arenas with linked caverns and player spawns", long_about = None)]
struct Args {
    /// Arena width in cells [default: 40]
    #[arg(long)]
    width: Option<u32>,

    /// Arena height in cells [default: 30]
    #[arg(long)]
    height: Option<u32>,

    /// Number of player spawns to place [default: 2]
    #[arg(long)]
    players: Option<usize>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with generator settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fixed number of smoothing ticks instead of smoothing until stable
    #[arg(long)]
    iterations: Option<u32>,

    /// Tick cap when smoothing until stable
    #[arg(long)]
    max_smoothing: Option<u32>,

    /// Walls with more open neighbours than this open up
    #[arg(long)]
    birth_rate: Option<u32>,

    /// Open cells with fewer open neighbours than this close
    #[arg(long)]
    death_limit: Option<u32>,

    /// Chance that a seeded cell starts as a wall
    #[arg(long)]
    initial_chance: Option<f64>,

    /// Chance that an open cell receives an obstacle
    #[arg(long)]
    obstacle_chance: Option<f64>,

    /// Radius of carved passages
    #[arg(long)]
    passage_size: Option<u32>,

    /// Keep carved passages free of obstacles
    #[arg(long, overrides_with = "no_protect_passages")]
    protect_passages: bool,

    /// Let obstacles land on carved passages, even if the settings file protects them
    #[arg(long, overrides_with = "protect_passages")]
    no_protect_passages: bool,

    /// Attempts before giving up on spawn placement
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log pipeline progress at debug level
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            players: self.players,
            seed: self.seed,
            iterations: self.iterations,
            max_smoothing: self.max_smoothing,
            birth_rate: self.birth_rate,
            death_limit: self.death_limit,
            initial_chance: self.initial_chance,
            obstacle_chance: self.obstacle_chance,
            passage_size: self.passage_size,
            protect_passages: self.protect_passages(),
            max_attempts: self.max_attempts,
        }
    }

    fn protect_passages(&self) -> Option<bool> {
        match (self.protect_passages, self.no_protect_passages) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

/// Entry point for the Arena Forge command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let file = match &args.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let request = Request::resolve(file, args.overrides())?;
    info!(
        "generating {}x{} arena for {} players",
        request.width, request.height, request.players
    );

    let mut generator = ArenaGenerator::new(request.config)?;
    let arena = generator
        .generate_arena(request.width, request.height, request.players)
        .context("arena generation failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&arena, args.format, &mut out)?;
    out.flush()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if verbose {
        let _ = builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn render(arena: &Arena, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for row in arena.grid().glyph_rows() {
                writeln!(out, "{row}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &arena.summary())
                .context("failed to serialise arena")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
