use std::{
    collections::{hash_map::DefaultHasher, HashSet},
    hash::{Hash, Hasher},
};

use arena_forge_core::{ConfigError, GeneratorConfig, Grid, PlayerId, Tile};
use arena_forge_generator::{ArenaGenerator, GenerationError, Phase};
use arena_forge_system_pathfinding::PathFinder;
use arena_forge_system_spawning::SpawnError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn seeded(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        seed: Some(seed),
        ..GeneratorConfig::default()
    }
}

fn fingerprint(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn small_default_arena_succeeds() {
    let mut generator = ArenaGenerator::new(seeded(11)).expect("valid config");
    let arena = generator.generate_arena(10, 10, 2).expect("arena");

    assert_eq!(generator.phase(), Phase::Done);
    assert!(arena.attempts() >= 1);
    assert!(arena.attempts() <= generator.config().max_attempts);
    assert_eq!(arena.grid().width(), 10);
    assert_eq!(arena.grid().height(), 10);
    assert_eq!(arena.spawns().len(), 2);
}

#[test]
fn every_cell_belongs_to_the_alphabet() {
    let mut generator = ArenaGenerator::new(seeded(3)).expect("valid config");
    let grid = generator.generate(30, 20, 3).expect("arena");

    for (cell, tile) in grid.iter() {
        match tile {
            Tile::Restricted | Tile::Free | Tile::Blocked | Tile::Safe => {}
            Tile::Spawn(player) => assert!(
                (1..=3).contains(&player.get()),
                "unexpected spawn {player:?} at {cell:?}"
            ),
        }
    }
    let rendered = grid.to_string();
    assert!(rendered
        .chars()
        .all(|glyph| matches!(glyph, '#' | ' ' | 'X' | 'S' | '1' | '2' | '3' | '\n')));
}

#[test]
fn spawns_are_distinct_and_ringed_with_safe_cells() {
    let mut generator = ArenaGenerator::new(seeded(2024)).expect("valid config");
    let arena = generator.generate_arena(40, 30, 4).expect("arena");
    let grid = arena.grid();

    let cells: HashSet<_> = arena.spawns().iter().map(|spawn| spawn.cell).collect();
    assert_eq!(cells.len(), 4);

    for (index, spawn) in arena.spawns().iter().enumerate() {
        assert_eq!(PlayerId::from_index(index), Some(spawn.player));
        assert_eq!(grid.get(spawn.cell), Some(Tile::Spawn(spawn.player)));
        for neighbour in grid.cardinal_neighbours(spawn.cell) {
            assert!(matches!(
                grid.get(neighbour),
                Some(Tile::Safe | Tile::Spawn(_))
            ));
        }
    }

    let markers = grid
        .iter()
        .filter(|(_, tile)| matches!(tile, Tile::Spawn(_)))
        .count();
    assert_eq!(markers, 4);
}

#[test]
fn identical_seeds_produce_identical_arenas() {
    let first = ArenaGenerator::new(seeded(0x4d59_5df4))
        .expect("valid config")
        .generate(36, 24, 2)
        .expect("arena");
    let second = ArenaGenerator::new(seeded(0x4d59_5df4))
        .expect("valid config")
        .generate(36, 24, 2)
        .expect("arena");

    assert_eq!(fingerprint(&first), fingerprint(&second));
    assert_eq!(first, second);
}

#[test]
fn injected_rng_overrides_the_configured_seed() {
    let config = seeded(1);
    let first = ArenaGenerator::with_rng(config.clone(), ChaCha8Rng::seed_from_u64(77))
        .expect("valid config")
        .generate(24, 18, 2)
        .expect("arena");
    let second = ArenaGenerator::with_rng(seeded(999), ChaCha8Rng::seed_from_u64(77))
        .expect("valid config")
        .generate(24, 18, 2)
        .expect("arena");
    assert_eq!(first, second);
}

#[test]
fn consecutive_runs_draw_fresh_randomness() {
    let mut generator = ArenaGenerator::new(seeded(5)).expect("valid config");
    let first = generator.generate(30, 20, 2).expect("arena");
    let second = generator.generate(30, 20, 2).expect("arena");
    assert_ne!(fingerprint(&first), fingerprint(&second));
}

#[test]
fn degenerate_dimensions_are_rejected() {
    let mut generator = ArenaGenerator::new(seeded(1)).expect("valid config");
    assert_eq!(
        generator.generate(0, 10, 2),
        Err(GenerationError::DegenerateDimensions {
            width: 0,
            height: 10,
        })
    );
}

#[test]
fn player_counts_outside_the_alphabet_are_rejected() {
    let mut generator = ArenaGenerator::new(seeded(1)).expect("valid config");
    assert_eq!(
        generator.generate(10, 10, 0),
        Err(GenerationError::InvalidPlayerCount { players: 0 })
    );
    assert_eq!(
        generator.generate(10, 10, 36),
        Err(GenerationError::InvalidPlayerCount { players: 36 })
    );
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let config = GeneratorConfig {
        obstacle_chance: -0.1,
        ..GeneratorConfig::default()
    };
    assert!(matches!(
        ArenaGenerator::new(config),
        Err(ConfigError::Probability {
            field: "obstacle_chance",
            ..
        })
    ));
}

#[test]
fn exhausted_attempts_report_the_last_failure() {
    // A 3x3 arena has a single interior cell, so two players never fit.
    let config = GeneratorConfig {
        max_attempts: 3,
        initial_chance: 0.0,
        iterations: Some(0),
        ..seeded(8)
    };
    let mut generator = ArenaGenerator::new(config).expect("valid config");

    assert_eq!(
        generator.generate(3, 3, 2),
        Err(GenerationError::AttemptsExhausted {
            attempts: 3,
            source: SpawnError::InsufficientSpace {
                required: 2,
                available: 1,
            },
        })
    );
    assert_eq!(generator.phase(), Phase::SpawnAttempt);
}

#[test]
fn walkable_cells_form_one_connected_area() {
    let config = GeneratorConfig {
        obstacle_chance: 0.0,
        ..seeded(42)
    };
    let mut generator = ArenaGenerator::new(config).expect("valid config");
    let arena = generator.generate_arena(40, 30, 2).expect("arena");
    let grid = arena.grid();

    let mut finder = PathFinder::new();
    let origin = arena.spawns()[0].cell;
    for (cell, tile) in grid.iter() {
        if tile.is_walkable() && cell != origin {
            assert!(
                !finder.find(grid, origin, cell, Tile::is_walkable).is_empty(),
                "{cell:?} is cut off from the first spawn"
            );
        }
    }
}

#[test]
fn protected_passages_stay_clear_of_obstacles() {
    let config = GeneratorConfig {
        obstacle_chance: 1.0,
        protect_passages: true,
        ..seeded(19)
    };
    let mut generator = ArenaGenerator::new(config).expect("valid config");
    let arena = generator.generate_arena(40, 30, 2).expect("arena");

    assert!(arena
        .passages()
        .iter()
        .all(|cell| arena.grid().get(cell) != Some(Tile::Blocked)));
    assert_eq!(arena.obstacles(), arena.grid().count(Tile::Blocked));

    let open_passage_cells = arena
        .passages()
        .iter()
        .filter(|cell| arena.grid().get(*cell) == Some(Tile::Free))
        .count();
    assert_eq!(arena.grid().count(Tile::Free), open_passage_cells);
}

#[test]
fn obstacles_only_replace_open_floor() {
    let config = GeneratorConfig {
        obstacle_chance: 1.0,
        ..seeded(19)
    };
    let mut generator = ArenaGenerator::new(config).expect("valid config");
    let grid = generator.generate(40, 30, 2).expect("arena");

    assert_eq!(grid.count(Tile::Free), 0);
    assert!(grid.count(Tile::Safe) > 0);
    assert!(grid.count(Tile::Blocked) > 0);
}

#[test]
fn summary_serialises_to_json() {
    let mut generator = ArenaGenerator::new(seeded(6)).expect("valid config");
    let arena = generator.generate_arena(16, 12, 2).expect("arena");

    let value = serde_json::to_value(arena.summary()).expect("json");
    assert_eq!(value["width"], 16);
    assert_eq!(value["height"], 12);
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(12));
    assert_eq!(value["spawns"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["spawns"][0]["player"], 1);
}
