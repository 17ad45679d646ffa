use std::{fs, path::Path};

use anyhow::{Context, Result};
use arena_forge_core::GeneratorConfig;
use serde::Deserialize;

/// Arena width used when neither the command line nor a settings file sets one.
pub(crate) const DEFAULT_WIDTH: u32 = 40;
/// Arena height used when neither the command line nor a settings file sets one.
pub(crate) const DEFAULT_HEIGHT: u32 = 30;
/// Player count used when neither the command line nor a settings file sets one.
pub(crate) const DEFAULT_PLAYERS: usize = 2;

/// Contents of a TOML settings file.
///
/// Generator fields sit at the top level next to the optional arena
/// dimensions; anything missing falls back to its default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct SettingsFile {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) players: Option<usize>,
    #[serde(flatten)]
    pub(crate) generator: GeneratorConfig,
}

impl SettingsFile {
    /// Parses settings from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("settings file is not valid TOML")
    }

    /// Reads and parses a settings file from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) players: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) iterations: Option<u32>,
    pub(crate) max_smoothing: Option<u32>,
    pub(crate) birth_rate: Option<u32>,
    pub(crate) death_limit: Option<u32>,
    pub(crate) initial_chance: Option<f64>,
    pub(crate) obstacle_chance: Option<f64>,
    pub(crate) passage_size: Option<u32>,
    pub(crate) protect_passages: Option<bool>,
    pub(crate) max_attempts: Option<u32>,
}

/// Fully resolved request handed to the generator.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Request {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) players: usize,
    pub(crate) config: GeneratorConfig,
}

impl Request {
    /// Layers command-line overrides on top of the settings file and validates the result.
    pub(crate) fn resolve(file: SettingsFile, overrides: Overrides) -> Result<Self> {
        let mut config = file.generator;
        apply(&mut config.seed, overrides.seed.map(Some));
        apply(&mut config.iterations, overrides.iterations.map(Some));
        apply(&mut config.max_smoothing, overrides.max_smoothing);
        apply(&mut config.birth_rate, overrides.birth_rate);
        apply(&mut config.death_limit, overrides.death_limit);
        apply(&mut config.initial_chance, overrides.initial_chance);
        apply(&mut config.obstacle_chance, overrides.obstacle_chance);
        apply(&mut config.passage_size, overrides.passage_size);
        apply(&mut config.max_attempts, overrides.max_attempts);
        apply(&mut config.protect_passages, overrides.protect_passages);

        config.validate().context("invalid generator settings")?;

        Ok(Self {
            width: overrides.width.or(file.width).unwrap_or(DEFAULT_WIDTH),
            height: overrides.height.or(file.height).unwrap_or(DEFAULT_HEIGHT),
            players: overrides.players.or(file.players).unwrap_or(DEFAULT_PLAYERS),
            config,
        })
    }
}

fn apply<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let file = SettingsFile::parse("").expect("empty toml");
        let request = Request::resolve(file, Overrides::default()).expect("valid");
        assert_eq!(request.width, DEFAULT_WIDTH);
        assert_eq!(request.height, DEFAULT_HEIGHT);
        assert_eq!(request.players, DEFAULT_PLAYERS);
        assert_eq!(request.config, GeneratorConfig::default());
    }

    #[test]
    fn file_values_are_read_at_the_top_level() {
        let file = SettingsFile::parse(
            "width = 64\nplayers = 4\npassage_size = 2\nseed = 99\nprotect_passages = true\n",
        )
        .expect("valid toml");
        assert_eq!(file.width, Some(64));
        assert_eq!(file.players, Some(4));
        assert_eq!(file.generator.passage_size, 2);
        assert_eq!(file.generator.seed, Some(99));
        assert!(file.generator.protect_passages);
        assert_eq!(file.generator.birth_rate, 4);
    }

    #[test]
    fn command_line_wins_over_the_file() {
        let file = SettingsFile::parse("width = 64\nseed = 1\nobstacle_chance = 0.5\n")
            .expect("valid toml");
        let overrides = Overrides {
            width: Some(20),
            seed: Some(7),
            iterations: Some(3),
            ..Overrides::default()
        };

        let request = Request::resolve(file, overrides).expect("valid");
        assert_eq!(request.width, 20);
        assert_eq!(request.config.seed, Some(7));
        assert_eq!(request.config.iterations, Some(3));
        assert!((request.config.obstacle_chance - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn command_line_can_switch_passage_protection_either_way() {
        let protected = || SettingsFile::parse("protect_passages = true\n").expect("valid toml");

        let off = Overrides {
            protect_passages: Some(false),
            ..Overrides::default()
        };
        let request = Request::resolve(protected(), off).expect("valid");
        assert!(!request.config.protect_passages);

        let request = Request::resolve(protected(), Overrides::default()).expect("valid");
        assert!(request.config.protect_passages);

        let on = Overrides {
            protect_passages: Some(true),
            ..Overrides::default()
        };
        let request = Request::resolve(SettingsFile::default(), on).expect("valid");
        assert!(request.config.protect_passages);
    }

    #[test]
    fn invalid_values_are_reported() {
        let overrides = Overrides {
            initial_chance: Some(2.0),
            ..Overrides::default()
        };
        let error = Request::resolve(SettingsFile::default(), overrides).expect_err("invalid");
        assert!(format!("{error:#}").contains("initial_chance"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(SettingsFile::parse("width = \"wide\"").is_err());
    }
}
