//! Driver configuration.
//!
//! Every value has a built-in default and may be overridden from the
//! environment:
//! - `GRAIN_LIFE_WIDTH` / `GRAIN_LIFE_HEIGHT` -- window size in pixels
//! - `GRAIN_LIFE_CELL_SIZE` -- edge length of one cell in pixels
//! - `GRAIN_LIFE_FPS` -- initial generations per second
//! - `GRAIN_LIFE_SEED` -- `blank`, `bands`, `glider`, `gun` or `random`
//!
//! Unparseable values are logged and the default is kept.

use grain_life::seed::{BandStripes, Blank, Pattern, PatternSeed, RandomFill, SeedStrategy};
use grain_life::session::DEFAULT_FPS;
use std::str::FromStr;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 700;
pub const DEFAULT_CELL_SIZE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedChoice {
    Blank,
    Bands,
    Glider,
    Gun,
    Random,
}

impl FromStr for SeedChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blank" => Ok(Self::Blank),
            "bands" => Ok(Self::Bands),
            "glider" => Ok(Self::Glider),
            "gun" => Ok(Self::Gun),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown seed pattern `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub fps: u32,
    pub seed: SeedChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            fps: DEFAULT_FPS,
            seed: SeedChoice::Bands,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            width: parse_or(&lookup, "GRAIN_LIFE_WIDTH", defaults.width),
            height: parse_or(&lookup, "GRAIN_LIFE_HEIGHT", defaults.height),
            cell_size: parse_or(&lookup, "GRAIN_LIFE_CELL_SIZE", defaults.cell_size),
            fps: parse_or(&lookup, "GRAIN_LIFE_FPS", defaults.fps),
            seed: parse_or(&lookup, "GRAIN_LIFE_SEED", defaults.seed),
        }
    }

    /// Seed strategy for a grid of `x_cells * y_cells`.
    pub fn seed_strategy(&self, x_cells: u32, y_cells: u32) -> Box<dyn SeedStrategy> {
        match self.seed {
            SeedChoice::Blank => Box::new(Blank),
            SeedChoice::Bands => Box::new(BandStripes::default()),
            SeedChoice::Glider => Box::new(PatternSeed::centered(Pattern::Glider, x_cells, y_cells)),
            SeedChoice::Gun => Box::new(PatternSeed::centered(Pattern::GosperGliderGun, x_cells, y_cells)),
            SeedChoice::Random => Box::new(RandomFill::default()),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring {key}={raw:?} ({e}), using {default:?}");
            default
        }
    }
}
