//! Seed strategies that decide which cells start alive after `populate`.
//!
//! The starting pattern carries no meaning for the rule engine, so it is
//! pluggable: a [`Grid`](crate::grid::Grid) holds one boxed strategy and
//! reapplies it every time the collection is rebuilt.

mod patterns;

pub use patterns::Pattern;

use crate::cell::Cell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;

pub trait SeedStrategy: Debug + Send {
    /// Marks starting cells alive. `cells` is a freshly built, all-dead,
    /// row-major collection of `x_cells * y_cells` cells.
    fn seed(&self, x_cells: u32, y_cells: u32, cells: &mut [Cell]);
}

/// Leaves every cell dead; the user draws the starting pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl SeedStrategy for Blank {
    fn seed(&self, _x_cells: u32, _y_cells: u32, _cells: &mut [Cell]) {}
}

/// Checkerboard of `period / 2` wide bands: columns in the first half of each
/// period start alive, then rows in the first half of each period invert.
#[derive(Debug, Clone, Copy)]
pub struct BandStripes {
    pub period: u32,
}

impl Default for BandStripes {
    fn default() -> Self {
        Self { period: 10 }
    }
}

impl SeedStrategy for BandStripes {
    fn seed(&self, _x_cells: u32, _y_cells: u32, cells: &mut [Cell]) {
        let period = self.period.max(1);
        let half = period as f32 * 0.5;
        for cell in cells.iter_mut() {
            let column_band = ((cell.x() % period) as f32) < half;
            let row_band = ((cell.y() % period) as f32) < half;
            cell.set_alive(column_band != row_band);
        }
    }
}

/// Places one classic pattern with its bounding box anchored at `(x, y)`.
/// Pattern cells falling outside the grid are dropped.
#[derive(Debug, Clone, Copy)]
pub struct PatternSeed {
    pub pattern: Pattern,
    pub x: u32,
    pub y: u32,
}

impl PatternSeed {
    /// Anchors the pattern so it sits roughly in the middle of the grid.
    pub fn centered(pattern: Pattern, x_cells: u32, y_cells: u32) -> Self {
        let (w, h) = pattern.extent();
        Self {
            pattern,
            x: x_cells.saturating_sub(w) / 2,
            y: y_cells.saturating_sub(h) / 2,
        }
    }
}

impl SeedStrategy for PatternSeed {
    fn seed(&self, x_cells: u32, y_cells: u32, cells: &mut [Cell]) {
        for &(dx, dy) in self.pattern.offsets() {
            let cx = self.x + dx;
            let cy = self.y + dy;
            if cx >= x_cells || cy >= y_cells {
                continue;
            }
            let idx = (cx + cy * x_cells) as usize;
            if let Some(cell) = cells.get_mut(idx) {
                cell.set_alive(true);
            }
        }
    }
}

/// Each cell starts alive with probability `density`.
///
/// With `seed` set, every re-seed reproduces the same soup.
#[derive(Debug, Clone, Copy)]
pub struct RandomFill {
    pub density: f64,
    pub seed: Option<u64>,
}

impl Default for RandomFill {
    fn default() -> Self {
        Self {
            density: 0.3,
            seed: None,
        }
    }
}

impl SeedStrategy for RandomFill {
    fn seed(&self, _x_cells: u32, _y_cells: u32, cells: &mut [Cell]) {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let density = self.density.clamp(0.0, 1.0);
        for cell in cells.iter_mut() {
            cell.set_alive(rng.gen_bool(density));
        }
    }
}
