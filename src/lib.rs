//! Simulation core for the Grain Life cellular automaton.
//!
//! The crate root only wires modules together. Everything a renderer or an
//! input layer needs is re-exported here so the driver binary can stay thin.

pub mod cell;
pub mod error;
pub mod grid;
pub mod palette;
pub mod seed;
pub mod session;

pub use cell::{compute_neighbors, should_flip, Cell, CellId, Coord};
pub use error::GridError;
pub use grid::{Grid, Topology};
pub use palette::{Palette, Rgb};
pub use seed::{BandStripes, Blank, Pattern, PatternSeed, RandomFill, SeedStrategy};
pub use session::{Command, Flow, Session};
