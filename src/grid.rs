//! The cell collection and the two-phase generation step.
//!
//! Cells live in one flat row-major `Vec` (`index = x + y * x_cells`). Their
//! neighbourhoods are resolved once into a flat [`Topology`] table of
//! indices, so a tick is two sequential scans: evaluate every cell against a
//! snapshot of the current generation, then commit every pending flip.

use crate::cell::{compute_neighbors, Cell, CellId, Coord};
use crate::error::GridError;
use crate::palette::{Palette, Rgb};
use crate::seed::{Blank, SeedStrategy};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of `CellId::epoch`, shared by every grid in the process.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(0);

/// Precomputed neighbour indices for a fixed `x_cells * y_cells` grid.
///
/// `offsets[i]..offsets[i + 1]` is the slice of `indices` holding the
/// neighbours of cell `i`.
#[derive(Debug, Clone)]
pub struct Topology {
    x_cells: u32,
    y_cells: u32,
    offsets: Vec<usize>,
    indices: Vec<usize>,
}

impl Topology {
    pub fn new(x_cells: u32, y_cells: u32) -> Self {
        let total = x_cells as usize * y_cells as usize;
        let mut offsets = Vec::with_capacity(total + 1);
        let mut indices = Vec::with_capacity(total * 8);

        offsets.push(0);
        for y in 0..y_cells {
            for x in 0..x_cells {
                indices.extend(
                    compute_neighbors(x, y, x_cells, y_cells)
                        .into_iter()
                        .map(|(nx, ny)| (nx + ny * x_cells) as usize),
                );
                offsets.push(indices.len());
            }
        }

        Self {
            x_cells,
            y_cells,
            offsets,
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.x_cells, self.y_cells)
    }

    /// Neighbour indices of the cell at `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.indices[self.offsets[index]..self.offsets[index + 1]]
    }
}

#[derive(Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cell_size: u32,
    x_cells: u32,
    y_cells: u32,
    cells: Vec<Cell>,
    topology: Topology,
    palette: Palette,
    seed: Box<dyn SeedStrategy>,
    generation: u64,
}

impl Grid {
    /// Builds an all-dead grid covering `width x height` pixels with square
    /// cells of `cell_size` pixels. Leftover pixels past the last whole cell
    /// are not part of the grid.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Result<Self, GridError> {
        Self::with_seed(width, height, cell_size, Box::new(Blank))
    }

    pub fn with_seed(
        width: u32,
        height: u32,
        cell_size: u32,
        seed: Box<dyn SeedStrategy>,
    ) -> Result<Self, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        let x_cells = width / cell_size;
        let y_cells = height / cell_size;
        if x_cells == 0 || y_cells == 0 {
            return Err(GridError::DegenerateDimensions {
                width,
                height,
                cell_size,
            });
        }

        let mut grid = Self {
            width,
            height,
            cell_size,
            x_cells,
            y_cells,
            cells: Vec::new(),
            topology: Topology::new(x_cells, y_cells),
            palette: Palette::default(),
            seed,
            generation: 0,
        };
        grid.cells = grid.populate();

        log::info!(
            "Created {}x{} grid ({} cells of {} px) seeded with {:?}",
            x_cells,
            y_cells,
            grid.total(),
            cell_size,
            grid.seed
        );

        Ok(grid)
    }

    /// Builds a fresh row-major collection of cells, all dead, then applies
    /// the seed strategy. The current collection is left untouched.
    pub fn populate(&self) -> Vec<Cell> {
        let epoch = NEXT_EPOCH.fetch_add(1, Ordering::Relaxed);
        let mut cells = Vec::with_capacity(self.total());

        for y in 0..self.y_cells {
            for x in 0..self.x_cells {
                let index = (x + y * self.x_cells) as usize;
                cells.push(Cell::new(CellId { epoch, index }, x, y));
            }
        }

        self.seed.seed(self.x_cells, self.y_cells, &mut cells);
        cells
    }

    /// Discards the current collection and starts over from the seed pattern.
    pub fn reseed(&mut self) {
        self.cells = self.populate();
        self.topology = Topology::new(self.x_cells, self.y_cells);
        self.generation = 0;
        log::info!("Re-seeded grid, {} live cells", self.population());
    }

    /// Swaps the seed strategy used by later re-seeds.
    pub fn set_seed_strategy(&mut self, seed: Box<dyn SeedStrategy>) {
        self.seed = seed;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn x_cells(&self) -> u32 {
        self.x_cells
    }

    pub fn y_cells(&self) -> u32 {
        self.y_cells
    }

    pub fn total(&self) -> usize {
        self.x_cells as usize * self.y_cells as usize
    }

    /// Row-major view of every cell, for rendering.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn cell_color(&self) -> Rgb {
        self.palette.cell_color
    }

    pub fn grid_line_color(&self) -> Rgb {
        self.palette.grid_line_color
    }

    /// Ticks since construction or the last re-seed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.x_cells && y < self.y_cells).then(|| (x + y * self.x_cells) as usize)
    }

    pub fn cell_at(&self, x: u32, y: u32) -> Option<&Cell> {
        self.index_of(x, y).map(|idx| &self.cells[idx])
    }

    /// Neighbour coordinates of `(x, y)`, or `None` outside the grid.
    pub fn neighbors_of(&self, x: u32, y: u32) -> Option<Vec<Coord>> {
        let idx = self.index_of(x, y)?;
        Some(
            self.topology
                .neighbors(idx)
                .iter()
                .map(|&n| self.cells[n].position())
                .collect(),
        )
    }

    /// Sets one cell directly. Returns `false` if `(x, y)` is outside the grid.
    pub fn set_alive(&mut self, x: u32, y: u32, alive: bool) -> bool {
        match self.index_of(x, y) {
            Some(idx) => {
                self.cells[idx].set_alive(alive);
                true
            }
            None => false,
        }
    }

    /// Maps a pixel position to the index of the cell underneath it.
    pub fn index_at_pixel(&self, px: i64, py: i64) -> Option<usize> {
        if px < 0 || py < 0 {
            return None;
        }
        let x = u32::try_from(px / i64::from(self.cell_size)).ok()?;
        let y = u32::try_from(py / i64::from(self.cell_size)).ok()?;
        self.index_of(x, y)
    }

    /// Flips the cell under a pixel position immediately, outside the rule
    /// engine. Positions off the grid are ignored. Returns the toggled index.
    pub fn toggle_cell_at(&mut self, px: i64, py: i64) -> Option<usize> {
        let Some(idx) = self.index_at_pixel(px, py) else {
            log::debug!("Ignoring toggle outside grid at ({px}, {py})");
            return None;
        };
        self.cells[idx].toggle();
        Some(idx)
    }

    /// Forces up to `n` random cells alive. See [`Grid::stochastic_inject_with`].
    pub fn stochastic_inject(&mut self, n: usize) -> usize {
        self.stochastic_inject_with(&mut rand::thread_rng(), n)
    }

    /// Picks `n` uniformly random indices, with replacement, and births each
    /// one that is dead. Returns how many cells actually came alive, which is
    /// at most `n`.
    pub fn stochastic_inject_with<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize) -> usize {
        let total = self.total();
        let mut born = 0;
        for _ in 0..n {
            let cell = &mut self.cells[rng.gen_range(0..total)];
            if !cell.is_alive() {
                cell.set_alive(true);
                born += 1;
            }
        }
        born
    }

    /// Advances every cell by one generation. Returns the number of flips.
    pub fn advance_generation(&mut self) -> usize {
        let snapshot: Vec<bool> = self.cells.iter().map(Cell::is_alive).collect();

        // Evaluate: reads only the snapshot, writes only pending flags.
        let mut flips = 0;
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            let states = self.topology.neighbors(idx).iter().map(|&n| snapshot[n]);
            if cell.evaluate(states) {
                flips += 1;
            }
        }

        // Commit
        for cell in &mut self.cells {
            cell.commit();
        }

        self.generation += 1;
        log::debug!("Generation {} applied {} flips", self.generation, flips);
        flips
    }

    /// Rotates both palette colours. Has no effect on the simulation.
    pub fn cycle_palette(&mut self) {
        self.palette.cycle();
    }

    /// One `u32` per cell, 1 for alive, in row-major order.
    pub fn alive_mask(&self) -> Vec<u32> {
        self.cells.iter().map(|c| u32::from(c.is_alive())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn grid(x_cells: u32, y_cells: u32) -> Grid {
        Grid::new(x_cells * 4, y_cells * 4, 4).unwrap()
    }

    fn alive_set(grid: &Grid) -> HashSet<(u32, u32)> {
        grid.cells()
            .iter()
            .filter(|c| c.is_alive())
            .map(Cell::position)
            .collect()
    }

    /// Straight double-buffered Conway step, used as an oracle.
    fn reference_step(states: &[bool], x_cells: u32, y_cells: u32) -> Vec<bool> {
        let mut next = vec![false; states.len()];
        for y in 0..y_cells {
            for x in 0..x_cells {
                let idx = (x + y * x_cells) as usize;
                let live = compute_neighbors(x, y, x_cells, y_cells)
                    .into_iter()
                    .filter(|&(nx, ny)| states[(nx + ny * x_cells) as usize])
                    .count();
                next[idx] = matches!((states[idx], live), (true, 2) | (true, 3) | (false, 3));
            }
        }
        next
    }

    #[test]
    fn dimensions_use_integer_division() {
        let g = Grid::new(1000, 700, 6).unwrap();
        assert_eq!((g.x_cells(), g.y_cells()), (166, 116));
        assert_eq!(g.cells().len(), 166 * 116);
        assert_eq!(g.topology().len(), g.total());
    }

    #[test]
    fn rejects_zero_cell_size() {
        assert_eq!(Grid::new(10, 10, 0).unwrap_err(), GridError::ZeroCellSize);
    }

    #[test]
    fn rejects_cells_larger_than_window() {
        let err = Grid::new(10, 40, 20).unwrap_err();
        assert_eq!(
            err,
            GridError::DegenerateDimensions {
                width: 10,
                height: 40,
                cell_size: 20
            }
        );
    }

    #[test]
    fn one_by_one_grid_is_stable() {
        let mut g = Grid::new(5, 5, 5).unwrap();
        assert_eq!(g.total(), 1);
        g.set_alive(0, 0, true);
        g.advance_generation();
        assert_eq!(g.population(), 0);
    }

    #[test]
    fn neighbor_count_law_holds_everywhere() {
        let g = grid(6, 5);
        for cell in g.cells() {
            let (x, y) = cell.position();
            let x_edge = x == 0 || x == g.x_cells() - 1;
            let y_edge = y == 0 || y == g.y_cells() - 1;
            let expected = match (x_edge, y_edge) {
                (true, true) => 3,
                (true, false) | (false, true) => 5,
                (false, false) => 8,
            };
            let neighbors = g.neighbors_of(x, y).unwrap();
            assert_eq!(neighbors.len(), expected, "cell ({x}, {y})");

            let unique: HashSet<_> = neighbors.iter().copied().collect();
            assert_eq!(unique.len(), neighbors.len(), "duplicate neighbour of ({x}, {y})");
            assert!(!unique.contains(&(x, y)), "({x}, {y}) lists itself");
            for (nx, ny) in neighbors {
                assert!(nx < g.x_cells() && ny < g.y_cells());
                assert!(nx.abs_diff(x) <= 1 && ny.abs_diff(y) <= 1);
            }
        }
    }

    #[test]
    fn cells_are_row_major() {
        let g = grid(4, 3);
        for (idx, cell) in g.cells().iter().enumerate() {
            assert_eq!(g.index_of(cell.x(), cell.y()), Some(idx));
            assert_eq!(cell.id().index, idx);
        }
    }

    #[test]
    fn toggle_maps_pixels_to_cells() {
        let mut g = grid(4, 4);
        assert_eq!(g.toggle_cell_at(9, 5), Some(6));
        assert!(g.cell_at(2, 1).unwrap().is_alive());

        assert_eq!(g.toggle_cell_at(11, 7), Some(6));
        assert!(!g.cell_at(2, 1).unwrap().is_alive());
    }

    #[test]
    fn toggle_outside_grid_is_ignored() {
        let mut g = Grid::new(18, 18, 4).unwrap();
        assert_eq!(g.toggle_cell_at(-1, 0), None);
        assert_eq!(g.toggle_cell_at(0, -3), None);
        // 16..18 px is leftover past the last whole cell.
        assert_eq!(g.toggle_cell_at(17, 0), None);
        assert_eq!(g.toggle_cell_at(i64::MAX, i64::MAX), None);
        assert_eq!(g.population(), 0);
    }

    #[test]
    fn toggle_bypasses_pending_flag() {
        let mut g = grid(3, 3);
        g.toggle_cell_at(0, 0);
        let cell = g.cell_at(0, 0).unwrap();
        assert!(cell.is_alive());
        assert!(!cell.is_pending());
    }

    #[test]
    fn blinker_oscillates() {
        let mut g = grid(5, 5);
        for y in 1..=3 {
            g.set_alive(2, y, true);
        }
        let vertical = alive_set(&g);

        assert_eq!(g.advance_generation(), 4);
        assert_eq!(alive_set(&g), HashSet::from([(1, 2), (2, 2), (3, 2)]));

        g.advance_generation();
        assert_eq!(alive_set(&g), vertical);
        assert_eq!(g.generation(), 2);
    }

    #[test]
    fn evaluation_sees_only_pre_tick_state() {
        // (1, 0) is born this tick. An in-place row-major pass would let
        // (2, 0) count it and wrongly give birth there too.
        let mut g = grid(3, 3);
        for x in 0..3 {
            g.set_alive(x, 1, true);
        }

        g.advance_generation();
        assert!(g.cell_at(1, 0).unwrap().is_alive());
        assert!(!g.cell_at(2, 0).unwrap().is_alive());
        assert_eq!(alive_set(&g), HashSet::from([(1, 0), (1, 1), (1, 2)]));
    }

    #[test]
    fn matches_reference_step_on_random_soup() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut g = grid(17, 11);
        for y in 0..11 {
            for x in 0..17 {
                g.set_alive(x, y, rng.gen_bool(0.4));
            }
        }

        for _ in 0..20 {
            let before: Vec<bool> = g.cells().iter().map(Cell::is_alive).collect();
            let expected = reference_step(&before, 17, 11);
            g.advance_generation();
            let after: Vec<bool> = g.cells().iter().map(Cell::is_alive).collect();
            assert_eq!(after, expected);
        }
    }

    #[test]
    fn no_pending_flags_survive_a_tick() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut g = grid(8, 8);
        g.stochastic_inject_with(&mut rng, 30);
        g.advance_generation();
        assert!(g.cells().iter().all(|c| !c.is_pending()));
    }

    #[test]
    fn reseed_replaces_every_cell() {
        let mut g = grid(5, 4);
        g.set_alive(1, 1, true);
        g.advance_generation();
        let old_ids: HashSet<CellId> = g.cells().iter().map(Cell::id).collect();

        g.reseed();
        assert_eq!(g.cells().len(), 5 * 4);
        assert_eq!(g.generation(), 0);
        assert_eq!(g.population(), 0);
        assert!(g.cells().iter().all(|c| !old_ids.contains(&c.id())));
    }

    #[test]
    fn populate_does_not_touch_current_cells() {
        let mut g = grid(3, 3);
        g.set_alive(1, 1, true);
        let fresh = g.populate();
        assert_eq!(fresh.len(), 9);
        assert!(fresh.iter().all(|c| !c.is_alive()));
        assert!(g.cell_at(1, 1).unwrap().is_alive());
    }

    #[test]
    fn stochastic_injection_never_exceeds_n() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut g = grid(6, 6);
        g.set_alive(0, 0, true);
        g.set_alive(5, 5, true);

        for n in [0, 1, 5, 50] {
            let before = g.population();
            let born = g.stochastic_inject_with(&mut rng, n);
            assert!(born <= n);
            assert_eq!(g.population(), before + born);
        }
    }

    #[test]
    fn stochastic_injection_misses_on_full_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut g = grid(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                g.set_alive(x, y, true);
            }
        }
        assert_eq!(g.stochastic_inject_with(&mut rng, 20), 0);
        assert_eq!(g.population(), 9);
    }

    #[test]
    fn palette_cycle_leaves_cells_alone() {
        let mut g = grid(3, 3);
        g.set_alive(1, 1, true);
        let before = alive_set(&g);
        g.cycle_palette();
        assert_eq!(alive_set(&g), before);
        assert_eq!(g.cell_color(), Rgb::new(65, 0, 255));
        assert_eq!(g.grid_line_color(), Rgb::new(17, 0, 143));
    }

    #[test]
    fn alive_mask_is_row_major() {
        let mut g = grid(3, 2);
        g.set_alive(2, 0, true);
        g.set_alive(0, 1, true);
        assert_eq!(g.alive_mask(), vec![0, 0, 1, 1, 0, 0]);
    }
}
