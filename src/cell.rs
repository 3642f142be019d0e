//! Cell module: a single automaton unit and its fixed neighbourhood.
//!
//! Conway's standard rules drive every flip:
//! 1. Any live cell with fewer than two live neighbors dies (underpopulation)
//! 2. Any live cell with two or three live neighbors lives (survival)
//! 3. Any live cell with more than three live neighbors dies (overpopulation)
//! 4. Any dead cell with exactly three live neighbors becomes alive (reproduction)

/// Minimum neighbors for a live cell to survive
pub const SURVIVAL_MIN: usize = 2;
/// Maximum neighbors for a live cell to survive
pub const SURVIVAL_MAX: usize = 3;
/// Number of neighbors for a dead cell to become alive
pub const BIRTH_COUNT: usize = 3;

/// Grid-space coordinate `(x, y)`.
pub type Coord = (u32, u32);

/// Identity of a cell within one populated collection.
///
/// `epoch` is unique per `Grid::populate` call, so two cells from different
/// collections never compare equal even when they share a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    pub epoch: u64,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    x: u32,
    y: u32,
    alive: bool,
    pending_change: bool,
}

impl Cell {
    pub fn new(id: CellId, x: u32, y: u32) -> Self {
        Self {
            id,
            x,
            y,
            alive: false,
            pending_change: false,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn position(&self) -> Coord {
        (self.x, self.y)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_pending(&self) -> bool {
        self.pending_change
    }

    /// Sets the state directly, bypassing the pending/commit mechanism.
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Flips the state immediately. Used for manual edits, never by the rule.
    pub fn toggle(&mut self) {
        self.alive = !self.alive;
    }

    /// Marks this cell for a flip if the rule says so, given its neighbours'
    /// current states. Returns the resulting pending flag.
    pub fn evaluate<I>(&mut self, neighbor_states: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        let live = neighbor_states.into_iter().filter(|&alive| alive).count();
        self.pending_change = should_flip(self.alive, live);
        self.pending_change
    }

    /// Applies a pending flip. Calling it with nothing pending is a no-op.
    pub fn commit(&mut self) {
        if self.pending_change {
            self.alive = !self.alive;
        }
        self.pending_change = false;
    }
}

/// Whether a cell in state `alive` with `live` live neighbours changes state.
pub fn should_flip(alive: bool, live: usize) -> bool {
    if alive {
        live < SURVIVAL_MIN || live > SURVIVAL_MAX
    } else {
        live == BIRTH_COUNT
    }
}

/// Moore neighbourhood of `(x, y)` clipped at the grid edges, in row-major
/// order. Corners get 3 entries, edges 5, interior cells 8.
pub fn compute_neighbors(x: u32, y: u32, x_cells: u32, y_cells: u32) -> Vec<Coord> {
    let mut neighbors = Vec::with_capacity(8);

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            // Skip the cell itself
            if dx == 0 && dy == 0 {
                continue;
            }

            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if nx < 0 || ny < 0 || nx >= i64::from(x_cells) || ny >= i64::from(y_cells) {
                continue;
            }

            neighbors.push((nx as u32, ny as u32));
        }
    }

    neighbors
}
