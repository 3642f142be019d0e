//! Feature toggles of an interactive run, kept apart from the [`Grid`].
//!
//! The session decides *whether* and *how often* the grid ticks; the grid
//! owns all simulation state. Input layers translate their events into
//! [`Command`]s so this module stays free of any windowing types.

use crate::grid::Grid;
use std::time::Duration;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;
pub const DEFAULT_FPS: u32 = 5;
/// Cells forced alive per frame while stochastic mode is on.
pub const STOCHASTIC_BURST: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// First use starts the run; later uses pause and re-seed the grid.
    StartOrReseed,
    SpeedUp,
    SlowDown,
    ToggleColourCycle,
    TogglePause,
    ToggleStochastic,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub started: bool,
    pub paused: bool,
    pub stochastic: bool,
    pub colour_cycle: bool,
    pub fps: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Session {
    pub fn new(fps: u32) -> Self {
        Self {
            started: false,
            paused: false,
            stochastic: false,
            colour_cycle: false,
            fps: fps.clamp(MIN_FPS, MAX_FPS),
        }
    }

    pub fn apply(&mut self, command: Command, grid: &mut Grid) -> Flow {
        match command {
            Command::StartOrReseed => {
                if self.started {
                    // Pause so the fresh pattern can be edited before it runs.
                    self.paused = true;
                    grid.reseed();
                } else {
                    self.started = true;
                    log::info!("Simulation started");
                }
            }
            Command::SpeedUp => self.set_fps(self.fps.saturating_add(1)),
            Command::SlowDown => self.set_fps(self.fps.saturating_sub(1)),
            Command::ToggleColourCycle => self.colour_cycle = !self.colour_cycle,
            Command::TogglePause => self.paused = !self.paused,
            Command::ToggleStochastic => self.stochastic = !self.stochastic,
            Command::Quit => return Flow::Exit,
        }
        log::debug!("Applied {:?}: {:?}", command, self);
        Flow::Continue
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(MIN_FPS, MAX_FPS);
    }

    /// Whether the next frame advances the simulation.
    pub fn is_running(&self) -> bool {
        self.started && !self.paused
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(MIN_FPS)
    }

    /// Runs one frame's worth of simulation: a generation step, then the
    /// optional stochastic burst and palette cycle. Returns whether the grid
    /// ticked.
    pub fn frame(&self, grid: &mut Grid) -> bool {
        if !self.is_running() {
            return false;
        }

        grid.advance_generation();
        if self.stochastic {
            grid.stochastic_inject(STOCHASTIC_BURST);
        }
        if self.colour_cycle {
            grid.cycle_palette();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Pattern, PatternSeed};

    fn glider_grid() -> Grid {
        let seed = PatternSeed { pattern: Pattern::Glider, x: 1, y: 1 };
        Grid::with_seed(40, 40, 4, Box::new(seed)).unwrap()
    }

    #[test]
    fn nothing_ticks_before_start() {
        let mut grid = glider_grid();
        let session = Session::default();
        assert!(!session.frame(&mut grid));
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn first_space_starts_then_reseeds_and_pauses() {
        let mut grid = glider_grid();
        let mut session = Session::default();

        session.apply(Command::StartOrReseed, &mut grid);
        assert!(session.is_running());
        session.frame(&mut grid);
        session.frame(&mut grid);
        assert_eq!(grid.generation(), 2);

        session.apply(Command::StartOrReseed, &mut grid);
        assert!(session.paused);
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.population(), 5);
        assert!(!session.frame(&mut grid));

        session.apply(Command::TogglePause, &mut grid);
        assert!(session.frame(&mut grid));
    }

    #[test]
    fn fps_is_clamped() {
        let mut grid = glider_grid();
        let mut session = Session::new(MIN_FPS);
        session.apply(Command::SlowDown, &mut grid);
        assert_eq!(session.fps, MIN_FPS);

        session.set_fps(MAX_FPS);
        session.apply(Command::SpeedUp, &mut grid);
        assert_eq!(session.fps, MAX_FPS);

        assert_eq!(Session::new(0).fps, MIN_FPS);
    }

    #[test]
    fn tick_interval_follows_fps() {
        let mut session = Session::new(5);
        assert_eq!(session.tick_interval(), Duration::from_millis(200));
        session.set_fps(20);
        assert_eq!(session.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn colour_cycle_rotates_once_per_frame() {
        let mut grid = glider_grid();
        let mut session = Session::default();
        session.apply(Command::StartOrReseed, &mut grid);
        session.apply(Command::ToggleColourCycle, &mut grid);

        let before = grid.palette();
        session.frame(&mut grid);
        assert_ne!(grid.palette(), before);
        session.frame(&mut grid);
        session.frame(&mut grid);
        assert_eq!(grid.palette(), before);
    }

    #[test]
    fn stochastic_mode_adds_at_most_a_burst() {
        let mut grid = Grid::new(40, 40, 4).unwrap();
        let mut session = Session::default();
        session.apply(Command::StartOrReseed, &mut grid);
        session.apply(Command::ToggleStochastic, &mut grid);

        session.frame(&mut grid);
        assert!(grid.population() <= STOCHASTIC_BURST);
    }

    #[test]
    fn quit_exits() {
        let mut grid = glider_grid();
        let mut session = Session::default();
        assert_eq!(session.apply(Command::TogglePause, &mut grid), Flow::Continue);
        assert_eq!(session.apply(Command::Quit, &mut grid), Flow::Exit);
    }
}
