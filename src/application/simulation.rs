use std::path::PathBuf;
use std::thread;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use super::SimulationConfig;
use crate::domain::{Grid, OutOfBoundsError, Pattern, step};
use crate::export::{ExportError, FrameSequencer, VideoEncoder};
use crate::rendering::{Renderer, rasterize};

/// Editing is the only state that allows direct changes to the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Editing,
    Running,
}

/// Abstract commands produced by input translation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Toggle { row: usize, col: usize },
    Start,
    Stop,
    Clear,
    Randomize,
    Export,
}

/// Result of a single tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, nothing happened
    Idle,
    /// Board changed; carries the new generation
    Advanced(u64),
    /// Board maps to itself; halted at this generation
    Stable(u64),
    /// Board died out; halted and the counter reset
    Extinct,
}

/// Why a blocking run returned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Stable(u64),
    Extinct,
    Stopped(u64),
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBoundsError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Simulation orchestrates the board, the evolution step, frame capture and
/// rendering through the Editing/Running state machine.
pub struct Simulation<R: Renderer> {
    config: SimulationConfig,
    grid: Grid,
    generation: u64,
    state: RunState,
    frames: FrameSequencer,
    encoder: Box<dyn VideoEncoder>,
    renderer: R,
    rng: StdRng,
    update_timer: f32,
}

impl<R: Renderer> Simulation<R> {
    /// Create a simulation with an all-dead board. Fails only when export is
    /// enabled and the frames directory cannot be prepared.
    pub fn new(
        config: SimulationConfig,
        renderer: R,
        encoder: Box<dyn VideoEncoder>,
    ) -> Result<Self, ExportError> {
        let frames = FrameSequencer::new(config.frames_dir(), config.export())?;
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut sim = Self {
            grid: Grid::new(config.rows(), config.cols()),
            config,
            generation: 0,
            state: RunState::Editing,
            frames,
            encoder,
            renderer,
            rng,
            update_timer: 0.0,
        };
        sim.renderer.render(&sim.grid, None);
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &FrameSequencer {
        &self.frames
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Dispatch an input command to its transition
    pub fn handle(&mut self, command: Command) -> Result<(), SimulationError> {
        match command {
            Command::Toggle { row, col } => self.toggle_cell(row, col)?,
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Clear => self.clear(),
            Command::Randomize => self.randomize(),
            Command::Export => {
                self.export()?;
            }
        }
        Ok(())
    }

    fn ignored(&self, what: &str) -> bool {
        if self.is_running() {
            log::debug!("Ignoring {} while running", what);
        }
        self.is_running()
    }

    /// Flip one cell while editing
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<(), OutOfBoundsError> {
        if self.ignored("toggle") {
            return Ok(());
        }
        self.grid.toggle(row, col)?;
        self.renderer.render(&self.grid, Some(self.generation));
        Ok(())
    }

    /// Stamp a pattern with its top-left corner at (row, col) while editing
    pub fn place_pattern(&mut self, pattern: &Pattern, row: usize, col: usize) {
        if self.ignored("pattern placement") {
            return;
        }
        self.grid.place(pattern, row, col);
        log::debug!("Placed {} at ({}, {})", pattern.name, row, col);
        self.renderer.render(&self.grid, Some(self.generation));
    }

    /// Kill every cell and start a fresh sequence
    pub fn clear(&mut self) {
        if self.ignored("clear") {
            return;
        }
        self.grid = Grid::new(self.config.rows(), self.config.cols());
        self.begin_fresh_sequence();
        self.renderer.render(&self.grid, None);
    }

    /// Reseed every cell at the configured living rate and start a fresh sequence
    pub fn randomize(&mut self) {
        if self.ignored("randomize") {
            return;
        }
        self.grid = Grid::random(
            self.config.rows(),
            self.config.cols(),
            self.config.living_rate(),
            &mut self.rng,
        );
        self.begin_fresh_sequence();
        self.renderer.render(&self.grid, None);
    }

    fn begin_fresh_sequence(&mut self) {
        self.generation = 0;
        if let Err(e) = self.frames.reset() {
            log::warn!("Failed to clear frames: {}", e);
        }
    }

    /// Switch to Running. A start from generation 0 begins a new frame
    /// sequence; resuming a stopped run keeps the frames captured so far.
    /// The board as it is now is always captured as the current generation,
    /// so edits made while stopped replace the frame taken at the stop.
    pub fn start(&mut self) {
        if self.ignored("start") {
            return;
        }
        if self.generation == 0 {
            if let Err(e) = self.frames.reset() {
                log::warn!("Failed to clear frames: {}", e);
            }
        }
        self.state = RunState::Running;
        self.update_timer = 0.0;
        log::info!(
            "Simulation started at generation {} ({} live cells)",
            self.generation,
            self.grid.population()
        );

        self.capture_frame();
    }

    /// Return to Editing; honored between ticks, never mid-step
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Editing;
            log::info!("Simulation stopped at generation {}", self.generation);
        }
    }

    /// Encode the captured frames into a video
    pub fn export(&mut self) -> Result<PathBuf, ExportError> {
        if self.is_running() {
            return Err(ExportError::SimulationRunning);
        }
        let path = self.frames.flush(
            self.encoder.as_mut(),
            self.config.filename(),
            self.config.fps(),
        )?;
        log::info!("Exported {:?}", path);
        Ok(path)
    }

    fn capture_frame(&mut self) {
        if !self.frames.is_enabled() {
            return;
        }
        let image = rasterize(&self.grid, Some(self.generation), self.config.cell_size());
        if let Err(e) = self.frames.capture(self.generation, &image) {
            log::warn!("Failed to capture frame {}: {}", self.generation, e);
        }
    }

    /// Run one generation of the state machine
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        let after = step(&self.grid);
        if after == self.grid {
            self.state = RunState::Editing;
            log::info!("Stable configuration at generation {}", self.generation);
            return TickOutcome::Stable(self.generation);
        }

        self.generation += 1;
        self.grid = after;
        self.renderer.render(&self.grid, Some(self.generation));
        self.capture_frame();

        if self.grid.is_empty() {
            log::info!("Extinct after {} generations", self.generation);
            self.generation = 0;
            self.state = RunState::Editing;
            return TickOutcome::Extinct;
        }

        log::trace!("Generation {}: {} live cells", self.generation, self.grid.population());
        TickOutcome::Advanced(self.generation)
    }

    /// Frame-driven update: accumulates elapsed time and performs at most
    /// one tick once a full tick interval has passed.
    pub fn advance(&mut self, delta_time: f32) -> Option<TickOutcome> {
        if !self.is_running() {
            return None;
        }

        self.update_timer += delta_time;
        let update_interval = 1.0 / self.config.tick_rate() as f32;
        if self.update_timer < update_interval {
            return None;
        }
        self.update_timer = 0.0;
        Some(self.tick())
    }

    /// Start and block until the board halts or `should_stop` returns true.
    /// `should_stop` sees the current generation and is checked once per
    /// iteration, before each step; between steps the thread sleeps for one
    /// tick interval.
    pub fn run_blocking(&mut self, mut should_stop: impl FnMut(u64) -> bool) -> RunOutcome {
        self.start();
        let interval = self.config.tick_interval();

        loop {
            if should_stop(self.generation) {
                self.stop();
                return RunOutcome::Stopped(self.generation);
            }
            match self.tick() {
                TickOutcome::Stable(generation) => return RunOutcome::Stable(generation),
                TickOutcome::Extinct => return RunOutcome::Extinct,
                TickOutcome::Idle => return RunOutcome::Stopped(self.generation),
                TickOutcome::Advanced(_) => thread::sleep(interval),
            }
        }
    }
}
