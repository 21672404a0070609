use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_ROWS: usize = 50;
pub const DEFAULT_COLS: usize = 50;
pub const MAX_GRID_SIDE: usize = 4_096;
pub const DEFAULT_TICK_RATE: u32 = 20;
pub const MAX_TICK_RATE: u32 = 1_000;
pub const DEFAULT_LIVING_RATE: f64 = 0.2;
pub const DEFAULT_FILENAME: &str = "export";
pub const DEFAULT_FPS: u32 = 10;
/// Exclusive upper bound for the export frame rate
pub const FPS_LIMIT: u32 = 100;
pub const DEFAULT_FRAMES_DIR: &str = "frames";
pub const DEFAULT_CELL_SIZE: u32 = 10;
pub const MAX_CELL_SIZE: u32 = 64;
/// Largest exported frame edge in pixels
pub const MAX_FRAME_SIDE: u32 = 8_192;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Raw, user-supplied options. Every key is optional in the YAML form and
/// nothing is validated here; see [`SimulationConfig::from_options`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    pub rows: usize,
    pub cols: usize,
    /// Generations per second
    pub tick_rate: f64,
    /// Probability of a cell starting alive when randomizing
    pub living_rate: f64,
    pub export: bool,
    /// Output video name without extension
    pub filename: String,
    pub fps: f64,
    pub frames_dir: PathBuf,
    /// Pixels per cell in exported frames
    pub cell_size: u32,
    pub seed: Option<u64>,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tick_rate: DEFAULT_TICK_RATE as f64,
            living_rate: DEFAULT_LIVING_RATE,
            export: false,
            filename: DEFAULT_FILENAME.to_string(),
            fps: DEFAULT_FPS as f64,
            frames_dir: PathBuf::from(DEFAULT_FRAMES_DIR),
            cell_size: DEFAULT_CELL_SIZE,
            seed: None,
        }
    }
}

impl ConfigOptions {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let options = Self::from_yaml(&text)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(options)
    }
}

/// Validated simulation settings, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    rows: usize,
    cols: usize,
    tick_rate: u32,
    living_rate: f64,
    export: bool,
    filename: String,
    fps: u32,
    frames_dir: PathBuf,
    cell_size: u32,
    seed: Option<u64>,
}

/// Round up and keep the value only when it lands in `range`
fn ceil_in_range(value: f64, range: impl std::ops::RangeBounds<u32>) -> Option<u32> {
    let rounded = value.ceil();
    if !rounded.is_finite() || rounded < 0.0 || rounded > u32::MAX as f64 {
        return None;
    }
    let rounded = rounded as u32;
    range.contains(&rounded).then_some(rounded)
}

impl SimulationConfig {
    /// Build a config, substituting the documented default for every
    /// out-of-range option.
    pub fn from_options(options: ConfigOptions) -> Self {
        let rows = if (1..=MAX_GRID_SIDE).contains(&options.rows) {
            options.rows
        } else {
            log::warn!("Grid rows {} outside [1, {}], using {}", options.rows, MAX_GRID_SIDE, DEFAULT_ROWS);
            DEFAULT_ROWS
        };

        let cols = if (1..=MAX_GRID_SIDE).contains(&options.cols) {
            options.cols
        } else {
            log::warn!("Grid cols {} outside [1, {}], using {}", options.cols, MAX_GRID_SIDE, DEFAULT_COLS);
            DEFAULT_COLS
        };

        let tick_rate = ceil_in_range(options.tick_rate, 1..=MAX_TICK_RATE).unwrap_or_else(|| {
            log::warn!(
                "Tick rate {} outside (0, {}], using {}",
                options.tick_rate, MAX_TICK_RATE, DEFAULT_TICK_RATE
            );
            DEFAULT_TICK_RATE
        });

        let living_rate = if options.living_rate > 0.0 && options.living_rate < 1.0 {
            options.living_rate
        } else {
            log::warn!(
                "Living rate {} outside (0, 1), using {}",
                options.living_rate, DEFAULT_LIVING_RATE
            );
            DEFAULT_LIVING_RATE
        };

        let fps = ceil_in_range(options.fps, 1..FPS_LIMIT).unwrap_or_else(|| {
            log::warn!("Export fps {} outside (0, {}), using {}", options.fps, FPS_LIMIT, DEFAULT_FPS);
            DEFAULT_FPS
        });

        let filename = if options.filename.trim().is_empty() {
            log::warn!("Empty export filename, using {:?}", DEFAULT_FILENAME);
            DEFAULT_FILENAME.to_string()
        } else {
            options.filename
        };

        let cell_size = if (1..=MAX_CELL_SIZE).contains(&options.cell_size) {
            options.cell_size
        } else {
            log::warn!(
                "Frame cell size {} outside [1, {}], using {}",
                options.cell_size, MAX_CELL_SIZE, DEFAULT_CELL_SIZE
            );
            DEFAULT_CELL_SIZE
        };
        // rows and cols are at most MAX_GRID_SIDE here, so this cannot overflow
        let longest_side = rows.max(cols) as u32;
        let cell_size = if longest_side * cell_size > MAX_FRAME_SIDE {
            let shrunk = (MAX_FRAME_SIDE / longest_side).max(1);
            log::warn!(
                "Frames would exceed {} pixels per side, shrinking cell size from {} to {}",
                MAX_FRAME_SIDE, cell_size, shrunk
            );
            shrunk
        } else {
            cell_size
        };

        Self {
            rows,
            cols,
            tick_rate,
            living_rate,
            export: options.export,
            filename,
            fps,
            frames_dir: options.frames_dir,
            cell_size,
            seed: options.seed,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Pause between two generations
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }

    pub fn living_rate(&self) -> f64 {
        self.living_rate
    }

    pub fn export(&self) -> bool {
        self.export
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_options(ConfigOptions::default())
    }
}

impl From<ConfigOptions> for SimulationConfig {
    fn from(options: ConfigOptions) -> Self {
        Self::from_options(options)
    }
}
