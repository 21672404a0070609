// Domain layer - Board, evolution rule, patterns
pub mod domain;

// Application layer - Configuration and the simulation state machine
pub mod application;

// Frame capture and video export
pub mod export;

// Infrastructure layer - UI, rendering, input
pub mod ui;
pub mod rendering;
pub mod input;

// Re-exports for convenience
pub use domain::{Cell, Grid, Pattern, presets, step};
pub use application::{Command, ConfigOptions, RunState, Simulation, SimulationConfig};
pub use export::{ExportError, FfmpegEncoder, FrameSequencer, VideoEncoder};
pub use rendering::Renderer;
