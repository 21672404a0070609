mod config;
mod simulation;

pub use config::{ConfigError, ConfigOptions, SimulationConfig};
pub use simulation::{Command, RunOutcome, RunState, Simulation, SimulationError, TickOutcome};
