mod cell;
mod grid;
mod patterns;
pub mod evolution;

pub use cell::Cell;
pub use grid::{Grid, OutOfBoundsError};
pub use patterns::{Pattern, presets};
pub use evolution::step;
