mod raster;
mod screen;

pub use raster::{rasterize, ALIVE_COLOR, DEAD_COLOR, LABEL_COLOR};
pub use screen::{ScreenRenderer, draw_controls, draw_grid, draw_pattern_preview};

use crate::domain::Grid;

/// Presentation callback invoked after every state-affecting transition.
/// `generation` of `None` suppresses the generation label.
pub trait Renderer {
    fn render(&mut self, grid: &Grid, generation: Option<u64>);
}

/// Renderer for headless runs; only traces what would have been drawn
#[derive(Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, grid: &Grid, generation: Option<u64>) {
        log::trace!("render: generation {:?}, population {}", generation, grid.population());
    }
}
