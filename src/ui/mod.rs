mod button;

pub use button::Button;

use macroquad::prelude::{screen_height, screen_width};

use crate::application::Command;
use crate::domain::Grid;

pub const PANEL_WIDTH: f32 = 180.0;
pub const BUTTON_HEIGHT: f32 = 40.0;

/// Get the X position where the panel starts (right side)
pub fn panel_x() -> f32 {
    screen_width() - PANEL_WIDTH
}

/// Get the width of the grid area
pub fn grid_area_width() -> f32 {
    screen_width() - PANEL_WIDTH
}

/// Get the height of the grid area
pub fn grid_area_height() -> f32 {
    screen_height()
}

/// Largest square cell size that fits the whole board in an area
pub fn fit_cell_size(grid: &Grid, area: (f32, f32)) -> f32 {
    let (rows, cols) = grid.dimensions();
    let by_width = area.0 / cols.max(1) as f32;
    let by_height = area.1 / rows.max(1) as f32;
    by_width.min(by_height).max(1.0)
}

/// Map a position inside `area` to the (row, col) under it, if any
pub fn cell_at(grid: &Grid, area: (f32, f32), pos: (f32, f32)) -> Option<(usize, usize)> {
    if pos.0 < 0.0 || pos.1 < 0.0 || pos.0 >= area.0 {
        return None;
    }
    let cell_size = fit_cell_size(grid, area);
    let (rows, cols) = grid.dimensions();
    let col = (pos.0 / cell_size) as usize;
    let row = (pos.1 / cell_size) as usize;
    (row < rows && col < cols).then_some((row, col))
}

/// Cell size for the current window
pub fn cell_size_for(grid: &Grid) -> f32 {
    fit_cell_size(grid, (grid_area_width(), grid_area_height()))
}

/// Cell under a screen position for the current window
pub fn screen_to_cell(grid: &Grid, pos: (f32, f32)) -> Option<(usize, usize)> {
    cell_at(grid, (grid_area_width(), grid_area_height()), pos)
}

/// Create panel buttons, one per command
pub fn create_buttons() -> Vec<Button> {
    let px = panel_x();
    [
        ("Start/Stop", Command::Start, 220.0),
        ("Clear", Command::Clear, 270.0),
        ("Random", Command::Randomize, 320.0),
        ("Export", Command::Export, 370.0),
    ]
    .into_iter()
    .map(|(text, command, y)| Button::new(px, y, PANEL_WIDTH, BUTTON_HEIGHT, text, command))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_cell_size_uses_tighter_axis() {
        let grid = Grid::new(50, 100);
        assert_eq!(fit_cell_size(&grid, (500.0, 800.0)), 5.0);
        assert_eq!(fit_cell_size(&grid, (2000.0, 500.0)), 10.0);
    }

    #[test]
    fn test_cell_at_maps_and_rejects() {
        let grid = Grid::new(10, 10);
        let area = (100.0, 100.0);
        assert_eq!(cell_at(&grid, area, (0.0, 0.0)), Some((0, 0)));
        assert_eq!(cell_at(&grid, area, (35.0, 72.0)), Some((7, 3)));
        assert_eq!(cell_at(&grid, area, (99.9, 99.9)), Some((9, 9)));
        assert_eq!(cell_at(&grid, area, (100.0, 5.0)), None);
        assert_eq!(cell_at(&grid, area, (5.0, 150.0)), None);
        assert_eq!(cell_at(&grid, area, (-1.0, 5.0)), None);
    }
}
