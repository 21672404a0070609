use macroquad::prelude::*;

use super::Renderer;
use crate::application::{RunState, Simulation};
use crate::domain::{Grid, Pattern};
use crate::ui::{Button, cell_size_for, panel_x, screen_to_cell, PANEL_WIDTH};

/// Renderer for the interactive window.
/// Macroquad redraws every frame, so this only remembers the label to show.
#[derive(Default)]
pub struct ScreenRenderer {
    label: Option<u64>,
}

impl ScreenRenderer {
    pub fn label(&self) -> Option<u64> {
        self.label
    }
}

impl Renderer for ScreenRenderer {
    fn render(&mut self, _grid: &Grid, generation: Option<u64>) {
        self.label = generation;
    }
}

fn to_color(rgba: ::image::Rgba<u8>) -> Color {
    let [r, g, b, a] = rgba.0;
    Color::from_rgba(r, g, b, a)
}

/// Draw the board scaled to fit the grid area, plus the generation label
pub fn draw_grid(grid: &Grid, label: Option<u64>) {
    let cell_size = cell_size_for(grid);
    let (rows, cols) = grid.dimensions();

    let alive_color = to_color(super::ALIVE_COLOR);
    let dead_cell_color = to_color(super::DEAD_COLOR);
    let grid_line_color = Color::from_rgba(40, 40, 40, 255);
    let draw_grid_lines = cell_size >= 4.0;

    draw_rectangle(0.0, 0.0, cols as f32 * cell_size, rows as f32 * cell_size, dead_cell_color);

    for (row, col, cell) in grid.iter_cells() {
        let x = col as f32 * cell_size;
        let y = row as f32 * cell_size;

        if cell.is_alive() {
            draw_rectangle(x, y, cell_size, cell_size, alive_color);
        }
        if draw_grid_lines {
            draw_rectangle_lines(x, y, cell_size, cell_size, 1.0, grid_line_color);
        }
    }

    if let Some(generation) = label {
        draw_text(&generation.to_string(), 6.0, 22.0, 28.0, to_color(super::LABEL_COLOR));
    }
}

/// Draw a semi-transparent preview of a pattern anchored at the hovered cell
pub fn draw_pattern_preview(pattern: &Pattern, grid: &Grid, mouse_pos: (f32, f32)) {
    let Some((row, col)) = screen_to_cell(grid, mouse_pos) else {
        return;
    };
    let cell_size = cell_size_for(grid);
    let (rows, cols) = grid.dimensions();

    for &(dr, dc) in &pattern.cells {
        let (r, c) = (row + dr, col + dc);
        if r >= rows || c >= cols {
            continue;
        }
        draw_rectangle(
            c as f32 * cell_size,
            r as f32 * cell_size,
            cell_size,
            cell_size,
            Color::from_rgba(0, 255, 150, 120),
        );
    }

    draw_rectangle_lines(
        col as f32 * cell_size,
        row as f32 * cell_size,
        pattern.cols as f32 * cell_size,
        pattern.rows as f32 * cell_size,
        2.0,
        Color::from_rgba(255, 255, 0, 180),
    );
}

/// Draw the control panel with buttons and simulation info
pub fn draw_controls(
    sim: &Simulation<ScreenRenderer>,
    buttons: &[Button],
    mouse_pos: (f32, f32),
    status: &str,
) {
    let px = panel_x();
    draw_rectangle(px, 0.0, PANEL_WIDTH, screen_height(), Color::from_rgba(30, 30, 30, 255));

    buttons.iter().for_each(|btn| btn.draw(mouse_pos));

    let config = sim.config();
    let (rows, cols) = sim.grid().dimensions();
    let running = sim.state() == RunState::Running;

    let export = if config.export() {
        format!("{} frames", sim.frame_count())
    } else {
        "off".to_string()
    };

    let labels = [
        ("Controls:".to_string(), 20.0, 16.0, WHITE),
        ("LMB: Toggle cell".to_string(), 38.0, 13.0, GRAY),
        ("Space: Start/Stop".to_string(), 53.0, 13.0, GRAY),
        ("C: Clear  R: Random".to_string(), 68.0, 13.0, GRAY),
        ("E: Export".to_string(), 83.0, 13.0, GRAY),
        ("1-5: Place pattern".to_string(), 98.0, 13.0, GRAY),
        (format!("Grid: {}x{}", rows, cols), 130.0, 14.0, LIGHTGRAY),
        (format!("Speed: {} gen/s", config.tick_rate()), 148.0, 14.0, LIGHTGRAY),
        (format!("Population: {}", sim.grid().population()), 166.0, 14.0, LIGHTGRAY),
        (format!("Export: {}", export), 184.0, 14.0, LIGHTGRAY),
        ("Generation:".to_string(), 420.0, 16.0, WHITE),
        (sim.generation().to_string(), 442.0, 20.0, Color::from_rgba(0, 255, 150, 255)),
        ("Status:".to_string(), 475.0, 16.0, WHITE),
        (
            if running { "Running" } else { "Editing" }.to_string(),
            495.0,
            16.0,
            if running {
                Color::from_rgba(0, 255, 0, 255)
            } else {
                Color::from_rgba(255, 165, 0, 255)
            },
        ),
        (status.to_string(), 525.0, 12.0, GRAY),
    ];

    labels.iter().for_each(|(text, y, size, color)| {
        draw_text(text, px + 8.0, *y, *size, *color);
    });
}
