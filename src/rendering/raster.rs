//! Off-screen rasterization of a grid into an RGBA image.
//! Used for exported frames, so it must not depend on a window.

use image::{Rgba, RgbaImage};

use crate::domain::Grid;

pub const ALIVE_COLOR: Rgba<u8> = Rgba([0, 255, 150, 255]);
pub const DEAD_COLOR: Rgba<u8> = Rgba([15, 15, 15, 255]);
pub const LABEL_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);

/// 3x5 bitmap digits, one row per byte, high bit on the left
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Render `grid` with `cell_size` pixels per cell. When `generation` is
/// given it is stamped in the top-left corner.
pub fn rasterize(grid: &Grid, generation: Option<u64>, cell_size: u32) -> RgbaImage {
    let (rows, cols) = grid.dimensions();
    let cell_size = cell_size.max(1);
    let mut img = RgbaImage::from_pixel(
        frame_side(cols, cell_size),
        frame_side(rows, cell_size),
        DEAD_COLOR,
    );

    for (row, col, cell) in grid.iter_cells() {
        if !cell.is_alive() {
            continue;
        }
        fill_rect(
            &mut img,
            frame_side(col, cell_size),
            frame_side(row, cell_size),
            cell_size,
            ALIVE_COLOR,
        );
    }

    if let Some(generation) = generation {
        draw_number(&mut img, generation, (cell_size / 2).max(1));
    }

    img
}

/// Pixel length of `cells` cells, saturating instead of overflowing
fn frame_side(cells: usize, cell_size: u32) -> u32 {
    u32::try_from(cells).unwrap_or(u32::MAX).saturating_mul(cell_size)
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, size: u32, color: Rgba<u8>) {
    let x_end = x0.saturating_add(size).min(img.width());
    let y_end = y0.saturating_add(size).min(img.height());
    for y in y0..y_end {
        for x in x0..x_end {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_number(img: &mut RgbaImage, value: u64, scale: u32) {
    let margin = scale;
    let advance = 4 * scale;

    for (i, digit) in value.to_string().bytes().enumerate() {
        let glyph = &DIGITS[(digit - b'0') as usize];
        let origin_x = margin + i as u32 * advance;
        for (gy, bits) in glyph.iter().enumerate() {
            for gx in 0..3u32 {
                if bits & (0b100 >> gx) != 0 {
                    fill_rect(
                        img,
                        origin_x + gx * scale,
                        margin + gy as u32 * scale,
                        scale,
                        LABEL_COLOR,
                    );
                }
            }
        }
    }
}
