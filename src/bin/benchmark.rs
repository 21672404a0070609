//! Performance benchmark for the evolution step and frame rasterization

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use life_recorder::domain::{Grid, step};
use life_recorder::rendering::rasterize;

fn benchmark_step(size: usize, iterations: u32) -> f64 {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let mut grid = Grid::random(size, size, 0.2, &mut rng);

    let start = Instant::now();
    for _ in 0..iterations {
        grid = step(&grid);
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn benchmark_rasterize(size: usize, iterations: u32) -> f64 {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let grid = Grid::random(size, size, 0.2, &mut rng);
    // Keep frames around 1000 pixels wide
    let cell_size = (1000 / size).max(1) as u32;

    let start = Instant::now();
    for generation in 0..iterations {
        let img = rasterize(&grid, Some(generation as u64), cell_size);
        std::hint::black_box(img);
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("=== Game of Life Step Benchmark ===\n");

    let sizes = [50, 100, 200, 500, 1000];
    let iterations = 20;

    println!("{:>10} {:>12} {:>12} {:>14}", "Size", "Step (ms)", "Frame (ms)", "Cells/sec");
    println!("{:-<52}", "");

    for size in sizes {
        let step_ms = benchmark_step(size, iterations);
        let frame_ms = benchmark_rasterize(size, iterations.min(5));
        let cells_per_sec = (size * size) as f64 / (step_ms / 1000.0);

        println!(
            "{:>10} {:>12.3} {:>12.3} {:>13.1}M",
            format!("{}x{}", size, size),
            step_ms,
            frame_ms,
            cells_per_sec / 1_000_000.0
        );
    }
}
