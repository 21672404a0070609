//! Generation stepping on a bounded board.
//!
//! Cells beyond the edges count as permanently dead, so edge cells have five
//! effective neighbors and corner cells three.

use super::{Cell, Grid};

/// Count live neighbors around (row, col); off-grid positions are dead
pub fn count_live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let (rows, cols) = grid.dimensions();

    (-1isize..=1)
        .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| dr != 0 || dc != 0)
        .filter_map(|(dr, dc)| {
            let r = row.checked_add_signed(dr).filter(|&r| r < rows)?;
            let c = col.checked_add_signed(dc).filter(|&c| c < cols)?;
            grid.get(r, c)
        })
        .filter(|cell| cell.is_alive())
        .count() as u8
}

/// Pure functional evolution - reads only `grid` and returns the next generation.
/// Every cell is computed from the same snapshot.
pub fn step(grid: &Grid) -> Grid {
    let (rows, cols) = grid.dimensions();
    let cells: Vec<Cell> = grid
        .iter_cells()
        .map(|(row, col, current)| current.evolve(count_live_neighbors(grid, row, col)))
        .collect();

    Grid::from_cells(rows, cols, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presets;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid_with(rows: usize, cols: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for &(r, c) in alive {
            grid.set(r, c, Cell::Alive);
        }
        grid
    }

    #[test]
    fn test_step_is_pure_and_deterministic() {
        let grid = Grid::random(40, 40, 0.35, &mut StdRng::seed_from_u64(3));
        let snapshot = grid.clone();

        let first = step(&grid);
        let second = step(&grid);

        assert_eq!(first, second);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn test_corner_has_at_most_three_neighbors() {
        let mut full = Grid::new(6, 6);
        for r in 0..6 {
            for c in 0..6 {
                full.set(r, c, Cell::Alive);
            }
        }

        assert_eq!(count_live_neighbors(&full, 0, 0), 3);
        assert_eq!(count_live_neighbors(&full, 0, 5), 3);
        assert_eq!(count_live_neighbors(&full, 5, 0), 3);
        assert_eq!(count_live_neighbors(&full, 5, 5), 3);
        assert_eq!(count_live_neighbors(&full, 0, 3), 5);
        assert_eq!(count_live_neighbors(&full, 3, 0), 5);
        assert_eq!(count_live_neighbors(&full, 2, 2), 8);
    }

    #[test]
    fn test_no_wraparound() {
        // Live cells on opposite edges would be neighbors on a torus
        let grid = grid_with(5, 5, &[(0, 2), (4, 2), (2, 0), (2, 4)]);
        assert_eq!(count_live_neighbors(&grid, 0, 2), 0);
        assert_eq!(count_live_neighbors(&grid, 2, 4), 0);
    }

    #[test]
    fn test_corner_blinker_does_not_wrap() {
        // Three cells along the top edge: on a torus the row above would
        // gain a cell, bounded it must not.
        let grid = grid_with(5, 5, &[(0, 1), (0, 2), (0, 3)]);
        let next = step(&grid);
        assert_eq!(next, grid_with(5, 5, &[(0, 2), (1, 2)]));
    }

    #[test]
    fn test_rule_table_through_step() {
        // Surround the center cell of a 3x3 board with n live neighbors
        let ring = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)];
        for n in 0..=8usize {
            for center_alive in [false, true] {
                let mut grid = grid_with(3, 3, &ring[..n]);
                if center_alive {
                    grid.set(1, 1, Cell::Alive);
                }
                let next = step(&grid);
                let expected = n == 3 || (center_alive && n == 2);
                assert_eq!(
                    next.is_alive(1, 1),
                    expected,
                    "center alive={} with {} neighbors",
                    center_alive,
                    n
                );
            }
        }
    }

    #[test]
    fn test_single_cell_dies() {
        let grid = grid_with(50, 50, &[(25, 25)]);
        let next = step(&grid);
        assert!(next.is_empty());
    }

    #[test]
    fn test_block_still_life() {
        let mut grid = Grid::new(10, 10);
        grid.place(&presets::block(), 4, 4);

        let next = step(&grid);
        assert_eq!(next, grid);
        assert_eq!(next.population(), 4);
    }

    #[test]
    fn test_blinker_evolution() {
        // Horizontal blinker at center
        let grid = grid_with(10, 10, &[(5, 4), (5, 5), (5, 6)]);

        // After one generation, should be vertical
        let next = step(&grid);
        assert_eq!(next, grid_with(10, 10, &[(4, 5), (5, 5), (6, 5)]));

        // After two generations, back to horizontal
        assert_eq!(step(&next), grid);
    }

    #[test]
    fn test_blinker_never_settles() {
        let mut grid = Grid::new(10, 10);
        grid.place(&presets::blinker(), 4, 4);

        for generation in 0..12 {
            let next = step(&grid);
            assert_ne!(next, grid, "settled at generation {}", generation);
            assert!(!next.is_empty());
            grid = next;
        }
    }

    #[test]
    fn test_glider_moves_diagonally() {
        let mut grid = Grid::new(12, 12);
        grid.place(&presets::glider(), 1, 1);

        let mut moved = grid.clone();
        for _ in 0..4 {
            moved = step(&moved);
        }

        let mut expected = Grid::new(12, 12);
        expected.place(&presets::glider(), 2, 2);
        assert_eq!(moved, expected);
    }
}
