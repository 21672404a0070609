use rand::Rng;
use thiserror::Error;

use super::{Cell, Pattern};

/// Returned when a coordinate falls outside the grid
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
pub struct OutOfBoundsError {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

/// Grid manages the 2D cellular automaton board.
/// Dimensions are fixed at construction; evolution produces a new grid
/// instead of mutating this one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with all cells initially dead
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Dead; rows * cols],
        }
    }

    /// Create a grid where each cell is independently alive with
    /// probability `living_rate`. The rate must lie in [0, 1].
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, living_rate: f64, rng: &mut R) -> Self {
        let cells = (0..rows * cols)
            .map(|_| Cell::from(rng.random_bool(living_rate)))
            .collect();

        Self { rows, cols, cells }
    }

    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    /// Grid dimensions as (rows, cols)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Convert 2D coordinates to 1D index
    const fn get_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Get cell at position (with bounds checking)
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.contains(row, col)
            .then(|| self.cells[self.get_index(row, col)])
    }

    /// Whether the cell at position is alive; off-grid positions are dead
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(Cell::is_alive)
    }

    /// Set cell at position; off-grid positions are ignored
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if self.contains(row, col) {
            let idx = self.get_index(row, col);
            self.cells[idx] = cell;
        }
    }

    /// Flip a single cell
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<(), OutOfBoundsError> {
        if !self.contains(row, col) {
            return Err(OutOfBoundsError {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let idx = self.get_index(row, col);
        self.cells[idx] = self.cells[idx].toggle();
        Ok(())
    }

    /// Stamp a pattern with its top-left corner at (row, col).
    /// Cells that land outside the grid are clipped.
    pub fn place(&mut self, pattern: &Pattern, row: usize, col: usize) {
        for &(dr, dc) in &pattern.cells {
            self.set(row + dr, col + dc, Cell::Alive);
        }
    }

    /// True when every cell is dead
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_alive())
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Iterate over all cells with their positions, row-major
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, &cell)| (idx / self.cols, idx % self.cols, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presets;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(50, 50);
        assert_eq!(grid.dimensions(), (50, 50));
        assert!(grid.is_empty());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_toggle_flips_cell() {
        let mut grid = Grid::new(4, 6);
        grid.toggle(3, 5).unwrap();
        assert_eq!(grid.get(3, 5), Some(Cell::Alive));
        assert!(!grid.is_empty());

        grid.toggle(3, 5).unwrap();
        assert_eq!(grid.get(3, 5), Some(Cell::Dead));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_toggle_out_of_bounds() {
        let mut grid = Grid::new(4, 6);
        let before = grid.clone();

        let err = grid.toggle(4, 0).unwrap_err();
        assert_eq!(err, OutOfBoundsError { row: 4, col: 0, rows: 4, cols: 6 });
        assert!(grid.toggle(0, 6).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_rows_and_cols_are_distinct() {
        let mut grid = Grid::new(2, 5);
        grid.set(1, 4, Cell::Alive);
        assert!(grid.is_alive(1, 4));
        assert_eq!(grid.get(4, 1), None);
    }

    #[test]
    fn test_equality_is_structural() {
        let mut a = Grid::new(5, 5);
        let mut b = Grid::new(5, 5);
        assert_eq!(a, b);

        a.set(2, 2, Cell::Alive);
        assert_ne!(a, b);
        b.set(2, 2, Cell::Alive);
        assert_eq!(a, b);

        assert_ne!(Grid::new(5, 4), Grid::new(4, 5));
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let a = Grid::random(30, 30, 0.3, &mut StdRng::seed_from_u64(7));
        let b = Grid::random(30, 30, 0.3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_density_roughly_matches_rate() {
        let grid = Grid::random(100, 100, 0.2, &mut StdRng::seed_from_u64(42));
        let density = grid.population() as f64 / 10_000.0;
        assert!((0.15..0.25).contains(&density), "density was {}", density);
    }

    #[test]
    fn test_place_clips_at_edges() {
        let mut grid = Grid::new(3, 3);
        grid.place(&presets::block(), 2, 2);
        assert_eq!(grid.population(), 1);
        assert!(grid.is_alive(2, 2));
    }

    #[test]
    fn test_iter_cells_positions() {
        let mut grid = Grid::new(2, 3);
        grid.set(1, 2, Cell::Alive);
        let alive: Vec<_> = grid
            .iter_cells()
            .filter(|(_, _, cell)| cell.is_alive())
            .map(|(row, col, _)| (row, col))
            .collect();
        assert_eq!(alive, vec![(1, 2)]);
        assert_eq!(grid.iter_cells().count(), 6);
    }
}
