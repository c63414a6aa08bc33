use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{MazeError, Result};
use crate::maze::cell::Cell;
use crate::maze::point::Point;

/// Rounds an extent up to the next odd number, so the grid always has a
/// perimeter ring plus interior cells at stride 2.
pub fn normalize_extent(n: usize) -> usize {
    n | 1
}

/// Row-major cell storage.
///
/// Cells are atomic words so racing solver workers can share `&Grid`. Exclusive
/// mutation through `&mut self` compiles down to plain loads and stores.
pub struct Grid {
    cells: Box<[AtomicU64]>,
    rows: i32,
    cols: i32,
}

impl Grid {
    /// Allocates a grid of wall cells with both extents normalized to be odd.
    /// Extents that do not fit a [`Point`] coordinate fail with `AllocFail`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let rows = normalize_extent(rows);
        let cols = normalize_extent(cols);
        if rows > i32::MAX as usize || cols > i32::MAX as usize {
            return Err(MazeError::AllocFail);
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(MazeError::AllocFail)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        cells.extend((0..len).map(|_| AtomicU64::new(Cell::WALL.bits())));
        Ok(Grid {
            cells: cells.into_boxed_slice(),
            rows: rows as i32,
            cols: cols as i32,
        })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn contains(&self, p: Point) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.rows && p.col < self.cols
    }

    pub fn is_perimeter(&self, p: Point) -> bool {
        p.row == 0 || p.col == 0 || p.row == self.rows - 1 || p.col == self.cols - 1
    }

    /// Whether `p` is inside the perimeter ring.
    pub fn is_interior(&self, p: Point) -> bool {
        self.contains(p) && !self.is_perimeter(p)
    }

    fn ravel_index(&self, p: Point) -> usize {
        // Checked in release builds too: a bad point must never alias another cell.
        assert!(
            self.contains(p),
            "point {p} is outside the {}x{} grid",
            self.rows,
            self.cols
        );
        p.row as usize * self.cols as usize + p.col as usize
    }

    pub fn get(&self, p: Point) -> Cell {
        Cell::from_bits(self.cells[self.ravel_index(p)].load(Ordering::Relaxed))
    }

    pub fn set(&mut self, p: Point, cell: Cell) {
        let idx = self.ravel_index(p);
        *self.cells[idx].get_mut() = cell.bits();
    }

    /// Atomically replaces the cell at `p` with `f(cell)` and returns the previous cell.
    ///
    /// Safe to call from several threads through a shared reference; callers
    /// that also need ordering across cells must serialize the calls themselves.
    pub fn fetch_modify(&self, p: Point, f: impl Fn(Cell) -> Cell) -> Cell {
        let slot = &self.cells[self.ravel_index(p)];
        let previous = slot
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some(f(Cell::from_bits(bits)).bits())
            })
            .unwrap_or_else(|bits| bits);
        Cell::from_bits(previous)
    }

    /// Resets every cell to a bare wall.
    pub fn clear(&mut self) {
        self.cells
            .iter_mut()
            .for_each(|cell| *cell.get_mut() = Cell::WALL.bits());
    }

    /// Row-major iterator over every coordinate.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Point::new(row, col)))
    }

    /// Copies every cell out, row-major.
    pub fn snapshot(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .map(|cell| Cell::from_bits(cell.load(Ordering::Relaxed)))
            .collect()
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish_non_exhaustive()
    }
}
