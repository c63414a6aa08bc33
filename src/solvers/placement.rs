use rand::Rng;

use crate::error::{MazeError, Result};
use crate::history::{Burst, Tape};
use crate::maze::point::ALL_DIRECTIONS;
use crate::maze::{Cell, Grid, Point};

/// Marks a start and a distinct finish on open interior cells.
/// Each marker is recorded as its own one-delta burst.
pub fn place_start_finish<R: Rng + ?Sized>(grid: &mut Grid, tape: &mut Tape, rng: &mut R) -> Result<(Point, Point)> {
    let start = place(grid, tape, rng, Cell::START_BIT)?;
    let finish = place(grid, tape, rng, Cell::FINISH_BIT)?;
    tracing::debug!("[placement] start {} finish {}", start, finish);
    Ok((start, finish))
}

fn place<R: Rng + ?Sized>(grid: &mut Grid, tape: &mut Tape, rng: &mut R, marker: u64) -> Result<Point> {
    let p = find_open(grid, rng).ok_or(MazeError::LogicFail("no open cell left for start or finish"))?;
    let mut burst = Burst::new();
    burst.update(grid, p, |cell| cell.with(marker))?;
    burst.flush(tape)?;
    Ok(p)
}

fn is_open(grid: &Grid, p: Point) -> bool {
    if !grid.is_interior(p) {
        return false;
    }
    let cell = grid.get(p);
    cell.is_path() && !cell.is_start() && !cell.is_finish()
}

/// A random probe first, then its eight neighbours, then a row-major scan.
fn find_open<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Point> {
    if grid.rows() < 3 || grid.cols() < 3 {
        return None;
    }
    let probe = Point::new(
        rng.random_range(1..grid.rows() - 1),
        rng.random_range(1..grid.cols() - 1),
    );
    open_near(grid, probe)
}

/// `probe` itself if open, else its first open neighbour, else the first open cell in row-major order.
fn open_near(grid: &Grid, probe: Point) -> Option<Point> {
    if is_open(grid, probe) {
        return Some(probe);
    }
    ALL_DIRECTIONS
        .iter()
        .map(|&offset| probe + offset)
        .find(|&p| is_open(grid, p))
        .or_else(|| grid.points().find(|&p| is_open(grid, p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Generator;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_places_distinct_open_cells() {
        for seed in 0..20 {
            let mut grid = Grid::new(9, 9).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            Generator::Wilson
                .generate(&mut grid, &mut Tape::new(), &mut rng)
                .unwrap();
            let mut tape = Tape::new();
            let (start, finish) = place_start_finish(&mut grid, &mut tape, &mut rng).unwrap();
            assert_ne!(start, finish);
            assert!(grid.get(start).is_start() && grid.get(start).is_path());
            assert!(grid.get(finish).is_finish() && grid.get(finish).is_path());
            assert_eq!(tape.len(), 2);
            assert!(tape.deltas().iter().all(|delta| delta.burst == 1));
        }
    }

    #[test]
    fn test_scan_finds_the_only_cells() {
        let mut grid = Grid::new(7, 7).unwrap();
        grid.set(Point::new(5, 5), Cell::PATH);
        grid.set(Point::new(1, 5), Cell::PATH);
        let mut tape = Tape::new();
        let (start, finish) =
            place_start_finish(&mut grid, &mut tape, &mut StdRng::seed_from_u64(0)).unwrap();
        let mut placed = [start, finish];
        placed.sort_by_key(|p| (p.row, p.col));
        assert_eq!(placed, [Point::new(1, 5), Point::new(5, 5)]);
    }

    #[test]
    fn test_wall_probe_falls_back_to_neighbours() {
        let mut grid = Grid::new(7, 7).unwrap();
        // (1, 5) comes first in a row scan, so only the neighbour step yields (3, 3).
        grid.set(Point::new(1, 5), Cell::PATH);
        grid.set(Point::new(3, 3), Cell::PATH);
        assert_eq!(open_near(&grid, Point::new(2, 2)), Some(Point::new(3, 3)));
        assert_eq!(open_near(&grid, Point::new(3, 3)), Some(Point::new(3, 3)));
        assert_eq!(open_near(&grid, Point::new(5, 1)), Some(Point::new(1, 5)));
    }

    #[test]
    fn test_neighbour_skips_start_marker() {
        let mut grid = Grid::new(7, 7).unwrap();
        grid.set(Point::new(1, 5), Cell::PATH);
        grid.set(Point::new(3, 3), Cell::PATH.with(Cell::START_BIT));
        assert_eq!(open_near(&grid, Point::new(2, 2)), Some(Point::new(1, 5)));
    }

    #[test]
    fn test_single_cell_maze_fails() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        Generator::RecurBacktrack
            .generate(&mut grid, &mut Tape::new(), &mut rng)
            .unwrap();
        let mut tape = Tape::new();
        assert_eq!(
            place_start_finish(&mut grid, &mut tape, &mut rng),
            Err(MazeError::LogicFail("no open cell left for start or finish"))
        );
        // The start was still placed and recorded before the finish failed.
        assert_eq!(tape.len(), 1);
    }
}
