use rand::{Rng, seq::SliceRandom};

use super::{carve, fill};
use crate::error::{MazeError, Result};
use crate::history::{Burst, Tape};
use crate::maze::cell::backtrack_step;
use crate::maze::point::CARDINALS;
use crate::maze::{Cell, Grid, Point};

/// Randomized depth-first carving without a stack.
///
/// Each carved cell stores a backtrack code pointing at the cell it was carved
/// from; that code is the only frame the search needs. The walk ends when the
/// cursor has unwound back to the start cell.
pub fn recursive_backtrack<R: Rng + ?Sized>(grid: &mut Grid, tape: &mut Tape, rng: &mut R) -> Result<()> {
    let mut burst = Burst::new();
    fill(grid, &mut burst, |_, _| Cell::WALL)?;
    burst.flush(tape)?;

    if grid.rows() < 3 || grid.cols() < 3 {
        return Ok(());
    }

    let start = Point::new(
        2 * rng.random_range(0..(grid.rows() - 1) / 2) + 1,
        2 * rng.random_range(0..(grid.cols() - 1) / 2) + 1,
    );
    tracing::debug!("[generate] carving from {}", start);
    carve(grid, &mut burst, start, |cell| cell.with(Cell::BUILT_BIT))?;
    burst.flush(tape)?;

    let mut cursor = start;
    let mut dirs = CARDINALS;
    loop {
        dirs.shuffle(rng);
        let next = dirs.into_iter().find(|dir| {
            let candidate = cursor + dir.offset().scaled(2);
            grid.is_interior(candidate) && !grid.get(candidate).is_built()
        });

        match next {
            Some(dir) => {
                let back = dir.opposite();
                let half = cursor + dir.offset();
                let dest = half + dir.offset();
                carve(grid, &mut burst, half, |cell| cell.with_backtrack(back))?;
                carve(grid, &mut burst, dest, |cell| {
                    cell.with(Cell::BUILT_BIT).with_backtrack(back)
                })?;
                burst.flush(tape)?;
                cursor = dest;
            }
            None if cursor == start => break,
            None => {
                let step = backtrack_step(grid.get(cursor))
                    .ok_or(MazeError::LogicFail("backtrack from a cell with no code would move to self"))?;
                let half = cursor + step.half;
                burst.update(grid, cursor, |cell| cell.without(Cell::BACKTRACK_MASK))?;
                burst.update(grid, half, |cell| cell.without(Cell::BACKTRACK_MASK))?;
                burst.flush(tape)?;
                cursor = cursor + step.full;
            }
        }
    }
    Ok(())
}
