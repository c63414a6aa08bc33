use rand::Rng;

use super::{fill, raise_wall};
use crate::error::{MazeError, Result};
use crate::history::{Burst, Tape};
use crate::maze::cell::backtrack_step;
use crate::maze::point::{CARDINALS, Direction};
use crate::maze::{Cell, Grid, Point};

/// Grows walls inward from the border with loop-erased random walks.
///
/// Walls live on the even-even lattice points. Each walk starts at an unbuilt
/// point and wanders two cells at a time until it touches a built wall; the
/// loop-free walk then becomes wall. Because walls form a tree hanging off the
/// border, the open cells between them form a perfect maze.
pub fn wilson_walls<R: Rng + ?Sized>(grid: &mut Grid, tape: &mut Tape, rng: &mut R) -> Result<()> {
    let mut burst = Burst::new();
    fill(grid, &mut burst, |grid, p| {
        if grid.is_perimeter(p) {
            Cell::WALL.with(Cell::BUILT_BIT)
        } else {
            Cell::PATH
        }
    })?;
    burst.flush(tape)?;

    let Some(mut cursor) = pick_unbuilt(grid, rng) else {
        return Ok(());
    };
    begin_walk(grid, tape, &mut burst, cursor)?;

    loop {
        let dir = CARDINALS[rng.random_range(0..CARDINALS.len())];
        let half = cursor + dir.offset();
        let next = half + dir.offset();
        let next_cell = grid.get(next);

        if next_cell.is_built() {
            solidify(grid, tape, &mut burst, cursor, dir)?;
            match pick_unbuilt(grid, rng) {
                Some(start) => {
                    cursor = start;
                    begin_walk(grid, tape, &mut burst, cursor)?;
                }
                None => break,
            }
        } else if next_cell.is_walk() {
            erase_loop(grid, tape, &mut burst, cursor, next)?;
            cursor = next;
        } else {
            let back = dir.opposite();
            burst.update(grid, half, |cell| cell.with(Cell::WALK_BIT).with_backtrack(back))?;
            burst.update(grid, next, |cell| cell.with(Cell::WALK_BIT).with_backtrack(back))?;
            burst.flush(tape)?;
            cursor = next;
        }
    }
    Ok(())
}

/// Picks an unbuilt interior lattice point, falling back to a row scan when
/// the random probe lands on a built one.
fn pick_unbuilt<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Point> {
    if grid.rows() < 5 || grid.cols() < 5 {
        return None;
    }
    let probe = Point::new(
        2 * rng.random_range(1..=(grid.rows() - 3) / 2),
        2 * rng.random_range(1..=(grid.cols() - 3) / 2),
    );
    if !grid.get(probe).is_built() {
        return Some(probe);
    }
    (2..grid.rows() - 2)
        .step_by(2)
        .flat_map(|row| (2..grid.cols() - 2).step_by(2).map(move |col| Point::new(row, col)))
        .find(|&p| !grid.get(p).is_built())
}

fn begin_walk(grid: &mut Grid, tape: &mut Tape, burst: &mut Burst, start: Point) -> Result<()> {
    tracing::debug!("[generate] walk starts at {}", start);
    burst.update(grid, start, |cell| cell.with(Cell::WALK_BIT))?;
    burst.flush(tape)
}

/// Unwinds the walk from `head` back to `target`, which stays on the walk.
fn erase_loop(grid: &mut Grid, tape: &mut Tape, burst: &mut Burst, head: Point, target: Point) -> Result<()> {
    tracing::debug!("[generate] erasing loop {} -> {}", head, target);
    let mut p = head;
    while p != target {
        let step = backtrack_step(grid.get(p))
            .ok_or(MazeError::LogicFail("walked cell has no backtrack code"))?;
        let half = p + step.half;
        burst.update(grid, p, |cell| cell.without(Cell::WALK_BIT | Cell::BACKTRACK_MASK))?;
        burst.update(grid, half, |cell| cell.without(Cell::WALK_BIT | Cell::BACKTRACK_MASK))?;
        burst.flush(tape)?;
        p = p + step.full;
    }
    Ok(())
}

/// Turns the walk ending at `head` into wall, starting with the link toward
/// the built cell it touched and following backtrack codes to the walk's start.
fn solidify(grid: &mut Grid, tape: &mut Tape, burst: &mut Burst, head: Point, toward: Direction) -> Result<()> {
    let mut p = head;
    let mut link = toward;
    loop {
        // Read before raising: raising the wall clears the code.
        let back = backtrack_step(grid.get(p));
        raise_wall(grid, burst, p + link.offset())?;
        raise_wall(grid, burst, p)?;
        burst.flush(tape)?;
        match back {
            Some(step) => {
                link = step.direction.opposite();
                p = p + step.full;
            }
            None => return Ok(()),
        }
    }
}
