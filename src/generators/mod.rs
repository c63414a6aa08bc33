mod recur_backtrack;
mod wilson;

use rand::Rng;

use recur_backtrack::recursive_backtrack;
use wilson::wilson_walls;

use crate::error::{Result, UnknownStrategy};
use crate::history::{Burst, Tape};
use crate::maze::point::CARDINALS;
use crate::maze::{Cell, Grid, Point};

/// Available maze generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    /// Starts all wall and carves passages outward.
    RecurBacktrack,
    /// Starts all path and grows walls with loop-erased random walks.
    Wilson,
}

impl Generator {
    pub const ALL: [Generator; 2] = [Generator::RecurBacktrack, Generator::Wilson];

    pub fn name(self) -> &'static str {
        match self {
            Generator::RecurBacktrack => "recursive-backtracker",
            Generator::Wilson => "wilson-walls",
        }
    }

    /// Builds a perfect maze on `grid`, recording every mutation on `tape`.
    /// The grid's previous contents are overwritten by the first burst.
    pub fn generate<R: Rng + ?Sized>(self, grid: &mut Grid, tape: &mut Tape, rng: &mut R) -> Result<()> {
        match self {
            Generator::RecurBacktrack => recursive_backtrack(grid, tape, rng),
            Generator::Wilson => wilson_walls(grid, tape, rng),
        }?;
        tracing::info!("[generate] {} finished after {} deltas", self.name(), tape.len());
        Ok(())
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecurBacktrack => write!(f, "Recursive Backtracker"),
            Generator::Wilson => write!(f, "Wilson's Algorithm (Wall Adder)"),
        }
    }
}

impl std::str::FromStr for Generator {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Generator::ALL
            .into_iter()
            .find(|generator| generator.name() == s)
            .ok_or_else(|| UnknownStrategy {
                kind: "generator",
                name: s.to_string(),
            })
    }
}

/// The wall mask `p` should carry given its current neighbours.
fn wall_mask_of(grid: &Grid, p: Point) -> u8 {
    CARDINALS
        .into_iter()
        .filter(|dir| {
            let n = p + dir.offset();
            grid.contains(n) && grid.get(n).is_wall()
        })
        .fold(0, |mask, dir| mask | dir.bit())
}

/// Rewrites every cell with `initial`, then fixes up wall masks, all as one burst.
fn fill(grid: &mut Grid, burst: &mut Burst, initial: impl Fn(&Grid, Point) -> Cell) -> Result<()> {
    for p in grid.points() {
        let cell = initial(grid, p);
        burst.set(grid, p, cell)?;
    }
    for p in grid.points() {
        if grid.get(p).is_wall() {
            let mask = wall_mask_of(grid, p);
            burst.update(grid, p, |cell| cell.with_wall_mask(mask))?;
        }
    }
    Ok(())
}

/// Opens `p` as a path, then drops it from the shape of each wall neighbour.
fn carve(grid: &mut Grid, burst: &mut Burst, p: Point, mark: impl FnOnce(Cell) -> Cell) -> Result<()> {
    burst.update(grid, p, |cell| mark(cell.with(Cell::PATH_BIT).with_wall_mask(0)))?;
    for dir in CARDINALS {
        let n = p + dir.offset();
        if grid.contains(n) && grid.get(n).is_wall() {
            burst.update(grid, n, |cell| cell.without_wall_toward(dir.opposite()))?;
        }
    }
    Ok(())
}

/// Turns `p` into a built wall joined to its wall neighbours.
fn raise_wall(grid: &mut Grid, burst: &mut Burst, p: Point) -> Result<()> {
    let mask = wall_mask_of(grid, p);
    burst.update(grid, p, |cell| {
        cell.without(Cell::PATH_BIT | Cell::WALK_BIT | Cell::BACKTRACK_MASK)
            .with(Cell::BUILT_BIT)
            .with_wall_mask(mask)
    })?;
    for dir in CARDINALS {
        let n = p + dir.offset();
        if grid.contains(n) && grid.get(n).is_wall() {
            burst.update(grid, n, |cell| cell.with_wall_toward(dir.opposite()))?;
        }
    }
    Ok(())
}
