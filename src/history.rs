use crate::error::{MazeError, Result};
use crate::maze::{Cell, Grid, Point};

/// One recorded cell mutation.
///
/// `burst` is the length of the burst this delta belongs to. The first and
/// last delta of a burst always carry it; replay reads it from whichever end
/// the cursor reaches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub point: Point,
    pub before: Cell,
    pub after: Cell,
    pub burst: usize,
}

/// Append-only log of deltas with a replay cursor.
///
/// Recording happens after the grid was already mutated, so it leaves the
/// cursor at the end: the cursor always marks how much of the log the grid
/// currently reflects.
#[derive(Debug, Default)]
pub struct Tape {
    deltas: Vec<Delta>,
    cursor: usize,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.deltas.capacity()
    }

    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    /// The burst the next forward step would apply, empty at the end of the tape.
    pub fn next_burst(&self) -> &[Delta] {
        match self.deltas.get(self.cursor) {
            Some(delta) => {
                let end = (self.cursor + delta.burst.max(1)).min(self.deltas.len());
                &self.deltas[self.cursor..end]
            }
            None => &[],
        }
    }

    pub fn record(&mut self, delta: Delta) -> Result<()> {
        self.deltas.try_reserve(1)?;
        self.deltas.push(delta);
        self.cursor = self.deltas.len();
        Ok(())
    }

    /// Appends `deltas` as one indivisible step.
    pub fn record_burst(&mut self, deltas: &[Delta]) -> Result<()> {
        let (Some(first), Some(last)) = (deltas.first(), deltas.last()) else {
            return Ok(());
        };
        if first.burst != deltas.len() || last.burst != deltas.len() {
            return Err(MazeError::LogicFail("burst boundaries disagree with burst length"));
        }
        self.deltas.try_reserve(deltas.len())?;
        self.deltas.extend_from_slice(deltas);
        self.cursor = self.deltas.len();
        Ok(())
    }

    /// Applies the burst at the cursor. Returns `false` when already at the end.
    pub fn step_forward(&mut self, grid: &mut Grid) -> bool {
        let Some(head) = self.deltas.get(self.cursor) else {
            return false;
        };
        let end = (self.cursor + head.burst.max(1)).min(self.deltas.len());
        for delta in &self.deltas[self.cursor..end] {
            grid.set(delta.point, delta.after);
        }
        self.cursor = end;
        true
    }

    /// Undoes the burst ending at the cursor. Returns `false` when already at the start.
    pub fn step_backward(&mut self, grid: &mut Grid) -> bool {
        let Some(tail) = self.cursor.checked_sub(1).map(|i| self.deltas[i]) else {
            return false;
        };
        let start = self.cursor.saturating_sub(tail.burst.max(1));
        for delta in self.deltas[start..self.cursor].iter().rev() {
            grid.set(delta.point, delta.before);
        }
        self.cursor = start;
        true
    }

    /// Steps backward until the grid reflects none of the tape.
    pub fn rewind(&mut self, grid: &mut Grid) {
        while self.step_backward(grid) {}
    }

    /// Steps forward until the grid reflects the whole tape.
    pub fn fast_forward(&mut self, grid: &mut Grid) {
        while self.step_forward(grid) {}
    }

    /// Forgets every delta but keeps the allocation.
    pub fn clear(&mut self) {
        self.deltas.clear();
        self.cursor = 0;
    }
}

/// Collects the deltas of one logical step before they go onto a tape.
///
/// Cells are written first and recorded second, so an allocation failure can
/// leave the grid ahead of the tape but never the reverse.
#[derive(Debug, Default)]
pub struct Burst {
    deltas: Vec<Delta>,
}

impl Burst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Writes `after` into the grid and stages the change. No-op writes are skipped.
    pub fn set(&mut self, grid: &mut Grid, point: Point, after: Cell) -> Result<()> {
        let before = grid.get(point);
        if before == after {
            return Ok(());
        }
        grid.set(point, after);
        self.push(point, before, after)
    }

    pub fn update(
        &mut self,
        grid: &mut Grid,
        point: Point,
        f: impl FnOnce(Cell) -> Cell,
    ) -> Result<()> {
        let after = f(grid.get(point));
        self.set(grid, point, after)
    }

    /// Stages a change the caller already applied.
    pub fn push(&mut self, point: Point, before: Cell, after: Cell) -> Result<()> {
        self.deltas.try_reserve(1)?;
        self.deltas.push(Delta {
            point,
            before,
            after,
            burst: 0,
        });
        Ok(())
    }

    /// Stamps the burst length and records the staged deltas as one burst.
    pub fn flush(&mut self, tape: &mut Tape) -> Result<()> {
        let len = self.deltas.len();
        self.deltas.iter_mut().for_each(|delta| delta.burst = len);
        let recorded = tape.record_burst(&self.deltas);
        self.deltas.clear();
        recorded
    }
}
