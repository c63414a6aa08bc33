pub mod cell;
mod grid;
pub mod point;

use rand::RngCore;

pub use cell::{Cell, MAX_WORKERS, wall_glyph};
pub use grid::{Grid, normalize_extent};
pub use point::{Direction, Point};

use crate::error::Result;
use crate::generators::Generator;
use crate::history::Tape;
use crate::solvers::{SolveOutcome, Solver};

/// Selects which of a maze's two tapes to replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Build,
    Solve,
}

/// A grid together with its build and solve histories.
#[derive(Debug)]
pub struct Maze {
    grid: Grid,
    build: Tape,
    solve: Tape,
}

impl Maze {
    /// Creates an all-wall maze. Both extents are rounded up to odd numbers.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Maze {
            grid: Grid::new(rows, cols)?,
            build: Tape::new(),
            solve: Tape::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn build_tape(&self) -> &Tape {
        &self.build
    }

    pub fn solve_tape(&self) -> &Tape {
        &self.solve
    }

    /// Clears both tapes and every cell. Tape allocations are kept.
    pub fn reset(&mut self) {
        self.build.clear();
        self.solve.clear();
        self.grid.clear();
    }

    /// Undoes the last solve pass, leaving the built maze untouched.
    pub fn reset_solve(&mut self) {
        self.solve.rewind(&mut self.grid);
        self.solve.clear();
    }

    /// Resets the maze and builds a fresh one with `generator`.
    pub fn generate<R: RngCore + ?Sized>(&mut self, generator: Generator, rng: &mut R) -> Result<()> {
        self.reset();
        tracing::info!(
            "[maze] generating {}x{} with {}",
            self.grid.rows(),
            self.grid.cols(),
            generator
        );
        generator.generate(&mut self.grid, &mut self.build, rng)
    }

    /// Discards any previous solution, replays the rest of the build, places
    /// start and finish, and runs `solver`.
    pub fn solve<R: RngCore + ?Sized>(&mut self, solver: Solver, rng: &mut R) -> Result<SolveOutcome> {
        self.reset_solve();
        self.build.fast_forward(&mut self.grid);
        tracing::info!("[maze] solving with {}", solver);
        solver.solve(&mut self.grid, &mut self.solve, rng)
    }

    /// Whether `playback` may move: the build tape only while no solve step is
    /// applied, the solve tape only on a fully built maze.
    fn can_step(&self, playback: Playback) -> bool {
        match playback {
            Playback::Build => self.solve.cursor() == 0,
            Playback::Solve => self.build.cursor() == self.build.len(),
        }
    }

    /// Replays one burst of the chosen tape. Returns `false` at the end of the
    /// tape, or while the other tape holds it in place.
    pub fn step_forward(&mut self, playback: Playback) -> bool {
        if !self.can_step(playback) {
            return false;
        }
        match playback {
            Playback::Build => self.build.step_forward(&mut self.grid),
            Playback::Solve => self.solve.step_forward(&mut self.grid),
        }
    }

    /// Undoes one burst of the chosen tape. Returns `false` at the start of the
    /// tape, or while the other tape holds it in place.
    pub fn step_backward(&mut self, playback: Playback) -> bool {
        if !self.can_step(playback) {
            return false;
        }
        match playback {
            Playback::Build => self.build.step_backward(&mut self.grid),
            Playback::Solve => self.solve.step_backward(&mut self.grid),
        }
    }
}

/// Orthogonal path neighbours of a cell, in N, E, S, W order.
pub fn path_neighbors(grid: &Grid, p: Point) -> impl Iterator<Item = Point> + '_ {
    point::CARDINALS
        .into_iter()
        .map(move |dir| p + dir.offset())
        .filter(|&n| grid.contains(n) && grid.get(n).is_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_reset_solve_keeps_build() {
        let mut maze = Maze::new(9, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        maze.generate(Generator::RecurBacktrack, &mut rng).unwrap();
        let built = maze.grid().snapshot();
        maze.solve(Solver::Bfs, &mut rng).unwrap();
        assert_ne!(maze.grid().snapshot(), built);
        maze.reset_solve();
        assert_eq!(maze.grid().snapshot(), built);
        assert!(maze.solve_tape().is_empty());
    }

    #[test]
    fn test_playback_steps_build_tape() {
        let mut maze = Maze::new(7, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        maze.generate(Generator::Wilson, &mut rng).unwrap();
        let built = maze.grid().snapshot();
        let mut steps = 0;
        while maze.step_backward(Playback::Build) {
            steps += 1;
        }
        assert!(maze.grid().snapshot().iter().all(|cell| *cell == Cell::WALL));
        for _ in 0..steps {
            assert!(maze.step_forward(Playback::Build));
        }
        assert!(!maze.step_forward(Playback::Build));
        assert_eq!(maze.grid().snapshot(), built);
    }

    #[test]
    fn test_solve_completes_a_partial_build() {
        let mut maze = Maze::new(15, 15).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        maze.generate(Generator::RecurBacktrack, &mut rng).unwrap();
        let built = maze.grid().snapshot();
        for _ in 0..40 {
            assert!(maze.step_backward(Playback::Build));
        }

        let outcome = maze.solve(Solver::Bfs, &mut rng).unwrap();
        assert!(outcome.found());
        assert_eq!(maze.build_tape().cursor(), maze.build_tape().len());
        let cells = maze.grid().snapshot();
        assert_eq!(cells.iter().filter(|cell| cell.is_start()).count(), 1);
        assert_eq!(cells.iter().filter(|cell| cell.is_finish()).count(), 1);

        // Build playback is held while the solve tape is applied.
        assert!(!maze.step_forward(Playback::Build));
        assert!(!maze.step_backward(Playback::Build));
        assert_eq!(maze.grid().snapshot(), cells);

        maze.reset_solve();
        assert_eq!(maze.grid().snapshot(), built);
    }

    #[test]
    fn test_solve_playback_needs_a_full_build() {
        let mut maze = Maze::new(9, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        maze.generate(Generator::Wilson, &mut rng).unwrap();
        maze.solve(Solver::DfsRace, &mut rng).unwrap();
        let solved = maze.grid().snapshot();

        while maze.step_backward(Playback::Solve) {}
        assert!(maze.step_backward(Playback::Build));
        assert!(!maze.step_forward(Playback::Solve));
        assert!(!maze.step_backward(Playback::Solve));

        while maze.step_forward(Playback::Build) {}
        while maze.step_forward(Playback::Solve) {}
        assert_eq!(maze.grid().snapshot(), solved);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut maze = Maze::new(5, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        maze.generate(Generator::RecurBacktrack, &mut rng).unwrap();
        maze.reset();
        assert!(maze.build_tape().is_empty());
        assert!(maze.grid().snapshot().iter().all(|cell| *cell == Cell::WALL));
    }

    #[test]
    fn test_path_neighbors() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(Point::new(1, 1), Cell::PATH);
        grid.set(Point::new(1, 2), Cell::PATH);
        grid.set(Point::new(2, 1), Cell::PATH);
        let neighbors = path_neighbors(&grid, Point::new(1, 1)).collect::<Vec<_>>();
        assert_eq!(neighbors, vec![Point::new(1, 2), Point::new(2, 1)]);
    }
}
