use std::collections::{HashSet, VecDeque};

use rand::{SeedableRng, rngs::StdRng};

use mazerace::maze::{Direction, path_neighbors, wall_glyph};
use mazerace::solvers::WorkerState;
use mazerace::{Cell, Generator, Grid, Maze, Playback, Point, Solver};

fn built(rows: usize, cols: usize, generator: Generator, seed: u64) -> Maze {
    let mut maze = Maze::new(rows, cols).unwrap();
    maze.generate(generator, &mut StdRng::seed_from_u64(seed)).unwrap();
    maze
}

fn open_cells(grid: &Grid) -> Vec<Point> {
    grid.points().filter(|&p| grid.get(p).is_path()).collect()
}

/// Flood fills from one open cell; returns the cells visited and the edges crossed.
fn flood(grid: &Grid, from: Point) -> (HashSet<Point>, usize) {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    let mut edges = 0;
    while let Some(p) = queue.pop_front() {
        for n in path_neighbors(grid, p) {
            edges += 1;
            if seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    // Each undirected edge was counted from both ends.
    (seen, edges / 2)
}

#[test]
fn generated_mazes_are_spanning_trees() {
    for generator in Generator::ALL {
        for (rows, cols) in [(5, 5), (9, 15), (20, 13), (31, 31)] {
            for seed in 0..5 {
                let maze = built(rows, cols, generator, seed);
                let grid = maze.grid();
                let open = open_cells(grid);
                let (reached, edges) = flood(grid, open[0]);
                assert_eq!(reached.len(), open.len(), "{generator} {rows}x{cols} seed {seed} is disconnected");
                assert_eq!(edges + 1, open.len(), "{generator} {rows}x{cols} seed {seed} has a loop");
                for row in (1..grid.rows()).step_by(2) {
                    for col in (1..grid.cols()).step_by(2) {
                        assert!(reached.contains(&Point::new(row, col)));
                    }
                }
            }
        }
    }
}

#[test]
fn build_tape_round_trips() {
    for generator in Generator::ALL {
        let mut maze = built(15, 21, generator, 42);
        let finished = maze.grid().snapshot();
        while maze.step_backward(Playback::Build) {}
        assert!(maze.grid().snapshot().iter().all(|&cell| cell == Cell::WALL));
        while maze.step_forward(Playback::Build) {}
        assert_eq!(maze.grid().snapshot(), finished);
    }
}

#[test]
fn solve_tape_round_trips() {
    for solver in Solver::ALL {
        let mut maze = built(15, 21, Generator::RecurBacktrack, 8);
        let before_solve = maze.grid().snapshot();
        maze.solve(solver, &mut StdRng::seed_from_u64(8)).unwrap();
        let solved = maze.grid().snapshot();
        while maze.step_backward(Playback::Solve) {}
        assert_eq!(maze.grid().snapshot(), before_solve, "{solver} did not rewind");
        while maze.step_forward(Playback::Solve) {}
        assert_eq!(maze.grid().snapshot(), solved, "{solver} did not replay");
    }
}

#[test]
fn seeded_five_by_five_is_reproducible() {
    for generator in Generator::ALL {
        let a = built(5, 5, generator, 2024);
        let b = built(5, 5, generator, 2024);
        assert_eq!(a.grid().rows(), 5);
        assert_eq!(a.grid().cols(), 5);
        assert_eq!(a.grid().snapshot(), b.grid().snapshot());
    }
}

#[test]
fn rendered_walls_match_their_neighbours() {
    let glyphs: HashSet<char> = (0..16).map(|mask| wall_glyph(Cell::WALL.with_wall_mask(mask))).collect();
    assert_eq!(glyphs.len(), 16);

    for generator in Generator::ALL {
        let maze = built(5, 5, generator, 2024);
        let grid = maze.grid();
        for p in grid.points().filter(|&p| grid.get(p).is_wall()) {
            let cell = grid.get(p);
            assert!(cell.wall_mask() < 16);
            assert!(glyphs.contains(&wall_glyph(cell)));
            for dir in [Direction::North, Direction::East, Direction::South, Direction::West] {
                let n = p + dir.offset();
                let joined = grid.contains(n) && grid.get(n).is_wall();
                assert_eq!(cell.has_wall_toward(dir), joined, "wall {p} toward {dir:?}");
            }
        }
    }
}

#[test]
fn single_worker_solvers_reach_the_finish() {
    for generator in Generator::ALL {
        for solver in [Solver::Dfs, Solver::Bfs] {
            let mut maze = built(19, 25, generator, 5);
            let outcome = maze.solve(solver, &mut StdRng::seed_from_u64(5)).unwrap();
            assert!(outcome.found());
            assert_eq!(outcome.winner, Some(0));
            assert!(maze.grid().get(outcome.finish).is_reached());
            assert!(maze.grid().get(outcome.start).is_start());
            assert!(maze.grid().get(outcome.finish).is_finish());
        }
    }
}

#[test]
fn racing_solvers_have_exactly_one_winner() {
    let mut maze = built(25, 25, Generator::Wilson, 77);
    let mut rng = StdRng::seed_from_u64(77);
    for run in 0..100 {
        let solver = if run % 2 == 0 { Solver::DfsRace } else { Solver::BfsRace };
        let outcome = maze.solve(solver, &mut rng).unwrap();
        let winners = outcome
            .workers
            .iter()
            .filter(|report| report.outcome == WorkerState::WonRecording)
            .count();
        assert_eq!(winners, 1, "run {run}");
        assert!(outcome.winner.is_some());
        assert_eq!(outcome.workers.len(), solver.workers());

        let path = &outcome.path;
        assert_eq!(path.first(), Some(&outcome.start));
        assert_eq!(path.last(), Some(&outcome.finish));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "run {run}: {} and {} are not adjacent", pair[0], pair[1]);
            assert!(maze.grid().get(pair[1]).is_path());
        }
    }
}
