mod bfs;
mod dfs;
mod placement;
mod race;

use rand::Rng;

pub use placement::place_start_finish;
pub use race::search;

use crate::error::{Result, UnknownStrategy};
use crate::history::Tape;
use crate::maze::{Grid, MAX_WORKERS, Point};

/// Paint colour of each worker, packed 0xRRGGBB.
pub const WORKER_COLORS: [u32; MAX_WORKERS] = [0xE7_4C_3C, 0x34_98_DB, 0x2E_CC_71, 0xF1_C4_0F];

/// Which traversal a worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    DepthFirst,
    BreadthFirst,
}

/// Available maze solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Dfs,
    Bfs,
    DfsRace,
    BfsRace,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Dfs, Solver::Bfs, Solver::DfsRace, Solver::BfsRace];

    pub fn name(self) -> &'static str {
        match self {
            Solver::Dfs => "dfs",
            Solver::Bfs => "bfs",
            Solver::DfsRace => "dfs-race",
            Solver::BfsRace => "bfs-race",
        }
    }

    pub fn kind(self) -> SearchKind {
        match self {
            Solver::Dfs | Solver::DfsRace => SearchKind::DepthFirst,
            Solver::Bfs | Solver::BfsRace => SearchKind::BreadthFirst,
        }
    }

    /// Number of racing workers. One worker runs on the caller's thread.
    pub fn workers(self) -> usize {
        match self {
            Solver::Dfs | Solver::Bfs => 1,
            Solver::DfsRace | Solver::BfsRace => MAX_WORKERS,
        }
    }

    /// Places start and finish on a built maze, then searches between them.
    /// Every mutation is recorded on `tape`.
    pub fn solve<R: Rng + ?Sized>(self, grid: &mut Grid, tape: &mut Tape, rng: &mut R) -> Result<SolveOutcome> {
        let (start, finish) = place_start_finish(grid, tape, rng)?;
        let outcome = search(grid, tape, start, finish, self.kind(), self.workers())?;
        match outcome.winner {
            Some(winner) => tracing::info!(
                "[solve] {} reached {} from {}, worker {} won with {} cells",
                self.name(),
                finish,
                start,
                winner,
                outcome.path.len()
            ),
            None => tracing::info!("[solve] {} found no path from {} to {}", self.name(), start, finish),
        }
        Ok(outcome)
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::DfsRace => write!(f, "Racing Depth-First Search ({MAX_WORKERS} threads)"),
            Solver::BfsRace => write!(f, "Racing Breadth-First Search ({MAX_WORKERS} threads)"),
        }
    }
}

impl std::str::FromStr for Solver {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Solver::ALL
            .into_iter()
            .find(|solver| solver.name() == s)
            .ok_or_else(|| UnknownStrategy {
                kind: "solver",
                name: s.to_string(),
            })
    }
}

/// Lifecycle of one solver worker.
///
/// `Idle -> Searching -> {WonRecording | LostDiscard | ExhaustedNoPath} -> Joined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Searching,
    /// Won the race and recorded its path.
    WonRecording,
    /// Saw another worker win and dropped its frontier.
    LostDiscard,
    /// Ran out of cells without reaching the finish.
    ExhaustedNoPath,
    Joined,
}

impl WorkerState {
    pub fn can_advance_to(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Idle, Searching)
                | (Searching, WonRecording | LostDiscard | ExhaustedNoPath)
                | (WonRecording | LostDiscard | ExhaustedNoPath, Joined)
        )
    }
}

/// How one worker's search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    /// The state the search ended in, before the worker was joined.
    pub outcome: WorkerState,
    /// Lifecycle state at report time; always `Joined`.
    pub state: WorkerState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub start: Point,
    pub finish: Point,
    /// The worker whose compare-and-swap claimed the win.
    pub winner: Option<usize>,
    /// The winner's path from start to finish, empty when nobody won.
    pub path: Vec<Point>,
    pub workers: Vec<WorkerReport>,
}

impl SolveOutcome {
    pub fn found(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Generator;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_state_machine() {
        use WorkerState::*;
        assert!(Idle.can_advance_to(Searching));
        assert!(Searching.can_advance_to(LostDiscard));
        assert!(WonRecording.can_advance_to(Joined));
        assert!(!Joined.can_advance_to(Searching));
        assert!(!Idle.can_advance_to(WonRecording));
        assert!(!LostDiscard.can_advance_to(WonRecording));
    }

    #[test]
    fn test_every_solver_finds_the_finish() {
        for generator in Generator::ALL {
            for solver in Solver::ALL {
                let mut grid = Grid::new(17, 23).unwrap();
                let mut build = Tape::new();
                let mut rng = StdRng::seed_from_u64(21);
                generator.generate(&mut grid, &mut build, &mut rng).unwrap();

                let mut tape = Tape::new();
                let outcome = solver.solve(&mut grid, &mut tape, &mut rng).unwrap();
                assert!(outcome.found(), "{solver} on {generator}");
                assert_eq!(outcome.path.first(), Some(&outcome.start));
                assert_eq!(outcome.path.last(), Some(&outcome.finish));
                assert!(grid.get(outcome.finish).is_reached());
                assert_eq!(outcome.workers.len(), solver.workers());
            }
        }
    }

    #[test]
    fn test_names_round_trip() {
        for solver in Solver::ALL {
            assert_eq!(solver.name().parse::<Solver>(), Ok(solver));
        }
        assert!("astar".parse::<Solver>().is_err());
    }
}
