use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{SearchKind, SolveOutcome, WORKER_COLORS, WorkerReport, WorkerState, bfs, dfs};
use crate::error::{MazeError, Result};
use crate::history::{Burst, Tape};
use crate::maze::point::{CARDINALS, Direction};
use crate::maze::{Cell, Grid, MAX_WORKERS, Point};

const NO_WINNER: usize = usize::MAX;

/// Everything the workers of one solve pass share.
///
/// Workers read cells without locking. Every write goes through [`Shared::record`],
/// which holds the tape lock across the atomic update and the append, so the
/// tape order is exactly the mutation order.
pub(super) struct Shared<'a> {
    pub(super) grid: &'a Grid,
    pub(super) start: Point,
    pub(super) finish: Point,
    tape: Mutex<&'a mut Tape>,
    winner: AtomicUsize,
}

impl<'a> Shared<'a> {
    fn new(grid: &'a Grid, tape: &'a mut Tape, start: Point, finish: Point) -> Self {
        Shared {
            grid,
            start,
            finish,
            tape: Mutex::new(tape),
            winner: AtomicUsize::new(NO_WINNER),
        }
    }

    pub(super) fn has_winner(&self) -> bool {
        self.winner.load(Ordering::Acquire) != NO_WINNER
    }

    fn winner(&self) -> Option<usize> {
        match self.winner.load(Ordering::Acquire) {
            NO_WINNER => None,
            id => Some(id),
        }
    }

    /// Tries to become the winner. Exactly one caller per pass succeeds.
    pub(super) fn claim(&self, worker: usize) -> bool {
        self.winner
            .compare_exchange(NO_WINNER, worker, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Applies `f` to each point and records the changes as one burst.
    pub(super) fn record(&self, points: &[Point], f: impl Fn(Cell) -> Cell) -> Result<()> {
        let mut tape = self
            .tape
            .lock()
            .map_err(|_| MazeError::LogicFail("solve history lock poisoned"))?;
        let mut burst = Burst::new();
        for &p in points {
            let before = self.grid.fetch_modify(p, &f);
            let after = f(before);
            if before != after {
                burst.push(p, before, after)?;
            }
        }
        burst.flush(&mut **tape)
    }
}

/// One worker's view of the race.
pub(super) struct Worker<'s, 'a> {
    pub(super) id: usize,
    pub(super) shared: &'s Shared<'a>,
    state: WorkerState,
    order: [Direction; 4],
}

/// What a worker hands back when its search ends.
pub(super) struct WorkerRun {
    pub(super) state: WorkerState,
    pub(super) path: Vec<Point>,
}

impl<'s, 'a> Worker<'s, 'a> {
    fn new(id: usize, shared: &'s Shared<'a>) -> Self {
        // Rotate the neighbour order so each worker heads off in its own direction first.
        let mut order = CARDINALS;
        order.rotate_left(id % CARDINALS.len());
        Worker {
            id,
            shared,
            state: WorkerState::Idle,
            order,
        }
    }

    pub(super) fn seen_bit(&self) -> u64 {
        Cell::seen_bit(self.id)
    }

    pub(super) fn color(&self) -> u32 {
        WORKER_COLORS[self.id]
    }

    pub(super) fn advance(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "worker {} cannot go from {:?} to {:?}",
            self.id,
            self.state,
            next
        );
        tracing::trace!("[race] worker {} {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// Ends the search in `state`, returning `path` to the coordinator.
    pub(super) fn finish(&mut self, state: WorkerState, path: Vec<Point>) -> WorkerRun {
        self.advance(state);
        WorkerRun { state, path }
    }

    /// Open neighbours of `p` this worker has not seen, in its preferred order.
    pub(super) fn unseen_neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        let grid = self.shared.grid;
        let id = self.id;
        self.order
            .iter()
            .map(move |dir| p + dir.offset())
            .filter(move |&n| {
                if !grid.contains(n) {
                    return false;
                }
                let cell = grid.get(n);
                cell.is_path() && !cell.is_seen_by(id)
            })
    }

    fn run(&mut self, kind: SearchKind) -> Result<WorkerRun> {
        self.advance(WorkerState::Searching);
        match kind {
            SearchKind::DepthFirst => dfs::depth_first(self),
            SearchKind::BreadthFirst => bfs::breadth_first(self),
        }
    }
}

/// Searches from `start` to `finish` with `workers` workers racing over the
/// same grid. A single worker runs on the calling thread; more are forked and
/// all joined before returning. The first worker error is returned once every
/// worker has been joined.
pub fn search(
    grid: &Grid,
    tape: &mut Tape,
    start: Point,
    finish: Point,
    kind: SearchKind,
    workers: usize,
) -> Result<SolveOutcome> {
    if !(1..=MAX_WORKERS).contains(&workers) {
        return Err(MazeError::LogicFail("worker count outside the seen-bit range"));
    }
    let shared = Shared::new(grid, tape, start, finish);

    let results: Vec<std::thread::Result<Result<WorkerRun>>> = if workers == 1 {
        vec![Ok(Worker::new(0, &shared).run(kind))]
    } else {
        std::thread::scope(|scope| {
            let handles = (0..workers)
                .map(|id| {
                    let shared = &shared;
                    scope.spawn(move || Worker::new(id, shared).run(kind))
                })
                .collect::<Vec<_>>();
            handles.into_iter().map(|handle| handle.join()).collect()
        })
    };

    let mut first_error = None;
    let mut reports = Vec::with_capacity(workers);
    let mut path = Vec::new();
    for (id, joined) in results.into_iter().enumerate() {
        match joined {
            Ok(Ok(run)) if run.state.can_advance_to(WorkerState::Joined) => {
                tracing::debug!("[race] worker {} joined after {:?}", id, run.state);
                if run.state == WorkerState::WonRecording {
                    path = run.path;
                }
                reports.push(WorkerReport {
                    id,
                    outcome: run.state,
                    state: WorkerState::Joined,
                });
            }
            Ok(Ok(run)) => {
                tracing::warn!("[race] worker {} returned while {:?}", id, run.state);
                first_error.get_or_insert(MazeError::LogicFail("worker returned before its search ended"));
            }
            Ok(Err(err)) => {
                tracing::warn!("[race] worker {} failed: {}", id, err);
                first_error.get_or_insert(err);
            }
            Err(_) => {
                tracing::warn!("[race] worker {} panicked", id);
                first_error.get_or_insert(MazeError::LogicFail("solver worker panicked"));
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    Ok(SolveOutcome {
        start,
        finish,
        winner: shared.winner(),
        path,
        workers: reports,
    })
}
