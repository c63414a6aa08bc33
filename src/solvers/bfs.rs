use std::collections::HashMap;

use super::WorkerState;
use super::race::{Worker, WorkerRun};
use crate::error::{MazeError, Result};
use crate::maze::Point;
use crate::queue::RingQueue;

/// Parent of the start cell; never a real coordinate.
const ORIGIN: Point = Point::new(-1, -1);

/// Breadth-first search over a ring-buffer frontier. Cells are marked seen as
/// they are queued; only the winner paints, and only the reconstructed path.
pub(super) fn breadth_first(worker: &mut Worker) -> Result<WorkerRun> {
    let shared = worker.shared;
    let seen = worker.seen_bit();

    let mut frontier = RingQueue::new();
    let mut parents: HashMap<Point, Point> = HashMap::new();
    parents.insert(shared.start, ORIGIN);
    shared.record(&[shared.start], |cell| cell.with(seen))?;
    frontier.push(shared.start)?;

    while let Some(current) = frontier.pop() {
        if shared.has_winner() {
            return Ok(worker.finish(WorkerState::LostDiscard, Vec::new()));
        }

        if current == shared.finish {
            if !shared.claim(worker.id) {
                return Ok(worker.finish(WorkerState::LostDiscard, Vec::new()));
            }
            let path = reconstruct(&parents, current)?;
            let color = worker.color();
            shared.record(&path, |cell| cell.with_paint(color))?;
            return Ok(worker.finish(WorkerState::WonRecording, path));
        }

        let next = worker.unseen_neighbors(current).collect::<Vec<_>>();
        for n in next {
            parents.try_reserve(1)?;
            parents.insert(n, current);
            shared.record(&[n], |cell| cell.with(seen))?;
            frontier.push(n)?;
        }
    }
    Ok(worker.finish(WorkerState::ExhaustedNoPath, Vec::new()))
}

/// Walks parent links from `finish` back to the origin, returning the path start first.
fn reconstruct(parents: &HashMap<Point, Point>, finish: Point) -> Result<Vec<Point>> {
    let mut path = Vec::new();
    let mut p = finish;
    loop {
        path.try_reserve(1)?;
        path.push(p);
        match parents.get(&p) {
            Some(&ORIGIN) => break,
            Some(&parent) => p = parent,
            None => return Err(MazeError::LogicFail("path cell has no recorded parent")),
        }
    }
    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_follows_parents() {
        let parents = HashMap::from([
            (Point::new(1, 1), ORIGIN),
            (Point::new(1, 2), Point::new(1, 1)),
            (Point::new(1, 3), Point::new(1, 2)),
        ]);
        assert_eq!(
            reconstruct(&parents, Point::new(1, 3)).unwrap(),
            vec![Point::new(1, 1), Point::new(1, 2), Point::new(1, 3)]
        );
    }

    #[test]
    fn test_missing_parent_is_a_logic_failure() {
        let parents = HashMap::from([(Point::new(1, 2), Point::new(1, 1))]);
        assert!(matches!(
            reconstruct(&parents, Point::new(1, 2)),
            Err(MazeError::LogicFail(_))
        ));
    }
}
