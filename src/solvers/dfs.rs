use super::WorkerState;
use super::race::{Worker, WorkerRun};
use crate::error::Result;

/// Depth-first search with an explicit point stack.
///
/// The stack always holds the current route from start, painted in the
/// worker's colour; dead ends are unpainted as they are popped.
pub(super) fn depth_first(worker: &mut Worker) -> Result<WorkerRun> {
    let shared = worker.shared;
    let seen = worker.seen_bit();
    let color = worker.color();

    let mut stack = Vec::new();
    stack.try_reserve(1)?;
    stack.push(shared.start);

    while let Some(&top) = stack.last() {
        if shared.has_winner() {
            return Ok(worker.finish(WorkerState::LostDiscard, Vec::new()));
        }

        if top == shared.finish {
            if !shared.claim(worker.id) {
                return Ok(worker.finish(WorkerState::LostDiscard, Vec::new()));
            }
            // Repaint the whole route: other workers may have painted over parts of it.
            shared.record(&stack, |cell| cell.with(seen).with_paint(color))?;
            return Ok(worker.finish(WorkerState::WonRecording, stack));
        }

        if !shared.grid.get(top).is_seen_by(worker.id) {
            shared.record(&[top], |cell| cell.with(seen).with_paint(color))?;
        }

        match worker.unseen_neighbors(top).next() {
            Some(next) => {
                stack.try_reserve(1)?;
                stack.push(next);
            }
            None => {
                shared.record(&[top], |cell| {
                    if cell.paint() == color {
                        cell.with_paint(0)
                    } else {
                        cell
                    }
                })?;
                stack.pop();
            }
        }
    }
    Ok(worker.finish(WorkerState::ExhaustedNoPath, Vec::new()))
}
