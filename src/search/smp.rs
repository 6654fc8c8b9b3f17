//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! Every worker searches the same root independently, running its own
//! iterative deepening loop. The shared transposition table is the only
//! coordination between them. Workers report completed depths over a
//! channel; the calling thread forwards them and picks the final result.

use std::panic;
use std::sync::mpsc;
use std::thread;

use log::warn;

use crate::board::Position;

use super::worker::{SearchWorker, SharedSearch, WorkerOutcome};
use super::SearchProgress;

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Run `threads` workers on `root` and block until all have stopped.
///
/// `on_progress` runs on the calling thread and sees strictly increasing
/// depths; every call happens before this function returns. A panic in a
/// worker is resumed here.
pub(crate) fn run_workers<'a>(
    root: &Position,
    shared: SharedSearch<'a>,
    threads: usize,
    max_depth: u32,
    mut on_progress: impl FnMut(&SearchProgress),
) -> Vec<WorkerOutcome> {
    let (tx, rx) = mpsc::channel::<SearchProgress>();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(threads);
        for id in 0..threads {
            let tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    SearchWorker::new(id, shared).run(root, max_depth, &tx)
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => warn!("could not spawn search worker {id}: {err}"),
            }
        }

        // Without any thread, search on this one.
        let mut outcomes = Vec::with_capacity(threads);
        if handles.is_empty() {
            outcomes.push(SearchWorker::new(0, shared).run(root, max_depth, &tx));
        }
        drop(tx);

        let mut reported = 0;
        for progress in rx {
            if progress.depth > reported {
                reported = progress.depth;
                on_progress(&progress);
            }
        }

        for handle in handles {
            match handle.join() {
                Ok(outcome) => outcomes.push(outcome),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        outcomes
    })
}

/// Pick the worker with the deepest completed iteration, breaking ties by
/// node count.
pub(crate) fn select_best(outcomes: &[WorkerOutcome]) -> Option<&WorkerOutcome> {
    outcomes
        .iter()
        .filter(|outcome| outcome.completed.is_some())
        .max_by_key(|outcome| {
            let depth = outcome.completed.as_ref().map_or(0, |c| c.depth);
            (depth, outcome.nodes, std::cmp::Reverse(outcome.id))
        })
}
