//! One search thread: iterative deepening over negamax alpha-beta.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use log::debug;

use crate::board::{ChessMove, Position};
use crate::evaluation::{EvaluationError, Evaluator};
use crate::sync::CancelToken;
use crate::tt::{BoundType, TranspositionTable};

use super::move_order::order_moves;
use super::{SearchProgress, StopReason};

/// Score of being mated at the root. Mate at ply `n` scores `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 30_000;

/// Hard recursion limit; also bounds check extensions.
pub(crate) const MAX_PLY: u32 = 128;

/// Scores with absolute value >= this are checkmate scores
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

const INFINITY: i32 = MATE_SCORE + 1;

/// Nodes between clock and cancellation polls
const POLL_INTERVAL: u64 = 256;

/// Time and cancellation state shared by every worker of one search.
pub(crate) struct SearchControl {
    start: Instant,
    deadline: Option<Instant>,
    cancel: CancelToken,
    /// Raised when some worker finished the last depth or failed
    halt: AtomicBool,
}

impl SearchControl {
    pub(crate) fn new(start: Instant, allotted: Option<Duration>, cancel: CancelToken) -> Self {
        SearchControl {
            start,
            deadline: allotted.map(|d| start + d),
            cancel,
            halt: AtomicBool::new(false),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub(crate) fn halt(&self) {
        self.halt.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Remaining budget, `None` when unlimited.
    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    fn poll(&self) -> Option<StopReason> {
        if self.cancel.is_cancelled() {
            Some(StopReason::Cancelled)
        } else if self.halt.load(Ordering::Relaxed) {
            Some(StopReason::DepthReached)
        } else if self.deadline_passed() {
            Some(StopReason::TimeExpired)
        } else {
            None
        }
    }
}

/// Everything a worker reads but never owns.
#[derive(Clone, Copy)]
pub(crate) struct SharedSearch<'a> {
    pub(crate) tt: Option<&'a TranspositionTable>,
    pub(crate) evaluator: &'a dyn Evaluator,
    pub(crate) control: &'a SearchControl,
    pub(crate) quiescence: bool,
}

/// Why a tree walk was abandoned midway.
enum Abort {
    Stopped(StopReason),
    Evaluator(EvaluationError),
}

/// Last fully searched iteration of a worker.
#[derive(Clone, Debug)]
pub(crate) struct Completed {
    pub(crate) best_move: ChessMove,
    pub(crate) score: i32,
    pub(crate) depth: u32,
}

#[derive(Debug)]
pub(crate) struct WorkerOutcome {
    pub(crate) id: usize,
    pub(crate) completed: Option<Completed>,
    pub(crate) nodes: u64,
    pub(crate) stop: StopReason,
    pub(crate) error: Option<EvaluationError>,
}

/// Get depth offset for a worker thread.
///
/// Odd workers start one ply deeper so the shared table fills with deeper
/// entries sooner; even workers follow the main worker's schedule.
pub(crate) fn worker_depth_offset(worker_id: usize) -> u32 {
    (worker_id % 2) as u32
}

fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

pub(crate) struct SearchWorker<'a> {
    id: usize,
    shared: SharedSearch<'a>,
    nodes: u64,
}

impl<'a> SearchWorker<'a> {
    pub(crate) fn new(id: usize, shared: SharedSearch<'a>) -> Self {
        SearchWorker {
            id,
            shared,
            nodes: 0,
        }
    }

    /// Iterative deepening up to `max_depth`, reporting each completed depth.
    ///
    /// A depth interrupted midway never replaces the previous result.
    pub(crate) fn run(
        mut self,
        root: &Position,
        max_depth: u32,
        progress: &Sender<SearchProgress>,
    ) -> WorkerOutcome {
        let control = self.shared.control;
        let mut completed: Option<Completed> = None;
        let mut last_iteration: Option<Duration> = None;
        let start_depth = (1 + worker_depth_offset(self.id)).min(max_depth);

        let stop = 'deepening: {
            for depth in start_depth..=max_depth {
                if let Some(reason) = control.poll() {
                    break 'deepening reason;
                }
                // Skip a depth that cannot finish in the remaining budget.
                if let (Some(last), Some(remaining)) = (last_iteration, control.remaining()) {
                    if last.saturating_mul(3) > remaining {
                        break 'deepening StopReason::TimeExpired;
                    }
                }

                let iteration_start = Instant::now();
                match self.search_root(root, depth) {
                    Ok((score, best_move)) => {
                        last_iteration = Some(iteration_start.elapsed());
                        debug!(
                            "worker {} depth {} score {} move {} nodes {}",
                            self.id, depth, score, best_move, self.nodes
                        );
                        // Receiver gone means the controller stopped listening.
                        let _ = progress.send(SearchProgress {
                            depth,
                            score,
                            best_move: best_move.key(),
                            nodes: self.nodes,
                            elapsed: control.elapsed(),
                            worker: self.id,
                        });
                        completed = Some(Completed {
                            best_move,
                            score,
                            depth,
                        });
                    }
                    Err(Abort::Stopped(reason)) => break 'deepening reason,
                    Err(Abort::Evaluator(err)) => {
                        control.halt();
                        return WorkerOutcome {
                            id: self.id,
                            completed,
                            nodes: self.nodes,
                            stop: StopReason::DepthReached,
                            error: Some(err),
                        };
                    }
                }
            }
            control.halt();
            StopReason::DepthReached
        };

        WorkerOutcome {
            id: self.id,
            completed,
            nodes: self.nodes,
            stop,
            error: None,
        }
    }

    fn visit(&mut self) -> Result<(), Abort> {
        self.nodes += 1;
        if self.nodes % POLL_INTERVAL == 0 {
            if let Some(reason) = self.shared.control.poll() {
                return Err(Abort::Stopped(reason));
            }
        }
        Ok(())
    }

    fn evaluate(&self, position: &Position) -> Result<i32, Abort> {
        self.shared
            .evaluator
            .evaluate(position)
            .map(|score| score.clamp(-MATE_THRESHOLD + 1, MATE_THRESHOLD - 1))
            .map_err(Abort::Evaluator)
    }

    fn search_root(&mut self, root: &Position, depth: u32) -> Result<(i32, ChessMove), Abort> {
        let tt_move = self
            .shared
            .tt
            .and_then(|tt| tt.probe(root.hash()))
            .and_then(|entry| entry.best_move);

        let mut moves = root.legal_moves();
        order_moves(moves.as_mut_slice(), tt_move);

        // Ties go to the lowest move key, so the choice never depends on
        // move order. Searching one below alpha gives tying moves an exact
        // score.
        let mut alpha = -INFINITY;
        let mut best: Option<(i32, &ChessMove)> = None;
        for mv in moves.iter() {
            self.visit()?;
            let floor = (alpha - 1).max(-INFINITY);
            let score = -self.negamax(mv.position(), depth - 1, -INFINITY, -floor, 1)?;
            let better = best.map_or(true, |(best_score, best_move)| {
                score > best_score
                    || (score == best_score && mv.key().as_u16() < best_move.key().as_u16())
            });
            if better {
                best = Some((score, mv));
                alpha = alpha.max(score);
            }
        }

        // The caller rejects positions without moves, so `best` is set.
        let (score, best_move) = best.ok_or(Abort::Stopped(StopReason::DepthReached))?;
        if let Some(tt) = self.shared.tt {
            tt.store(root.hash(), depth, score, BoundType::Exact, Some(best_move.key()));
        }
        Ok((score, best_move.clone()))
    }

    fn negamax(
        &mut self,
        position: &Position,
        mut depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: u32,
    ) -> Result<i32, Abort> {
        if ply >= MAX_PLY {
            return self.evaluate(position);
        }
        if position.halfmove_clock() >= 100 && !position.is_checkmate() {
            return Ok(0);
        }
        if position.is_insufficient_material() {
            return Ok(0);
        }

        let in_check = position.is_in_check();
        if depth == 0 {
            if !in_check {
                return if self.shared.quiescence {
                    self.quiesce(position, alpha, beta, ply)
                } else {
                    self.evaluate(position)
                };
            }
            // Check extension: never stand pat while in check.
            depth = 1;
        }

        let alpha_orig = alpha;
        let mut tt_move = None;
        if let Some(entry) = self.shared.tt.and_then(|tt| tt.probe(position.hash())) {
            tt_move = entry.best_move;
            // Only same-depth entries cut, so scores match a search without
            // the table.
            if entry.depth() == depth {
                let score = score_from_tt(entry.score(), ply);
                match entry.bound_type {
                    BoundType::Exact => return Ok(score),
                    BoundType::LowerBound => alpha = alpha.max(score),
                    BoundType::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    return Ok(score);
                }
            }
        }

        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return Ok(if in_check {
                -MATE_SCORE + ply as i32
            } else {
                0
            });
        }
        order_moves(moves.as_mut_slice(), tt_move);

        let mut best_score = -INFINITY;
        let mut best_move = None;
        for mv in moves.iter() {
            self.visit()?;
            let score = -self.negamax(mv.position(), depth - 1, -beta, -alpha, ply + 1)?;
            if score > best_score {
                best_score = score;
                best_move = Some(mv.key());
                if score > alpha {
                    alpha = score;
                }
            }
            if alpha >= beta {
                break;
            }
        }

        if let Some(tt) = self.shared.tt {
            let bound = if best_score <= alpha_orig {
                BoundType::UpperBound
            } else if best_score >= beta {
                BoundType::LowerBound
            } else {
                BoundType::Exact
            };
            tt.store(
                position.hash(),
                depth,
                score_to_tt(best_score, ply),
                bound,
                best_move,
            );
        }
        Ok(best_score)
    }

    /// Captures-only search with stand-pat.
    fn quiesce(
        &mut self,
        position: &Position,
        mut alpha: i32,
        beta: i32,
        ply: u32,
    ) -> Result<i32, Abort> {
        let stand_pat = self.evaluate(position)?;
        if stand_pat >= beta || ply >= MAX_PLY {
            return Ok(stand_pat);
        }
        alpha = alpha.max(stand_pat);

        let mut moves = position.legal_tactical_moves();
        order_moves(moves.as_mut_slice(), None);

        let mut best_score = stand_pat;
        for mv in moves.iter() {
            self.visit()?;
            let score = -self.quiesce(mv.position(), -beta, -alpha, ply + 1)?;
            if score > best_score {
                best_score = score;
                alpha = alpha.max(score);
            }
            if alpha >= beta {
                break;
            }
        }
        Ok(best_score)
    }
}
