//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with time budgeting and cooperative cancellation
//! - Negamax alpha-beta with transposition table cutoffs
//! - Quiescence search with stand-pat
//! - Move ordering (TT move, MVV-LVA captures, quiet moves)
//! - Lazy SMP parallel search sharing one lockless transposition table
//! - Asynchronous invocation through [`SearchHandle`]

mod config;
mod error;
mod handle;
mod move_order;
mod smp;
mod worker;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, trace, warn};
use parking_lot::Mutex;

use crate::board::{ChessMove, MoveKey, Position};
use crate::evaluation::{Evaluator, MaterialEvaluator};
use crate::sync::CancelToken;
use crate::tt::TranspositionTable;

pub use config::{default_threads, SearchConfig, MAX_DEPTH};
pub use error::SearchError;
pub use handle::{SearchEvent, SearchHandle};
pub use worker::{MATE_SCORE, MATE_THRESHOLD};

use worker::{SearchControl, SharedSearch};

/// Why the deepening loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The configured maximum depth was completed.
    DepthReached,
    /// The allotted time ran out.
    TimeExpired,
    /// The cancellation signal was raised.
    Cancelled,
}

/// Notification sent once per newly completed depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchProgress {
    pub depth: u32,
    pub score: i32,
    pub best_move: MoveKey,
    /// Nodes searched by the reporting worker
    pub nodes: u64,
    pub elapsed: Duration,
    /// Worker that completed the depth first
    pub worker: usize,
}

/// Callback type for progress notifications.
pub type ProgressCallback = Arc<dyn Fn(&SearchProgress) + Send + Sync>;

/// Result of a search containing the best move and its context.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration; carries the position it
    /// leads to.
    pub best_move: ChessMove,
    /// Score in centipawns from the root side to move's point of view
    pub score: i32,
    /// Deepest completed iteration
    pub depth: u32,
    /// Nodes searched by all workers
    pub nodes: u64,
    /// Principal variation, starting with `best_move`
    pub pv: Vec<MoveKey>,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Position after the best move.
    #[must_use]
    pub fn position(&self) -> &Position {
        self.best_move.position()
    }

    /// Moves until mate: positive when the side to move mates, negative when
    /// it gets mated, `None` for ordinary scores.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        if self.score >= MATE_THRESHOLD {
            Some((MATE_SCORE - self.score + 1) / 2)
        } else if self.score <= -MATE_THRESHOLD {
            Some(-(MATE_SCORE + self.score + 1) / 2)
        } else {
            None
        }
    }
}

/// Iterative-deepening alpha-beta searcher.
///
/// Owns the transposition table, which persists between searches until
/// [`Searcher::clear_table`] is called. A `Searcher` can be shared between
/// threads; concurrent searches share the table.
pub struct Searcher {
    config: SearchConfig,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    observers: Arc<Mutex<Vec<ProgressCallback>>>,
}

impl Searcher {
    /// Searcher with an allotted time per search, a depth limit and a thread
    /// count; everything else at its default.
    #[must_use]
    pub fn new(allotted: Duration, max_depth: u32, threads: usize) -> Self {
        Self::with_config(
            SearchConfig::with_threads(threads)
                .time(allotted)
                .depth(max_depth),
        )
    }

    #[must_use]
    pub fn with_config(config: SearchConfig) -> Self {
        let tt = Arc::new(TranspositionTable::new(config.tt_mb));
        Searcher {
            config,
            tt,
            evaluator: Arc::new(MaterialEvaluator),
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Register an observer for completed depths. Observers run on the
    /// thread driving the search.
    pub fn on_progress(&self, callback: impl Fn(&SearchProgress) + Send + Sync + 'static) {
        self.observers.lock().push(Arc::new(callback));
    }

    /// Search with the configured depth and time budget.
    pub fn search(&self, position: &Position) -> Result<SearchResult, SearchError> {
        self.search_with(position, self.config.max_depth, &CancelToken::new())
    }

    /// Search to `max_depth`, stopping early when `cancel` is raised or the
    /// configured time runs out.
    pub fn search_with(
        &self,
        position: &Position,
        max_depth: u32,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchError> {
        let run = SearchRun {
            config: self.config.clone(),
            tt: Arc::clone(&self.tt),
            evaluator: Arc::clone(&self.evaluator),
            observers: Arc::clone(&self.observers),
        };
        run.execute(position, max_depth, cancel.clone(), |_| {})
    }

    /// Start a search on a background thread and return immediately.
    pub fn spawn(&self, position: Position) -> SearchHandle {
        let run = SearchRun {
            config: self.config.clone(),
            tt: Arc::clone(&self.tt),
            evaluator: Arc::clone(&self.evaluator),
            observers: Arc::clone(&self.observers),
        };
        let max_depth = self.config.max_depth;
        SearchHandle::start(CancelToken::new(), move |cancel, events| {
            run.execute(&position, max_depth, cancel, |progress| {
                // A dropped receiver only means nobody is listening.
                let _ = events.send(SearchEvent::Progress(progress.clone()));
            })
        })
    }

    /// Forget everything the transposition table has learned.
    pub fn clear_table(&self) {
        trace!("clearing transposition table");
        self.tt.clear();
    }

    /// Transposition table fill in per mille.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::with_config(SearchConfig::default())
    }
}

/// Owned pieces of a [`Searcher`] needed by one search, so it can run on a
/// thread of its own.
struct SearchRun {
    config: SearchConfig,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    observers: Arc<Mutex<Vec<ProgressCallback>>>,
}

impl SearchRun {
    fn execute(
        &self,
        position: &Position,
        max_depth: u32,
        cancel: CancelToken,
        mut forward: impl FnMut(&SearchProgress),
    ) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let moves = position.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        let max_depth = match moves.len() {
            1 => max_depth.min(1),
            _ => max_depth.min(MAX_DEPTH),
        };
        if max_depth == 0 {
            warn!("search requested with depth 0");
            return Err(SearchError::Exhausted);
        }

        let control = SearchControl::new(start, self.config.time, cancel);
        let use_tt = self.config.use_transposition_table;
        if use_tt {
            self.tt.new_search();
        }
        let shared = SharedSearch {
            tt: use_tt.then_some(&*self.tt),
            evaluator: &*self.evaluator,
            control: &control,
            quiescence: self.config.quiescence,
        };

        let observers = self.observers.lock().clone();
        let outcomes = smp::run_workers(
            position,
            shared,
            self.config.threads.max(1),
            max_depth,
            |progress| {
                for observer in &observers {
                    observer(progress);
                }
                forward(progress);
            },
        );

        if let Some(err) = outcomes.iter().find_map(|o| o.error.clone()) {
            warn!("search aborted: {err}");
            return Err(SearchError::Evaluator(err));
        }

        let nodes = outcomes.iter().map(|o| o.nodes).sum();
        let Some(completed) = smp::select_best(&outcomes).and_then(|o| o.completed.clone()) else {
            warn!("search exhausted after {nodes} nodes without completing a depth");
            return Err(SearchError::Exhausted);
        };

        let stop_reason = if completed.depth >= max_depth {
            StopReason::DepthReached
        } else if control.is_cancelled() {
            StopReason::Cancelled
        } else if control.deadline_passed()
            || outcomes.iter().any(|o| o.stop == StopReason::TimeExpired)
        {
            StopReason::TimeExpired
        } else {
            StopReason::DepthReached
        };

        let pv = if use_tt {
            principal_variation(&self.tt, &completed.best_move, completed.depth)
        } else {
            vec![completed.best_move.key()]
        };

        let result = SearchResult {
            best_move: completed.best_move,
            score: completed.score,
            depth: completed.depth,
            nodes,
            pv,
            stop_reason,
            elapsed: start.elapsed(),
        };
        info!(
            "bestmove {} score {} depth {} nodes {} time {:?} ({:?})",
            result.best_move, result.score, result.depth, result.nodes, result.elapsed, stop_reason
        );
        Ok(result)
    }
}

/// Follow stored best moves from the position after `first`, keeping only
/// moves legal where they are played and stopping on a repeated position.
fn principal_variation(tt: &TranspositionTable, first: &ChessMove, depth: u32) -> Vec<MoveKey> {
    let mut pv = vec![first.key()];
    let mut seen = HashSet::new();
    let mut position = first.position().clone();
    while pv.len() < depth as usize && seen.insert(position.hash()) {
        let Some(key) = tt.probe(position.hash()).and_then(|entry| entry.best_move) else {
            break;
        };
        match position.apply_key(key) {
            Ok(next) => {
                pv.push(key);
                position = next;
            }
            Err(_) => break,
        }
    }
    pv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvaluationError;

    #[test]
    fn test_mate_in_reporting() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let result = Searcher::with_config(SearchConfig::default().depth(3))
            .search(&position)
            .unwrap();
        assert_eq!(result.best_move.to_string(), "a1a8");
        assert_eq!(result.mate_in(), Some(1));
        assert!(result.position().is_checkmate());
        assert_eq!(result.pv[0], result.best_move.key());
        assert_eq!(result.stop_reason, StopReason::DepthReached);
    }

    #[test]
    fn test_no_legal_moves_is_an_error() {
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let err = Searcher::default().search(&stalemate).unwrap_err();
        assert_eq!(err, SearchError::NoLegalMoves);
    }

    #[test]
    fn test_zero_depth_is_exhausted() {
        let searcher = Searcher::default();
        let err = searcher
            .search_with(&Position::initial(), 0, &CancelToken::new())
            .unwrap_err();
        assert_eq!(err, SearchError::Exhausted);
    }

    #[test]
    fn test_evaluator_failure_propagates() {
        let searcher = Searcher::with_config(SearchConfig::default().depth(3)).with_evaluator(
            |_: &Position| -> Result<i32, EvaluationError> { Err(EvaluationError::new("boom")) },
        );
        let err = searcher.search(&Position::initial()).unwrap_err();
        assert!(matches!(err, SearchError::Evaluator(ref e) if e.message() == "boom"));
    }

    #[test]
    fn test_single_legal_move_returns_quickly() {
        // Only Kh1-g1... the king in the corner has one flight square.
        let position = Position::from_fen("8/8/8/8/8/6k1/4r3/7K w - - 0 1").unwrap();
        assert_eq!(position.legal_moves().len(), 1);
        let result = Searcher::default().search(&position).unwrap();
        assert_eq!(result.best_move.to_string(), "h1g1");
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn test_clear_table() {
        let searcher = Searcher::with_config(SearchConfig::default().depth(4).table_mb(1));
        searcher.search(&Position::initial()).unwrap();
        assert!(searcher.hashfull_per_mille() > 0);
        searcher.clear_table();
        assert_eq!(searcher.hashfull_per_mille(), 0);
    }

    #[test]
    fn test_mate_in_negative_for_losing_side() {
        let result = SearchResult {
            best_move: Position::initial().legal_moves()[0].clone(),
            score: -(MATE_SCORE - 4),
            depth: 4,
            nodes: 0,
            pv: Vec::new(),
            stop_reason: StopReason::DepthReached,
            elapsed: Duration::ZERO,
        };
        assert_eq!(result.mate_in(), Some(-2));
    }
}
