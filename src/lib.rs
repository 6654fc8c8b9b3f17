//! Chess rules and a parallel alpha-beta search core.
//!
//! - [`board`]: positions, legal move generation, FEN and game status
//! - [`search`]: iterative-deepening Lazy SMP search with time control
//! - [`tt`]: the lockless transposition table shared by search threads
//! - [`evaluation`]: the pluggable evaluator contract
//!
//! ```no_run
//! use std::time::Duration;
//! use chessium::{Position, Searcher};
//!
//! let searcher = Searcher::new(Duration::from_secs(1), 32, 4);
//! let result = searcher.search(&Position::initial()).unwrap();
//! println!("{} after depth {}", result.best_move, result.depth);
//! ```

pub mod board;
pub mod evaluation;
pub mod perft;
pub mod search;
pub mod sync;
pub mod tt;
mod zobrist;

pub use board::{ChessMove, Color, FenError, GameStatus, MoveError, MoveKey, Piece, Position, Square};
pub use evaluation::{EvaluationError, Evaluator, MaterialEvaluator};
pub use search::{SearchConfig, SearchError, SearchResult, Searcher};
pub use sync::CancelToken;
pub use tt::TranspositionTable;
