//! Chess positions and the rules of the game.
//!
//! A [`Position`] is an immutable value. Move generation returns
//! [`ChessMove`]s that each carry the position they lead to, so applying a
//! move is just taking that position.
//!
//! # Example
//! ```
//! use chessium::board::Position;
//!
//! let position = Position::initial();
//! let moves = position.legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod apply;
mod attacks;
mod error;
mod fen;
mod movegen;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveError, SquareError};
pub use fen::STARTING_FEN;
pub use state::{DrawReason, GameStatus, Position};
pub use types::{CastleSide, CastlingRights, ChessMove, Color, MoveKey, MoveKind, MoveList, Piece, Square};

pub(crate) use types::PROMOTION_PIECES;
