//! Core chess types.
//!
//! This module contains the fundamental value types of the engine:
//! - `Piece` and `Color` - piece types and sides
//! - `Square` - compact board square (0-63)
//! - `CastlingRights` and `CastleSide`
//! - `ChessMove`, `MoveKey` and `MoveList` - move representation

mod castling;
mod moves;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use moves::{ChessMove, MoveKey, MoveKind, MoveList};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
