//! Static evaluation.
//!
//! The search only depends on the [`Evaluator`] trait; [`MaterialEvaluator`]
//! is the default implementation.

use std::fmt;

use crate::board::{Color, Piece, Position, Square};

/// Failure reported by an evaluator. The search aborts when it sees one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    message: String,
}

impl EvaluationError {
    pub fn new(message: impl Into<String>) -> Self {
        EvaluationError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Evaluation failed: {}", self.message)
    }
}

impl std::error::Error for EvaluationError {}

/// Scores a position in centipawns from the side to move's point of view.
///
/// Implementations are shared by every search thread, so they must be
/// `Send + Sync`. Scores should stay well inside `±20_000` so they never
/// collide with mate scores.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, position: &Position) -> Result<i32, EvaluationError>;
}

impl<F> Evaluator for F
where
    F: Fn(&Position) -> Result<i32, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, position: &Position) -> Result<i32, EvaluationError> {
        self(position)
    }
}

// Piece-square tables, laid out with a8 first so they read like a board
// from White's side.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
    0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
    5,   5,   10,  25,  25,  10,  5,   5,
    0,   0,   0,   20,  20,   0,   0,   0,
    5,   -5,  -10,  0,   0,   -10, -5,  5,
    5,   10,  10,  -20, -20,  10,  10,  5,
    0,   0,   0,   0,   0,   0,   0,   0
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,  0,   0,   0,   0,   -20, -40,
    -30,  0,   10,  15,  15,  10,  0,   -30,
    -30,  5,   15,  20,  20,  15,  5,   -30,
    -30,  0,   15,  20,  20,  15,  0,   -30,
    -30,  5,   10,  15,  15,  10,  5,   -30,
    -40, -20,  0,   5,   5,   0,   -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,  0,   0,   0,   0,   0,   0,   -10,
    -10,  0,   5,   10,  10,  5,   0,   -10,
    -10,  5,   5,   10,  10,  5,   5,   -10,
    -10,  0,   10,  10,  10,  10,  0,   -10,
    -10,  10,  10,  10,  10,  10,  10,  -10,
    -10,  5,   0,   0,   0,   0,   5,   -10,
    -20, -10, -10, -10, -10, -10, -10, -20
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    5,  10, 10, 10, 10, 10, 10, 5,
    -5, 0,  0,  0,  0,  0,  0,  -5,
    -5, 0,  0,  0,  0,  0,  0,  -5,
    -5, 0,  0,  0,  0,  0,  0,  -5,
    -5, 0,  0,  0,  0,  0,  0,  -5,
    -5, 0,  0,  0,  0,  0,  0,  -5,
    0,  0,  0,  5,  5,  0,  0,  0
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,  0,   0,   0,  0,   0,   0,   -10,
    -10,  0,   5,   5,  5,   5,   0,   -10,
    -5,   0,   5,   5,  5,   5,   0,   -5,
    0,    0,   5,   5,  5,   5,   0,   -5,
    -10,  5,   5,   5,  5,   5,   0,   -10,
    -10,  0,   5,   0,  0,   0,   0,   -10,
    -20, -10, -10, -5, -5, -10, -10, -20
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    20,  20,   0,   0,   0,   0,  20,  20,
    20,  30,  10,  0,   0,  10,  30,  20
];

/// Piece-square bonus for a piece of `color` on `sq`.
fn pst_value(piece: Piece, sq: Square, color: Color) -> i32 {
    // Tables start at a8; mirror ranks for White.
    let idx = match color {
        Color::White => sq.index() ^ 56,
        Color::Black => sq.index(),
    };
    match piece {
        Piece::Pawn => PAWN_PST[idx],
        Piece::Knight => KNIGHT_PST[idx],
        Piece::Bishop => BISHOP_PST[idx],
        Piece::Rook => ROOK_PST[idx],
        Piece::Queen => QUEEN_PST[idx],
        Piece::King => KING_PST[idx],
    }
}

/// Material plus piece-square bonuses. Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    /// Score from White's point of view.
    #[must_use]
    pub fn white_score(position: &Position) -> i32 {
        let mut score = 0;
        for color in Color::BOTH {
            let sign = if color == Color::White { 1 } else { -1 };
            for (sq, piece) in position.pieces(color) {
                let value = if piece == Piece::King { 0 } else { piece.value() };
                score += sign * (value + pst_value(piece, sq, color));
            }
        }
        score
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> Result<i32, EvaluationError> {
        let score = Self::white_score(position);
        Ok(match position.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position_is_balanced() {
        let position = Position::initial();
        assert_eq!(MaterialEvaluator.evaluate(&position), Ok(0));
    }

    #[test]
    fn test_side_to_move_perspective() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1").unwrap();
        let w = MaterialEvaluator.evaluate(&white).unwrap();
        let b = MaterialEvaluator.evaluate(&black).unwrap();
        assert!(w > 800);
        assert_eq!(w, -b);
    }

    #[test]
    fn test_mirrored_tables() {
        // A knight on c3 for White is worth the same as one on c6 for Black.
        let position = Position::from_fen("4k3/8/2n5/8/8/2N5/8/4K3 w - - 0 1").unwrap();
        assert_eq!(MaterialEvaluator::white_score(&position), 0);
    }

    #[test]
    fn test_closure_evaluator() {
        let failing = |_: &Position| -> Result<i32, EvaluationError> {
            Err(EvaluationError::new("offline"))
        };
        let err = failing.evaluate(&Position::initial()).unwrap_err();
        assert_eq!(err.message(), "offline");
        assert_eq!(err.to_string(), "Evaluation failed: offline");
    }
}
