//! Move-path enumeration for validating the move generator.

use crate::board::{MoveKey, Position};

impl Position {
    /// Count leaf nodes of the legal move tree to `depth` plies.
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        moves
            .iter()
            .map(|mv| mv.position().perft(depth - 1))
            .sum()
    }

    /// Per-root-move breakdown of [`Position::perft`], in generation order.
    #[must_use]
    pub fn perft_divide(&self, depth: usize) -> Vec<(MoveKey, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        self.legal_moves()
            .iter()
            .map(|mv| (mv.key(), mv.position().perft(depth - 1)))
            .collect()
    }
}
