//! Move ordering for search.
//!
//! Higher scores are tried earlier: TT move, then captures by MVV-LVA and
//! promotions, then quiet moves in generation order.

use std::cmp::Reverse;

use crate::board::{ChessMove, MoveKey, Piece};

/// Hash move (from transposition table) - highest priority
const TT_MOVE_SCORE: i32 = 1 << 20;

/// Base for captures and promotions, above every quiet move
const TACTICAL_SCORE: i32 = 1 << 16;

/// Most Valuable Victim - Least Valuable Attacker
pub(crate) fn mvv_lva_score(attacker: Piece, victim: Piece) -> i32 {
    victim.value() * 10 - attacker.value() / 100
}

fn score_move(mv: &ChessMove, tt_move: Option<MoveKey>) -> i32 {
    if tt_move == Some(mv.key()) {
        return TT_MOVE_SCORE;
    }
    let mut score = 0;
    if let Some(victim) = mv.captured_piece() {
        score += TACTICAL_SCORE + mvv_lva_score(mv.piece(), victim);
    }
    if let Some(promo) = mv.promotion() {
        score += TACTICAL_SCORE + promo.value();
    }
    score
}

/// Sort moves best-first. The sort is stable, so equal scores keep
/// generation order and the search stays deterministic.
pub(crate) fn order_moves(moves: &mut [ChessMove], tt_move: Option<MoveKey>) {
    moves.sort_by_cached_key(|mv| Reverse(score_move(mv, tt_move)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn test_mvv_lva_prefers_valuable_victims() {
        assert!(mvv_lva_score(Piece::Pawn, Piece::Queen) > mvv_lva_score(Piece::Queen, Piece::Rook));
        assert!(mvv_lva_score(Piece::Pawn, Piece::Rook) > mvv_lva_score(Piece::Queen, Piece::Rook));
    }

    #[test]
    fn test_order_tt_move_then_captures() {
        // The pawn can take the queen or the rook; the knight is pinned.
        let position = Position::from_fen("4k3/8/2q1r3/3P4/4N3/8/8/4K3 w - - 0 1").unwrap();
        let mut moves = position.legal_moves();
        let tt_move = position.parse_move("e1f1").unwrap().key();
        order_moves(moves.as_mut_slice(), Some(tt_move));

        let keys: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        assert_eq!(keys[0], "e1f1");
        assert_eq!(keys[1], "d5c6");
        assert_eq!(keys[2], "d5e6");
        assert!(!moves[moves.len() - 1].is_capture());
    }
}
