use super::super::{MoveKind, Piece, Position, Square, PROMOTION_PIECES};
use super::Candidate;

impl Position {
    /// Push one pawn move, expanding it into every promotion piece on the last rank.
    fn push_pawn_move(
        &self,
        from: Square,
        to: Square,
        captured: Option<(Square, Piece)>,
        out: &mut Vec<Candidate>,
    ) {
        if to.rank() == self.side_to_move.pawn_promotion_rank() {
            for promo in PROMOTION_PIECES {
                out.push(Candidate::new(from, to, MoveKind::Promotion(promo), captured));
            }
        } else {
            out.push(Candidate::new(from, to, MoveKind::Normal, captured));
        }
    }

    pub(crate) fn generate_pawn_moves(&self, from: Square, out: &mut Vec<Candidate>) {
        let color = self.side_to_move;
        let dir = color.pawn_direction();

        let Some(forward_sq) = from.offset(dir, 0) else {
            return;
        };

        if self.is_empty_square(forward_sq) {
            self.push_pawn_move(from, forward_sq, None, out);
            if from.rank() == color.pawn_start_rank() {
                if let Some(double_sq) = forward_sq.offset(dir, 0) {
                    if self.is_empty_square(double_sq) {
                        out.push(Candidate::new(from, double_sq, MoveKind::DoublePawnPush, None));
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target_sq) = from.offset(dir, df) else {
                continue;
            };
            match self.piece_on(target_sq) {
                Some((target_color, target)) if target_color != color => {
                    self.push_pawn_move(from, target_sq, Some((target_sq, target)), out);
                }
                Some(_) => {}
                None if Some(target_sq) == self.en_passant => {
                    // The captured pawn sits beside us, not on the target square.
                    if let Some(victim_sq) = target_sq.offset(-dir, 0) {
                        if self.piece_on(victim_sq) == Some((color.opponent(), Piece::Pawn)) {
                            out.push(Candidate::new(
                                from,
                                target_sq,
                                MoveKind::EnPassant,
                                Some((victim_sq, Piece::Pawn)),
                            ));
                        }
                    }
                }
                None => {}
            }
        }
    }
}
