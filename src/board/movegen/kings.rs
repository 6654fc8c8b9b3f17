use super::super::attacks::KING_TARGETS;
use super::super::{CastleSide, MoveKind, Piece, Position, Square};
use super::Candidate;

impl Position {
    pub(crate) fn generate_king_moves(&self, from: Square, out: &mut Vec<Candidate>) {
        let color = self.side_to_move;
        for &to in &KING_TARGETS[from.index()] {
            match self.piece_on(to) {
                None => out.push(Candidate::new(from, to, MoveKind::Normal, None)),
                Some((c, piece)) if c != color => {
                    out.push(Candidate::new(from, to, MoveKind::Normal, Some((to, piece))));
                }
                Some(_) => {}
            }
        }

        for side in CastleSide::BOTH {
            if self.can_castle(from, side) {
                let to = Square::at(color.back_rank(), side.king_to_file());
                out.push(Candidate::new(from, to, MoveKind::Castle(side), None));
            }
        }
    }

    /// Rights held, king and rook on their home squares, nothing between
    /// them, and the king's start, transit and landing squares unattacked.
    fn can_castle(&self, king_sq: Square, side: CastleSide) -> bool {
        let color = self.side_to_move;
        let rank = color.back_rank();
        if !self.has_castling_right(color, side) || king_sq != Square::at(rank, 4) {
            return false;
        }
        let (rook_sq, _) = side.rook_squares(color);
        if self.piece_on(rook_sq) != Some((color, Piece::Rook)) {
            return false;
        }

        let (low, high) = match side {
            CastleSide::KingSide => (5, 6),
            CastleSide::QueenSide => (1, 3),
        };
        if (low..=high).any(|file| !self.is_empty_square(Square::at(rank, file))) {
            return false;
        }

        let enemy = color.opponent();
        let transit = match side {
            CastleSide::KingSide => [4, 5, 6],
            CastleSide::QueenSide => [4, 3, 2],
        };
        transit
            .iter()
            .all(|&file| !self.is_square_attacked(Square::at(rank, file), enemy))
    }
}
