//! Precomputed leaper targets and square-attack detection.

use once_cell::sync::Lazy;

use super::{Color, Piece, Position, Square};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const QUEEN_DIRECTIONS: [(i8, i8); 8] = KING_OFFSETS;

fn leaper_table(offsets: &[(i8, i8)]) -> Vec<Vec<Square>> {
    Square::all()
        .map(|sq| {
            offsets
                .iter()
                .filter_map(|&(dr, df)| sq.offset(dr, df))
                .collect()
        })
        .collect()
}

pub(crate) static KNIGHT_TARGETS: Lazy<Vec<Vec<Square>>> =
    Lazy::new(|| leaper_table(&KNIGHT_OFFSETS));

pub(crate) static KING_TARGETS: Lazy<Vec<Vec<Square>>> = Lazy::new(|| leaper_table(&KING_OFFSETS));

impl Position {
    /// First occupied square along a ray, with its occupant.
    fn first_blocker(&self, from: Square, (dr, df): (i8, i8)) -> Option<(Color, Piece)> {
        let mut current = from;
        while let Some(next) = current.offset(dr, df) {
            if let Some(occupant) = self.piece_on(next) {
                return Some(occupant);
            }
            current = next;
        }
        None
    }

    /// Is `square` attacked by any piece of `attacker`?
    pub(crate) fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        // Pawns attack diagonally forward, so look one rank "behind" the square.
        let back = -attacker.pawn_direction();
        for df in [-1, 1] {
            if let Some(sq) = square.offset(back, df) {
                if self.piece_on(sq) == Some((attacker, Piece::Pawn)) {
                    return true;
                }
            }
        }

        if KNIGHT_TARGETS[square.index()]
            .iter()
            .any(|&sq| self.piece_on(sq) == Some((attacker, Piece::Knight)))
        {
            return true;
        }

        if KING_TARGETS[square.index()]
            .iter()
            .any(|&sq| self.piece_on(sq) == Some((attacker, Piece::King)))
        {
            return true;
        }

        let straight = ROOK_DIRECTIONS.iter().any(|&dir| {
            matches!(
                self.first_blocker(square, dir),
                Some((color, Piece::Rook | Piece::Queen)) if color == attacker
            )
        });
        if straight {
            return true;
        }

        BISHOP_DIRECTIONS.iter().any(|&dir| {
            matches!(
                self.first_blocker(square, dir),
                Some((color, Piece::Bishop | Piece::Queen)) if color == attacker
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaper_tables() {
        assert_eq!(KNIGHT_TARGETS[Square::at(0, 0).index()].len(), 2);
        assert_eq!(KNIGHT_TARGETS[Square::at(3, 3).index()].len(), 8);
        assert_eq!(KING_TARGETS[Square::at(0, 0).index()].len(), 3);
        assert_eq!(KING_TARGETS[Square::at(4, 4).index()].len(), 8);
    }

    #[test]
    fn test_attacks_in_initial_position() {
        let position = Position::initial();
        // e3 is covered by the d2/f2 pawns
        assert!(position.is_square_attacked("e3".parse().unwrap(), Color::White));
        // f3 by the g1 knight
        assert!(position.is_square_attacked("f3".parse().unwrap(), Color::White));
        assert!(!position.is_square_attacked("e4".parse().unwrap(), Color::White));
        assert!(position.is_square_attacked("e6".parse().unwrap(), Color::Black));
    }

    #[test]
    fn test_slider_attack_blocked() {
        let position = Position::from_fen("4k3/8/8/8/4r3/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(position.is_square_attacked("e3".parse().unwrap(), Color::Black));
        assert!(!position.is_square_attacked("e1".parse().unwrap(), Color::Black));
        assert!(position.is_square_attacked("a4".parse().unwrap(), Color::Black));
    }
}
