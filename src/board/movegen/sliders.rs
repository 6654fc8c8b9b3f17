use super::super::attacks::{BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use super::super::{MoveKind, Position, Square};
use super::Candidate;

/// Type of sliding piece for move generation
#[derive(Clone, Copy)]
pub(crate) enum SliderType {
    Bishop,
    Rook,
    Queen,
}

impl SliderType {
    fn directions(self) -> &'static [(i8, i8)] {
        match self {
            SliderType::Bishop => &BISHOP_DIRECTIONS,
            SliderType::Rook => &ROOK_DIRECTIONS,
            SliderType::Queen => &QUEEN_DIRECTIONS,
        }
    }
}

impl Position {
    /// Cast rays until the first occupied square, which is included when it
    /// holds an enemy piece.
    pub(crate) fn generate_slider_moves(
        &self,
        from: Square,
        slider: SliderType,
        out: &mut Vec<Candidate>,
    ) {
        let color = self.side_to_move;
        for &(dr, df) in slider.directions() {
            let mut current = from;
            while let Some(to) = current.offset(dr, df) {
                match self.piece_on(to) {
                    None => out.push(Candidate::new(from, to, MoveKind::Normal, None)),
                    Some((c, piece)) => {
                        if c != color {
                            out.push(Candidate::new(from, to, MoveKind::Normal, Some((to, piece))));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }
}
