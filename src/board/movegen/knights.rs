use super::super::attacks::KNIGHT_TARGETS;
use super::super::{MoveKind, Position, Square};
use super::Candidate;

impl Position {
    pub(crate) fn generate_knight_moves(&self, from: Square, out: &mut Vec<Candidate>) {
        let color = self.side_to_move;
        for &to in &KNIGHT_TARGETS[from.index()] {
            match self.piece_on(to) {
                None => out.push(Candidate::new(from, to, MoveKind::Normal, None)),
                Some((c, piece)) if c != color => {
                    out.push(Candidate::new(from, to, MoveKind::Normal, Some((to, piece))));
                }
                Some(_) => {}
            }
        }
    }
}
