mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{ChessMove, MoveKind, MoveList, Piece, Position, Square};

/// A pseudo-legal move before its successor position is built.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) kind: MoveKind,
    pub(crate) captured: Option<(Square, Piece)>,
}

impl Candidate {
    pub(crate) fn new(from: Square, to: Square, kind: MoveKind, captured: Option<(Square, Piece)>) -> Self {
        Candidate {
            from,
            to,
            kind,
            captured,
        }
    }
}

impl Position {
    fn generate_piece_candidates(&self, from: Square, piece: Piece, out: &mut Vec<Candidate>) {
        match piece {
            Piece::Pawn => self.generate_pawn_moves(from, out),
            Piece::Knight => self.generate_knight_moves(from, out),
            Piece::Bishop => self.generate_slider_moves(from, sliders::SliderType::Bishop, out),
            Piece::Rook => self.generate_slider_moves(from, sliders::SliderType::Rook, out),
            Piece::Queen => self.generate_slider_moves(from, sliders::SliderType::Queen, out),
            Piece::King => self.generate_king_moves(from, out),
        }
    }

    fn generate_pseudo_moves(&self) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(64);
        let color = self.side_to_move;
        for sq in Square::all() {
            if let Some((c, piece)) = self.piece_on(sq) {
                if c == color {
                    self.generate_piece_candidates(sq, piece, &mut out);
                }
            }
        }
        out
    }

    /// Build the successor and keep the move only if the mover's king is safe.
    fn finish(&self, candidate: &Candidate) -> Option<ChessMove> {
        let mover = self.side_to_move;
        let next = self.derive(candidate.from, candidate.to, candidate.kind, candidate.captured);
        if next.is_square_attacked(next.king_square(mover), mover.opponent()) {
            return None;
        }
        let (_, piece) = self.piece_on(candidate.from)?;
        Some(ChessMove {
            from: candidate.from,
            to: candidate.to,
            piece,
            captured: candidate.captured,
            kind: candidate.kind,
            position: next,
        })
    }

    /// All legal moves for the side to move, ordered by origin square.
    ///
    /// An empty list means the game is over: checkmate when in check,
    /// stalemate otherwise.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for candidate in &self.generate_pseudo_moves() {
            if let Some(mv) = self.finish(candidate) {
                moves.push(mv);
            }
        }
        moves
    }

    /// Legal moves of the piece standing on `from`.
    ///
    /// Empty when the square is empty or holds a piece of the side not to move.
    #[must_use]
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        let Some((color, piece)) = self.piece_on(from) else {
            return moves;
        };
        if color != self.side_to_move {
            return moves;
        }
        let mut candidates = Vec::with_capacity(28);
        self.generate_piece_candidates(from, piece, &mut candidates);
        for candidate in &candidates {
            if let Some(mv) = self.finish(candidate) {
                moves.push(mv);
            }
        }
        moves
    }

    /// Legal moves from a rank/file pair; off-board coordinates yield nothing.
    #[must_use]
    pub fn legal_moves_at(&self, rank: usize, file: usize) -> MoveList {
        match Square::new(rank, file) {
            Some(sq) => self.legal_moves_from(sq),
            None => MoveList::new(),
        }
    }

    /// Legal captures and promotions only (quiescence search).
    #[must_use]
    pub fn legal_tactical_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for candidate in self.generate_pseudo_moves().iter().filter(|c| {
            c.captured.is_some() || matches!(c.kind, MoveKind::Promotion(_))
        }) {
            if let Some(mv) = self.finish(candidate) {
                moves.push(mv);
            }
        }
        moves
    }

    /// True when at least one legal move exists; stops at the first.
    #[must_use]
    pub fn has_legal_moves(&self) -> bool {
        let mover = self.side_to_move;
        self.generate_pseudo_moves().iter().any(|c| {
            let next = self.derive(c.from, c.to, c.kind, c.captured);
            !next.is_square_attacked(next.king_square(mover), mover.opponent())
        })
    }
}
