//! Deriving successor positions.
//!
//! Every helper here keeps the Zobrist hash in step with the change it makes,
//! so a derived position never needs a full rehash.

use crate::zobrist::ZOBRIST;

use super::error::MoveError;
use super::{CastleSide, CastlingRights, ChessMove, Color, MoveKey, MoveKind, Piece, Position, Square};

impl Position {
    pub(crate) fn put_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        if let Some((old_color, old_piece)) = self.squares[sq.index()] {
            self.hash ^= ZOBRIST.piece(old_color, old_piece, sq);
        }
        self.squares[sq.index()] = Some((color, piece));
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        if piece == Piece::King {
            self.kings[color.index()] = sq;
        }
    }

    pub(crate) fn take_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let taken = self.squares[sq.index()].take();
        if let Some((color, piece)) = taken {
            self.hash ^= ZOBRIST.piece(color, piece, sq);
        }
        taken
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= ZOBRIST.en_passant(old);
        }
        self.en_passant = target;
        if let Some(new) = target {
            self.hash ^= ZOBRIST.en_passant(new);
        }
    }

    pub(crate) fn set_castling_rights(&mut self, rights: CastlingRights) {
        for (color, side) in self.castling_rights.iter() {
            self.hash ^= ZOBRIST.castling(color, side);
        }
        self.castling_rights = rights;
        for (color, side) in rights.iter() {
            self.hash ^= ZOBRIST.castling(color, side);
        }
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.hash ^= ZOBRIST.side();
            self.side_to_move = color;
        }
    }

    /// Build the position reached by a pseudo-legal move. Legality is the
    /// caller's concern.
    pub(crate) fn derive(
        &self,
        from: Square,
        to: Square,
        kind: MoveKind,
        captured: Option<(Square, Piece)>,
    ) -> Position {
        let mut next = self.clone();
        let mover = self.side_to_move;
        let Some((_, piece)) = next.take_piece(from) else {
            return next;
        };

        if let Some((captured_sq, _)) = captured {
            next.take_piece(captured_sq);
        }

        let placed = match kind {
            MoveKind::Promotion(promo) => promo,
            _ => piece,
        };
        next.put_piece(to, mover, placed);

        if let MoveKind::Castle(side) = kind {
            let (rook_from, rook_to) = side.rook_squares(mover);
            if let Some((color, rook)) = next.take_piece(rook_from) {
                next.put_piece(rook_to, color, rook);
            }
        }

        let mut rights = self.castling_rights;
        if piece == Piece::King {
            rights.remove_color(mover);
        }
        for sq in [from, to] {
            for color in Color::BOTH {
                for side in CastleSide::BOTH {
                    if sq == Square::at(color.back_rank(), side.rook_from_file()) {
                        rights.remove(color, side);
                    }
                }
            }
        }
        next.set_castling_rights(rights);

        let ep = if kind == MoveKind::DoublePawnPush {
            from.offset(mover.pawn_direction(), 0)
        } else {
            None
        };
        next.set_en_passant(ep);
        next.last_promotion = match kind {
            MoveKind::Promotion(_) => Some(to),
            _ => None,
        };

        if piece == Piece::Pawn || captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if mover == Color::Black {
            next.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        next.set_side_to_move(mover.opponent());
        next
    }

    /// Replace the type of a piece that has just promoted.
    ///
    /// `square` must be where a pawn promoted in the move that produced this
    /// position. The side to move and every other field are left unchanged;
    /// a rejected request changes nothing.
    pub fn apply_promotion(&mut self, square: Square, piece: Piece) -> Result<(), MoveError> {
        let mover = self.side_to_move.opponent();
        let invalid = || MoveError::InvalidPromotion {
            notation: format!("{square}={}", piece.to_char()),
        };
        if !piece.is_promotable() || self.last_promotion != Some(square) {
            return Err(invalid());
        }
        match self.piece_on(square) {
            Some((color, current)) if color == mover && current.is_promotable() => {
                self.put_piece(square, color, piece);
                Ok(())
            }
            _ => Err(invalid()),
        }
    }

    /// Apply a move, checking it against the legal set.
    ///
    /// Returns `MoveError::IllegalMove` and leaves `self` untouched when the
    /// move was not generated for this position.
    pub fn apply(&self, mv: &ChessMove) -> Result<Position, MoveError> {
        self.apply_key(mv.key())
    }

    /// Apply a move identified by its [`MoveKey`].
    pub fn apply_key(&self, key: MoveKey) -> Result<Position, MoveError> {
        self.legal_moves()
            .into_iter()
            .find(|mv| mv.key() == key)
            .map(ChessMove::into_position)
            .ok_or_else(|| MoveError::IllegalMove {
                notation: key.to_string(),
            })
    }

    /// Parse a move in long algebraic notation and apply it.
    pub fn apply_uci(&self, notation: &str) -> Result<Position, MoveError> {
        self.parse_move(notation).map(ChessMove::into_position)
    }
}
