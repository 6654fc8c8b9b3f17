//! Move types and move list.

use std::fmt;
use std::ops::Index;

use super::castling::CastleSide;
use super::piece::Piece;
use super::square::Square;
use crate::board::error::MoveError;
use crate::board::Position;

const PROMO_NONE: u16 = 0;
const PROMO_KNIGHT: u16 = 1;
const PROMO_BISHOP: u16 = 2;
const PROMO_ROOK: u16 = 3;
const PROMO_QUEEN: u16 = 4;

/// Compact 16-bit move identity, independent of the position it was made in.
///
/// Encoding:
/// - bits 0-5:   from square (0-63)
/// - bits 6-11:  to square (0-63)
/// - bits 12-14: promotion piece (0 = none)
///
/// The raw value 0 (a1a1) never names a real move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MoveKey(u16);

impl MoveKey {
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        let promo = match promotion {
            Some(Piece::Knight) => PROMO_KNIGHT,
            Some(Piece::Bishop) => PROMO_BISHOP,
            Some(Piece::Rook) => PROMO_ROOK,
            Some(Piece::Queen) => PROMO_QUEEN,
            _ => PROMO_NONE,
        };
        MoveKey(from.index() as u16 | ((to.index() as u16) << 6) | (promo << 12))
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> 6) & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        match (self.0 >> 12) & 0x7 {
            PROMO_KNIGHT => Some(Piece::Knight),
            PROMO_BISHOP => Some(Piece::Bishop),
            PROMO_ROOK => Some(Piece::Rook),
            PROMO_QUEEN => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Get the raw 16-bit value (for table storage)
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Create from raw 16-bit value; 0 decodes to `None`.
    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(MoveKey(value))
        }
    }
}

impl fmt::Display for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// Special-move classification of a [`ChessMove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoublePawnPush,
    EnPassant,
    Castle(CastleSide),
    Promotion(Piece),
}

/// A legal move together with the position it produces.
///
/// Generation is purely functional: the pre-move position is never touched,
/// and applying the move is just taking [`ChessMove::position`].
#[derive(Clone, PartialEq, Eq)]
pub struct ChessMove {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) piece: Piece,
    pub(crate) captured: Option<(Square, Piece)>,
    pub(crate) kind: MoveKind,
    pub(crate) position: Position,
}

impl ChessMove {
    #[inline]
    #[must_use]
    pub fn from(&self) -> Square {
        self.from
    }

    #[inline]
    #[must_use]
    pub fn to(&self) -> Square {
        self.to
    }

    /// The moving piece (a pawn for promotions)
    #[inline]
    #[must_use]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Square of the captured piece; differs from `to` for en passant.
    #[inline]
    #[must_use]
    pub fn captured_square(&self) -> Option<Square> {
        self.captured.map(|(sq, _)| sq)
    }

    #[inline]
    #[must_use]
    pub fn captured_piece(&self) -> Option<Piece> {
        self.captured.map(|(_, piece)| piece)
    }

    #[inline]
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_en_passant(&self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    #[inline]
    #[must_use]
    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle(_))
    }

    #[inline]
    #[must_use]
    pub fn castle_side(&self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_double_pawn_push(&self) -> bool {
        self.kind == MoveKind::DoublePawnPush
    }

    #[inline]
    #[must_use]
    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    #[inline]
    #[must_use]
    pub fn promotion(&self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    /// The position after this move.
    #[inline]
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn into_position(self) -> Position {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> MoveKey {
        MoveKey::new(self.from, self.to, self.promotion())
    }

    /// Substitute the promotion piece chosen after generation.
    ///
    /// Only the promoted piece (and with it the resulting position and hash)
    /// changes; legality is unaffected.
    pub fn with_promotion(&self, piece: Piece) -> Result<ChessMove, MoveError> {
        if !self.is_promotion() {
            return Err(MoveError::InvalidPromotion {
                notation: self.to_string(),
            });
        }
        let mut position = self.position.clone();
        position.apply_promotion(self.to, piece)?;
        Ok(ChessMove {
            kind: MoveKind::Promotion(piece),
            position,
            ..self.clone()
        })
    }
}

impl fmt::Debug for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if self.is_capture() {
            write!(f, " cap")?;
        }
        if self.is_castle() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Ordered list of legal moves.
#[derive(Clone, Debug, Default)]
pub struct MoveList {
    moves: Vec<ChessMove>,
}

impl MoveList {
    pub(crate) fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(48),
        }
    }

    pub(crate) fn push(&mut self, mv: ChessMove) {
        self.moves.push(mv);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ChessMove] {
        &self.moves
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [ChessMove] {
        &mut self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChessMove> {
        self.moves.iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&ChessMove> {
        self.moves.get(idx)
    }

    #[must_use]
    pub fn first(&self) -> Option<&ChessMove> {
        self.moves.first()
    }

    /// Find the move with the given identity
    #[must_use]
    pub fn find(&self, key: MoveKey) -> Option<&ChessMove> {
        self.moves.iter().find(|mv| mv.key() == key)
    }

    #[must_use]
    pub fn contains(&self, key: MoveKey) -> bool {
        self.find(key).is_some()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ChessMove;
    type IntoIter = std::slice::Iter<'a, ChessMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = ChessMove;
    type IntoIter = std::vec::IntoIter<ChessMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl Index<usize> for MoveList {
    type Output = ChessMove;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.moves[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_key_encoding() {
        let from: Square = "e7".parse().unwrap();
        let to: Square = "e8".parse().unwrap();
        for promo in [None, Some(Piece::Knight), Some(Piece::Queen)] {
            let key = MoveKey::new(from, to, promo);
            assert_eq!(key.from(), from);
            assert_eq!(key.to(), to);
            assert_eq!(key.promotion(), promo);
            assert_eq!(MoveKey::from_u16(key.as_u16()), Some(key));
        }
        assert_eq!(MoveKey::from_u16(0), None);
    }

    #[test]
    fn test_move_key_display() {
        let key = MoveKey::new(
            "a7".parse().unwrap(),
            "a8".parse().unwrap(),
            Some(Piece::Rook),
        );
        assert_eq!(key.to_string(), "a7a8r");
    }
}
