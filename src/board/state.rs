use std::fmt;
use std::hash::{Hash, Hasher};

use crate::zobrist::ZOBRIST;

use super::{CastleSide, CastlingRights, Color, Piece, Square};

/// Why a game ended without a winner, other than stalemate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
}

/// Outcome classification of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

/// An immutable chess position.
///
/// Positions are values: applying a move yields a new `Position` and never
/// mutates the old one. The only in-place change offered publicly is
/// [`Position::apply_promotion`], which rewrites a just-promoted piece.
///
/// Equality and hashing cover the game state only, the same fields FEN
/// records.
#[derive(Clone)]
pub struct Position {
    pub(crate) squares: [Option<(Color, Piece)>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) kings: [Square; 2],
    pub(crate) hash: u64, // Zobrist hash
    /// Square a pawn promoted on in the move that produced this position
    pub(crate) last_promotion: Option<Square>,
}

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn initial() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            let file = file as u8;
            position.put_piece(Square::at(0, file), Color::White, *piece);
            position.put_piece(Square::at(7, file), Color::Black, *piece);
            position.put_piece(Square::at(1, file), Color::White, Piece::Pawn);
            position.put_piece(Square::at(6, file), Color::Black, Piece::Pawn);
        }
        position.set_castling_rights(CastlingRights::all());
        position
    }

    /// A board with no pieces, white to move. Only valid as a construction
    /// scratchpad: callers must place both kings.
    pub(crate) fn empty() -> Self {
        Position {
            squares: [None; 64],
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            kings: [Square::at(0, 4), Square::at(7, 4)],
            hash: 0,
            last_promotion: None,
        }
    }

    /// Piece on the given rank and file (both 0-7); `None` when empty or off the board.
    #[must_use]
    pub fn piece_at(&self, rank: usize, file: usize) -> Option<(Color, Piece)> {
        Square::new(rank, file).and_then(|sq| self.piece_on(sq))
    }

    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index()]
    }

    #[inline]
    pub(crate) fn is_empty_square(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Pieces of one side with their squares
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_on(sq) {
            Some((c, piece)) if c == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// Compute the Zobrist hash from scratch.
    #[must_use]
    pub fn recompute_hash(&self) -> u64 {
        let mut hash = 0;
        for sq in Square::all() {
            if let Some((color, piece)) = self.piece_on(sq) {
                hash ^= ZOBRIST.piece(color, piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side();
        }
        for (color, side) in self.castling_rights.iter() {
            hash ^= ZOBRIST.castling(color, side);
        }
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    #[must_use]
    pub fn is_in_check(&self) -> bool {
        let color = self.side_to_move;
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// Classify the position. Checkmate and stalemate take priority over
    /// the draw rules.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if !self.has_legal_moves() {
            if self.is_in_check() {
                return GameStatus::Checkmate {
                    winner: self.side_to_move.opponent(),
                };
            }
            return GameStatus::Stalemate;
        }
        if self.halfmove_clock >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }
        if self.is_insufficient_material() {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        GameStatus::Ongoing
    }

    /// The side that delivered mate, if the side to move is checkmated.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        match self.status() {
            GameStatus::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && !self.has_legal_moves()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && !self.has_legal_moves()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status() != GameStatus::Ongoing
    }

    /// Neither side can possibly mate: bare kings, a single minor piece, or
    /// only bishops all on one square color.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let mut knights = 0;
        let mut bishops_light = 0;
        let mut bishops_dark = 0;

        for sq in Square::all() {
            match self.piece_on(sq) {
                None | Some((_, Piece::King)) => {}
                Some((_, Piece::Knight)) => knights += 1,
                Some((_, Piece::Bishop)) => {
                    if (sq.rank() + sq.file()) % 2 == 0 {
                        bishops_dark += 1;
                    } else {
                        bishops_light += 1;
                    }
                }
                Some(_) => return false,
            }
        }

        let minors = knights + bishops_light + bishops_dark;
        if minors <= 1 {
            return true;
        }
        knights == 0 && (bishops_light == 0 || bishops_dark == 0)
    }

    pub(crate) fn has_castling_right(&self, color: Color, side: CastleSide) -> bool {
        self.castling_rights.has(color, side)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
        self.halfmove_clock.hash(state);
        self.fullmove_number.hash(state);
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::initial()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = match self.piece_on(Square::at(rank, file)) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}
