use std::str::FromStr;

use super::error::{FenError, MoveError};
use super::{CastleSide, CastlingRights, ChessMove, Color, MoveKey, Piece, Position, Square};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a position from Forsyth-Edwards Notation.
    ///
    /// Any run of whitespace separates fields, the side-to-move letter and the
    /// en passant file may be either case, and the two move counters may be
    /// omitted (defaulting to `0 1`). Nothing is built unless every field is
    /// valid.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::FieldCount { found: parts.len() });
        }

        let mut position = Position::empty();
        parse_placement(&mut position, parts[0])?;

        let side = match parts[1] {
            "w" | "W" => Color::White,
            "b" | "B" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };
        position.set_side_to_move(side);

        position.set_castling_rights(parse_castling(parts[2])?);
        position.set_en_passant(parse_en_passant(parts[3], side)?);

        if let Some(field) = parts.get(4) {
            position.halfmove_clock = field.parse().map_err(|_| FenError::InvalidHalfmoveClock {
                found: field.to_string(),
            })?;
        }
        if let Some(field) = parts.get(5) {
            let number: u32 = field.parse().map_err(|_| FenError::InvalidFullmoveNumber {
                found: field.to_string(),
            })?;
            // Some tools write 0 here; treat it as the first move.
            position.fullmove_number = number.max(1);
        }

        // The side that just moved cannot have left its king attacked.
        let waiting = side.opponent();
        if position.is_square_attacked(position.king_square(waiting), side) {
            return Err(FenError::OpponentInCheck {
                square: position.king_square(waiting).to_string(),
            });
        }

        Ok(position)
    }

    /// Serialize to canonical six-field FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8u8 {
                if let Some((color, piece)) = self.piece_on(Square::at(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let mut castling = String::new();
        for (color, side) in self.castling_rights.iter() {
            let c = match side {
                CastleSide::KingSide => 'k',
                CastleSide::QueenSide => 'q',
            };
            castling.push(if color == Color::White {
                c.to_ascii_uppercase()
            } else {
                c
            });
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in long algebraic notation (e.g. "e2e4", "e7e8q") and
    /// resolve it against the legal moves of this position.
    ///
    /// A promotion without a piece letter resolves to the queen promotion.
    pub fn parse_move(&self, notation: &str) -> Result<ChessMove, MoveError> {
        let invalid = || MoveError::InvalidNotation {
            notation: notation.to_string(),
        };
        if !notation.is_ascii() || !(4..=5).contains(&notation.len()) {
            return Err(invalid());
        }

        let from: Square = notation[0..2].parse().map_err(|_| invalid())?;
        let to: Square = notation[2..4].parse().map_err(|_| invalid())?;

        let promotion = match notation[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(piece) if piece.is_promotable() => Some(piece),
                _ => {
                    return Err(MoveError::InvalidPromotion {
                        notation: notation.to_string(),
                    })
                }
            },
            None => None,
        };

        let moves = self.legal_moves_from(from);
        let key = MoveKey::new(from, to, promotion);
        let found = moves.find(key).or_else(|| {
            // Bare "e7e8" picks the queen.
            promotion
                .is_none()
                .then(|| moves.find(MoveKey::new(from, to, Some(Piece::Queen))))
                .flatten()
        });

        found.cloned().ok_or_else(|| MoveError::IllegalMove {
            notation: notation.to_string(),
        })
    }
}

fn parse_placement(position: &mut Position, field: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidRankCount { found: ranks.len() });
    }

    let mut king_counts = [0usize; 2];
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let sq = Square::new(rank, file).ok_or(FenError::InvalidRankLength {
                rank: rank + 1,
                files: file + 1,
            })?;
            if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                return Err(FenError::PawnOnBackRank {
                    square: sq.to_string(),
                });
            }
            if piece == Piece::King {
                king_counts[color.index()] += 1;
            }
            position.put_piece(sq, color, piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::InvalidRankLength {
                rank: rank + 1,
                files: file,
            });
        }
    }

    if king_counts != [1, 1] {
        return Err(FenError::InvalidKingCount {
            white: king_counts[0],
            black: king_counts[1],
        });
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let (color, side) = match c {
            'K' => (Color::White, CastleSide::KingSide),
            'Q' => (Color::White, CastleSide::QueenSide),
            'k' => (Color::Black, CastleSide::KingSide),
            'q' => (Color::Black, CastleSide::QueenSide),
            _ => {
                return Err(FenError::InvalidCastling {
                    found: field.to_string(),
                })
            }
        };
        rights.set(color, side);
    }
    Ok(rights)
}

/// The target must sit on the rank a double push by the side that just moved
/// passes over.
fn parse_en_passant(field: &str, side: Color) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant {
        found: field.to_string(),
    };
    let sq: Square = field.parse().map_err(|_| invalid())?;
    let expected_rank = match side {
        Color::White => 5,
        Color::Black => 2,
    };
    if sq.rank() != expected_rank {
        return Err(invalid());
    }
    Ok(Some(sq))
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
