//! Game status and draw detection tests.

use crate::board::{DrawReason, GameStatus, Position};

#[test]
fn test_fen_halfmove_parsing() {
    let board = Position::from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 1").unwrap();
    assert_eq!(board.halfmove_clock(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let board = Position::from_fen("4k3/8/8/8/8/8/3R4/K7 w - - 100 80").unwrap();
    assert_eq!(board.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    assert!(board.is_game_over());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let board = Position::from_fen("4k3/8/8/8/8/8/4P3/K7 w - - 99 1").unwrap();
    let next = board.apply_uci("e2e4").unwrap();
    assert_eq!(next.halfmove_clock(), 0);
    assert_eq!(next.status(), GameStatus::Ongoing);
}

#[test]
fn test_checkmate_beats_fifty_move_rule() {
    let board = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 100 80").unwrap();
    assert!(board.is_checkmate());
    assert!(matches!(board.status(), GameStatus::Checkmate { .. }));
}

#[test]
fn test_insufficient_material_draw() {
    let cases = [
        "8/8/8/8/8/8/8/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6N1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6B1/K1k5 w - - 0 1",
        // bishops on the same square color
        "8/8/8/8/8/5b2/6B1/K1k5 w - - 0 1",
    ];
    for fen in cases {
        let board = Position::from_fen(fen).unwrap();
        assert!(board.is_insufficient_material(), "{fen}");
        assert_eq!(
            board.status(),
            GameStatus::Draw(DrawReason::InsufficientMaterial),
            "{fen}"
        );
    }
}

#[test]
fn test_sufficient_material() {
    let cases = [
        "8/8/8/8/8/8/6P1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/5NN1/K1k5 w - - 0 1",
        // bishops on opposite square colors
        "8/8/8/8/8/6b1/6B1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6R1/K1k5 w - - 0 1",
    ];
    for fen in cases {
        let board = Position::from_fen(fen).unwrap();
        assert!(!board.is_insufficient_material(), "{fen}");
    }
}

#[test]
fn test_fen_round_trip_normalized() {
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0";
    let board = Position::from_fen(fen).unwrap();
    assert_eq!(board.fullmove_number(), 1);
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    );
}

#[test]
fn test_display_shows_board_and_fen() {
    let text = Position::initial().to_string();
    assert!(text.starts_with("8  r n b q k b n r"));
    assert!(text.ends_with(crate::board::STARTING_FEN));
}
