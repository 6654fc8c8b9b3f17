use serde::Deserialize;

use chessium::board::Position;
use chessium::search::{SearchConfig, Searcher};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

fn load_problems() -> Vec<Problem> {
    let data = include_str!("data/problems.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid problems.json");
    set.problems
}

fn uci_line(moves: &str) -> Vec<String> {
    moves.split(';').map(|m| m.replace('-', "")).collect()
}

/// True when the side to move can mate immediately.
fn has_mate_in_one(position: &Position) -> bool {
    position
        .legal_moves()
        .iter()
        .any(|mv| mv.position().is_checkmate())
}

/// True when every reply to `position` runs into a mate in one.
fn every_reply_is_mated(position: &Position) -> bool {
    let replies = position.legal_moves();
    !replies.is_empty()
        && replies
            .iter()
            .all(|reply| has_mate_in_one(reply.position()))
}

#[test]
fn fixture_lines_are_legal_and_end_in_mate() {
    for problem in load_problems() {
        let mut position = Position::from_fen(&problem.fen).expect("fixture FEN");
        for uci in uci_line(&problem.moves) {
            position = position
                .apply_uci(&uci)
                .unwrap_or_else(|e| panic!("{uci} in {}: {e}", problem.fen));
        }
        assert!(position.is_checkmate(), "line does not mate: {}", problem.fen);
    }
}

#[test]
fn mate_in_one_suite() {
    let searcher = Searcher::with_config(SearchConfig::with_threads(1).depth(3).unlimited_time());

    for problem in load_problems().iter().filter(|p| p.kind == "Mate in One") {
        let position = Position::from_fen(&problem.fen).expect("fixture FEN");
        let result = searcher.search(&position).expect("search failed");

        assert!(
            result.position().is_checkmate(),
            "{} played {} instead of mating (expected {})",
            problem.fen,
            result.best_move,
            problem.moves
        );
        assert_eq!(result.mate_in(), Some(1), "{}", problem.fen);
    }
}

fn check_mate_in_two(threads: usize) {
    let searcher =
        Searcher::with_config(SearchConfig::with_threads(threads).depth(4).unlimited_time());

    for problem in load_problems().iter().filter(|p| p.kind == "Mate in Two") {
        let position = Position::from_fen(&problem.fen).expect("fixture FEN");
        assert!(!has_mate_in_one(&position), "{} has a shorter mate", problem.fen);

        searcher.clear_table();
        let result = searcher.search(&position).expect("search failed");

        assert!(
            every_reply_is_mated(result.position()),
            "{threads} threads: {} does not force mate in {}",
            result.best_move,
            problem.fen
        );
        assert_eq!(result.mate_in(), Some(2), "{threads} threads: {}", problem.fen);
    }
}

#[test]
fn mate_in_two_single_thread() {
    check_mate_in_two(1);
}

#[test]
fn mate_in_two_four_threads() {
    check_mate_in_two(4);
}
