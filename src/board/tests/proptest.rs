//! Property-based tests using proptest.

use crate::board::{Position, Square};
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Play up to `plies` random legal moves from the initial position, keeping
/// every visited position.
fn random_line(seed: u64, plies: usize) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut line = vec![Position::initial()];
    for _ in 0..plies {
        let moves = line[line.len() - 1].legal_moves();
        if moves.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..moves.len());
        line.push(moves[idx].position().clone());
    }
    line
}

proptest! {
    /// Property: applying a move never modifies the source position
    #[test]
    fn prop_apply_leaves_source_untouched(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for position in random_line(seed, num_moves) {
            let snapshot = position.clone();
            for mv in position.legal_moves().iter() {
                let _ = position.apply(mv);
            }
            prop_assert_eq!(&position, &snapshot);
        }
    }

    /// Property: hash is always consistent with recomputed hash
    #[test]
    fn prop_hash_consistency(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for position in random_line(seed, num_moves) {
            prop_assert_eq!(position.hash(), position.recompute_hash());
        }
    }

    /// Property: FEN round-trip preserves position
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for position in random_line(seed, num_moves) {
            let fen = position.to_fen();
            let parsed = Position::from_fen(&fen).unwrap();
            prop_assert_eq!(parsed.to_fen(), fen);
            prop_assert_eq!(parsed.hash(), position.hash());
            prop_assert_eq!(&parsed, &position);
        }
    }

    /// Property: no generated move leaves the mover's king attacked
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for position in random_line(seed, num_moves) {
            let mover = position.side_to_move();
            for mv in position.legal_moves().iter() {
                let next = mv.position();
                prop_assert_eq!(next.side_to_move(), mover.opponent());
                prop_assert!(!next.is_square_attacked(next.king_square(mover), mover.opponent()));
            }
        }
    }

    /// Property: per-square generation partitions the full move list
    #[test]
    fn prop_moves_from_partition_legal_moves(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let position = random_line(seed, num_moves).pop().unwrap();
        let per_square: usize = Square::all().map(|sq| position.legal_moves_from(sq).len()).sum();
        prop_assert_eq!(per_square, position.legal_moves().len());
    }

    /// Property: generation is deterministic
    #[test]
    fn prop_generation_is_deterministic(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let position = random_line(seed, num_moves).pop().unwrap();
        let first: Vec<_> = position.legal_moves().iter().map(|m| m.key()).collect();
        let second: Vec<_> = position.legal_moves().iter().map(|m| m.key()).collect();
        prop_assert_eq!(first, second);
    }
}
