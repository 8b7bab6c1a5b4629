//! Perft self-consistency tests
//!
//! Tinyhouse has no published perft tables, so the bulk-counting perft is
//! checked against a plain recursive count, against its own divide output,
//! and against hand-counted move lists.

use rayon::prelude::*;

use tinyhouse_core::{legal_moves, perft, perft_divide, Position, STARTPOS};

const FULL_PERFT_ENV: &str = "FULL_PERFT";

const POSITIONS: &[&str] = &[
    STARTPOS,
    "k3/4/4/K3[P] w 1",
    "k3/4/4/K3[Hh] w 1",
    "k3/2P1/4/K3 w 1",
    "k3/1h2/1W2/K3 w 1",
    "k3/1h2/P3/K3[W] w 1",
    "fhw1/3k/P2p/KWHF[Pp] b 5",
];

/// Leaf count without bulk counting or buffer reuse.
fn naive(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    legal_moves(pos)
        .into_iter()
        .map(|mv| {
            let mut child = pos.clone();
            child.make_move(mv);
            naive(&child, depth - 1)
        })
        .sum()
}

// =============================================================================
// Hand-Counted
// =============================================================================

#[test]
fn test_perft_depth_zero_and_one() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 0), 1);
    assert_eq!(perft(&mut pos, 1), 6);

    let mut pos = Position::from_notation("k3/4/4/K3[P] w 1").unwrap();
    assert_eq!(perft(&mut pos, 1), 14);
}

#[test]
fn test_perft_terminal_positions() {
    for notation in ["k3/W1F1/1K2/4 b 1", "k3/2F1/1K2/4 b 1"] {
        let mut pos = Position::from_notation(notation).unwrap();
        assert_eq!(perft(&mut pos, 1), 0, "{notation}");
        assert_eq!(perft(&mut pos, 3), 0, "{notation}");
        assert!(perft_divide(&mut pos, 2).is_empty());
    }
}

// =============================================================================
// Self-Consistency
// =============================================================================

#[test]
fn test_perft_matches_naive_count() {
    let max_depth = if std::env::var(FULL_PERFT_ENV).is_ok() { 5 } else { 3 };
    POSITIONS.par_iter().for_each(|notation| {
        let pos = Position::from_notation(notation).unwrap();
        for depth in 1..=max_depth {
            let mut p = pos.clone();
            let fast = perft(&mut p, depth);
            assert_eq!(fast, naive(&pos, depth), "{notation} depth {depth}");
            assert_eq!(p, pos, "perft must leave {notation} unchanged");
        }
    });
}

#[test]
fn test_divide_sums_to_perft() {
    POSITIONS.par_iter().for_each(|notation| {
        let mut pos = Position::from_notation(notation).unwrap();
        let divide = perft_divide(&mut pos, 3);
        assert_eq!(divide.len(), legal_moves(&pos).len());
        let sum: u64 = divide.iter().map(|(_, n)| n).sum();
        assert_eq!(sum, perft(&mut pos, 3), "{notation}");
    });
}

#[test]
fn test_divide_depth_one_is_move_list() {
    let mut pos = Position::startpos();
    let divide = perft_divide(&mut pos, 1);
    let moves: Vec<_> = divide.iter().map(|(mv, _)| *mv).collect();
    assert_eq!(moves, legal_moves(&pos));
    assert!(divide.iter().all(|(_, n)| *n == 1));
}
