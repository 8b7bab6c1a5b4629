//! Tests for the retrograde solver
//!
//! Every labeled node is checked against its children, the node set is
//! compared with an independent breadth-first walk, and small positions are
//! cross-checked against the alpha-beta search.

use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;

use rayon::prelude::*;

use classical_engine::{is_mate_score, search_best_move};
use tablebase::{solve, Solution, TablebaseError, Wdl};
use tinyhouse_core::{legal_moves, Error, Move, Position};

const KINGS_ONLY: &str = "k3/4/4/K3 w 1";
const KINGS_AND_WAZIR: &str = "k3/4/4/KW2 w 1";
const MATED: &str = "k3/W1F1/1K2/4 b 1";
const STALEMATED: &str = "k3/2F1/1K2/4 b 1";
const MATE_IN_ONE: &str = "k3/2F1/WK2/4 w 1";

fn pos(notation: &str) -> Position {
    Position::from_notation(notation).unwrap()
}

/// Positions reachable from `start`, found without the solver's graph code.
fn walk(start: &Position) -> Vec<Position> {
    let mut root = start.clone();
    root.clear_history();
    let mut seen = HashSet::new();
    seen.insert(root.key());
    let mut out = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(p) = queue.pop_front() {
        for mv in legal_moves(&p) {
            let mut child = p.clone();
            child.make_move(mv);
            child.clear_history();
            if seen.insert(child.key()) {
                queue.push_back(child);
            }
        }
        out.push(p);
    }
    out
}

fn child_after(p: &Position, mv: Move) -> Position {
    let mut child = p.clone();
    child.make_move(mv);
    child
}

/// Checks every node of `solution` against the records of its children.
fn assert_sound(solution: &Solution, positions: &[Position]) {
    for p in positions {
        let rec = solution.record(p.key()).expect("reachable position solved");
        let moves = legal_moves(p);
        let children: Vec<_> = moves
            .iter()
            .map(|&mv| {
                let c = child_after(p, mv);
                (mv, *solution.record(c.key()).expect("child solved"))
            })
            .collect();

        if moves.is_empty() {
            assert_eq!(rec.dtm, 0, "{p}");
            assert_eq!(rec.best, None, "{p}");
            let expected = if p.in_check() { Wdl::Loss } else { Wdl::Win };
            assert_eq!(rec.wdl, expected, "terminal {p}");
            continue;
        }

        match rec.wdl {
            Wdl::Win => {
                let best = rec.best.expect("win has a best move");
                assert!(moves.contains(&best), "{p}: best move {best} illegal");
                let target = child_after(p, best);
                let child = solution.record(target.key()).unwrap();
                assert_eq!(child.wdl, Wdl::Loss, "{p}: best move must reach a loss");
                assert_eq!(child.dtm + 1, rec.dtm, "{p}");
                // Shortest win
                for (_, c) in &children {
                    if c.wdl == Wdl::Loss {
                        assert!(c.dtm + 1 >= rec.dtm, "{p}: faster win missed");
                    }
                }
            }
            Wdl::Loss => {
                assert!(children.iter().all(|(_, c)| c.wdl == Wdl::Win), "{p}");
                let deepest = children.iter().map(|(_, c)| c.dtm).max().unwrap();
                assert_eq!(rec.dtm, deepest + 1, "{p}");
                let best = rec.best.expect("loss has a best defence");
                let target = child_after(p, best);
                assert_eq!(solution.record(target.key()).unwrap().dtm, deepest, "{p}");
            }
            Wdl::Draw => {
                assert_eq!(rec.dtm, 0, "{p}");
                assert_eq!(rec.best, None, "{p}");
                assert!(
                    children.iter().all(|(_, c)| c.wdl != Wdl::Loss),
                    "{p}: draw with a losing child"
                );
                assert!(
                    children.iter().any(|(_, c)| c.wdl == Wdl::Draw),
                    "{p}: draw needs a drawing child"
                );
            }
        }
    }
}

fn mate_in_one_solution() -> &'static (Solution, Vec<Position>) {
    static SOLVED: OnceLock<(Solution, Vec<Position>)> = OnceLock::new();
    SOLVED.get_or_init(|| {
        let start = pos(MATE_IN_ONE);
        (solve(&start).unwrap(), walk(&start))
    })
}

// =============================================================================
// Terminal Positions
// =============================================================================

#[test]
fn test_checkmate_is_loss_at_zero() {
    let solution = solve(&pos(MATED)).unwrap();
    assert_eq!(solution.len(), 1);
    let rec = solution.records()[0];
    assert_eq!(rec.wdl, Wdl::Loss);
    assert_eq!(rec.dtm, 0);
    assert_eq!(rec.best, None);
    assert_eq!(solution.stats().checkmates, 1);
}

#[test]
fn test_stalemate_is_win_at_zero() {
    let solution = solve(&pos(STALEMATED)).unwrap();
    assert_eq!(solution.len(), 1);
    let rec = solution.records()[0];
    assert_eq!(rec.wdl, Wdl::Win);
    assert_eq!(rec.dtm, 0);
    assert_eq!(solution.stats().stalemates, 1);
}

#[test]
fn test_invalid_start_rejected() {
    // Black is in check with White to move
    let err = Position::from_notation("k3/W3/K3/4 w 1").unwrap_err();
    assert!(matches!(err, Error::InvalidPosition(_)));
    let wrapped: TablebaseError = err.into();
    assert!(matches!(wrapped, TablebaseError::Position(_)));
}

// =============================================================================
// Whole-Graph Properties
// =============================================================================

#[test]
fn test_kings_only_is_all_draws() {
    let solution = solve(&pos(KINGS_ONLY)).unwrap();
    let stats = solution.stats();
    assert!(stats.nodes > 0);
    assert_eq!(stats.draws, stats.nodes);
    assert_eq!(stats.terminals, 0);
    assert_eq!(stats.max_dtm, 0);
}

#[test]
fn test_node_count_matches_independent_walk() {
    let start = pos(KINGS_AND_WAZIR);
    let solution = solve(&start).unwrap();
    let positions = walk(&start);
    assert_eq!(solution.len(), positions.len());
    for p in &positions {
        assert!(solution.record(p.key()).is_some(), "{p} missing");
    }

    let edges: usize = positions.iter().map(|p| legal_moves(p).len()).sum();
    assert_eq!(solution.stats().edges, edges as u64);
}

#[test]
fn test_labels_are_sound_small() {
    let start = pos(KINGS_AND_WAZIR);
    let solution = solve(&start).unwrap();
    assert_sound(&solution, &walk(&start));

    let s = solution.stats();
    assert_eq!(s.wins + s.losses + s.draws, s.nodes);
    assert_eq!(s.checkmates + s.stalemates, s.terminals);
}

#[test]
fn test_labels_are_sound_with_mates() {
    let (solution, positions) = mate_in_one_solution();
    assert_eq!(solution.len(), positions.len());
    assert_sound(solution, positions);
}

#[test]
fn test_children_cover_all_moves() {
    let (solution, _) = mate_in_one_solution();
    let start = pos(MATE_IN_ONE);
    let children = solution.graph().children(&start).unwrap();
    assert_eq!(children.len(), legal_moves(&start).len());
    for (mv, id) in children {
        let child = child_after(&start, mv);
        assert_eq!(solution.graph().node(id).key, child.key());
    }
}

#[test]
fn test_mate_in_one_record() {
    let (solution, _) = mate_in_one_solution();
    let rec = solution.record(pos(MATE_IN_ONE).key()).unwrap();
    assert_eq!(rec.wdl, Wdl::Win);
    assert_eq!(rec.dtm, 1);
    assert_eq!(rec.best.unwrap().to_string(), "a2a3");
}

// =============================================================================
// Agreement With Search
// =============================================================================

#[test]
fn test_search_agrees_on_short_mates() {
    let (solution, positions) = mate_in_one_solution();
    let sample: Vec<(&Position, Wdl, u16)> = positions
        .iter()
        .filter_map(|p| {
            let rec = solution.record(p.key())?;
            (rec.wdl != Wdl::Draw && (1..=2).contains(&rec.dtm)).then_some((p, rec.wdl, rec.dtm))
        })
        .step_by(7)
        .take(24)
        .collect();
    assert!(!sample.is_empty());

    sample.par_iter().for_each(|&(p, wdl, dtm)| {
        let (_, score) = search_best_move(p, dtm as u8 + 1).expect("not terminal");
        assert!(is_mate_score(score), "{p}: score {score}");
        match wdl {
            Wdl::Win => assert!(score > 0, "{p}: tablebase win, search {score}"),
            Wdl::Loss => assert!(score < 0, "{p}: tablebase loss, search {score}"),
            Wdl::Draw => unreachable!(),
        }
    });
}

// =============================================================================
// Full Solve
// =============================================================================

#[test]
#[ignore = "solves the whole start position; run with --ignored"]
fn test_full_startpos_solve() {
    let start = Position::startpos();
    let solution = solve(&start).unwrap();
    let s = solution.stats();
    assert!(s.nodes > 1);
    assert_eq!(s.wins + s.losses + s.draws, s.nodes);
    assert!(solution.record(start.key()).is_some());
}
