use super::*;
use std::time::Duration;
use tinyhouse_core::legal_moves;

#[test]
fn test_proven_mate_ends_deepening() {
    let pos = Position::from_notation("k3/2F1/WK2/4 w 1").unwrap();
    let mut engine = ClassicalEngine::with_tt_entries(1 << 12);
    let result = engine.search(&pos, SearchLimits::depth(9));
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("a2a3"));
    assert_eq!(result.score, MATE - 1);
    assert_eq!(result.depth, 1);
    assert!(!result.stopped);
    assert!(result.nodes > 0);
}

#[test]
fn test_depth_limit_reached() {
    let pos = Position::startpos();
    let mut engine = ClassicalEngine::with_tt_entries(1 << 14);
    let result = engine.search(&pos, SearchLimits::depth(3));
    assert!(legal_moves(&pos).contains(&result.best_move.unwrap()));
    assert!(!result.stopped);
    assert!(result.depth <= 3);
    if mate_distance(result.score).is_none() {
        assert_eq!(result.depth, 3);
    }
}

#[test]
fn test_time_limit_stops_search() {
    let pos = Position::startpos();
    let mut engine = ClassicalEngine::with_tt_entries(1 << 16);
    let limits = SearchLimits::depth_and_time(u8::MAX, Duration::from_millis(20));
    let result = engine.search(&pos, limits);

    // Best move of the last finished iteration
    assert!(legal_moves(&pos).contains(&result.best_move.unwrap()));
    assert!(result.depth >= 1);
    assert!(result.stopped || mate_distance(result.score).is_some());
}

#[test]
fn test_no_legal_moves() {
    let pos = Position::from_notation("k3/W1F1/1K2/4 b 1").unwrap();
    let mut engine = ClassicalEngine::with_tt_entries(1 << 10);
    let result = engine.search(&pos, SearchLimits::depth(4));
    assert_eq!(result.best_move, None);
    assert_eq!(result.depth, 0);
}

#[test]
fn test_new_game_clears_table() {
    let mut engine = ClassicalEngine::with_tt_entries(1 << 12);
    engine.search(&Position::startpos(), SearchLimits::depth(2));
    assert!(!engine.tt.is_empty());
    engine.new_game();
    assert!(engine.tt.is_empty());
}
