//! Classical Tinyhouse Engine
//!
//! Alpha-beta search with material-based evaluation.

mod search;
mod tt;

use tinyhouse_core::{Engine, Position, SearchLimits, SearchResult};
use tracing::debug;

pub use search::{
    is_mate_score, mate_distance, pick_best_move, search_best_move, SearchOutcome, INFINITY, MATE,
};
pub use tinyhouse_core::eval::evaluate;
pub use tt::{Bound, Entry, TranspositionTable};

/// Default transposition table size in entries.
pub const DEFAULT_TT_ENTRIES: usize = 1 << 20;

/// Classical engine using negamax with alpha-beta pruning.
///
/// This engine uses:
/// - Iterative deepening up to the requested depth
/// - Negamax search with alpha-beta pruning and a transposition table
/// - Material evaluation counting pocketed pieces
/// - Repetition within the searched line scored as a draw
pub struct ClassicalEngine {
    tt: TranspositionTable,
    /// Node counter for statistics
    nodes: u64,
}

impl ClassicalEngine {
    pub fn new() -> Self {
        Self::with_tt_entries(DEFAULT_TT_ENTRIES)
    }

    pub fn with_tt_entries(entries: usize) -> Self {
        Self {
            tt: TranspositionTable::new(entries),
            nodes: 0,
        }
    }
}

impl Default for ClassicalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for ClassicalEngine {
    fn search(&mut self, pos: &Position, mut limits: SearchLimits) -> SearchResult {
        self.nodes = 0;
        limits.start();
        debug!(
            max_depth = limits.depth,
            time_limit = ?limits.time_control.time_limit(),
            "search started"
        );

        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            stopped: false,
        };

        for depth in 1..=limits.depth.max(1) {
            let outcome = pick_best_move(
                pos,
                depth,
                &mut self.tt,
                &mut self.nodes,
                &mut limits.time_control,
            );

            // A partial iteration only counts when nothing else finished
            if outcome.stopped && result.best_move.is_some() {
                result.stopped = true;
                break;
            }

            let Some((mv, score)) = outcome.best_move else {
                break; // no legal moves
            };
            result.best_move = Some(mv);
            result.score = score;
            result.depth = depth;
            result.stopped = outcome.stopped;
            debug!(depth, score, nodes = self.nodes, best = %mv, "iteration complete");

            if outcome.stopped {
                break;
            }
            // A forced result inside the horizon will not change
            if mate_distance(score).is_some_and(|d| d <= depth as i32) {
                break;
            }
        }

        result.nodes = self.nodes;
        result
    }

    fn name(&self) -> &str {
        "Classical v1.0"
    }

    fn author(&self) -> &str {
        "ML-chess"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
        self.tt.clear();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
