pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod context;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use attacks::AttackTables;
pub use bitboard::*;
pub use board::*;
pub use context::{Context, CONTEXT};
pub use error::{Error, Result};
pub use movegen::*;
pub use notation::parse_move;
pub use perft::{perft, perft_divide};
pub use time_control::*;
pub use types::*;
pub use zobrist::{ZobristKeys, POCKET_LIMIT};

// =============================================================================
// Engine trait: implemented by every Tinyhouse engine
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Score from the side to move's perspective
    pub score: i32,
    /// Search depth reached
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Whether search was stopped early due to time limit
    pub stopped: bool,
}

/// Trait that all Tinyhouse engines implement.
pub trait Engine: Send {
    /// Search the position with the given search limits.
    ///
    /// The position is not modified; engines search on their own copy.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name
    fn name(&self) -> &str;

    /// Returns the engine's author
    fn author(&self) -> &str {
        "ML-chess"
    }

    /// Reset internal state for a new game (clear hash tables, etc.)
    fn new_game(&mut self) {}
}
