//! Immutable lookup data shared by every position.

use crate::attacks::AttackTables;
use crate::zobrist::{ZobristKeys, DEFAULT_SEED};

/// Attack tables and Zobrist keys, built once at compile time.
///
/// Positions hold a `&'static Context`. Tests that want different hash keys
/// can build their own with [`Context::with_seed`] and leak it.
pub struct Context {
    pub attacks: AttackTables,
    pub zobrist: ZobristKeys,
}

impl Context {
    pub const fn with_seed(seed: u64) -> Self {
        Context {
            attacks: AttackTables::new(),
            zobrist: ZobristKeys::new(seed),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("side_to_move_key", &self.zobrist.side_to_move)
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

/// The default context, computed at compile time.
pub static CONTEXT: Context = Context::with_seed(DEFAULT_SEED);
