//! Zobrist hashing for Tinyhouse positions.
//!
//! The hash is computed by XOR-ing together random values for:
//! - Each piece on each square (2 colors × 5 kinds × 16 squares)
//! - Side to move (1 value, XORed when Black is to move)
//! - Pocket contents, one value per (color, kind, count)
//!
//! Pawn keys on each color's promotion rank are zero. A promoting pawn can
//! then be moved to its destination like any other piece and swapped for the
//! promoted piece afterwards without touching the key twice.
//!
//! A pocket count of zero contributes nothing, so an empty reserve hashes
//! like a position without pockets.

use crate::types::{Color, Piece, PieceKind, NUM_SQUARES};

/// Largest pocket count that can be hashed. The board holds at most 14
/// non-king pieces, so no single pocket can exceed this.
pub const POCKET_LIMIT: usize = 14;

/// Default seed for the keys in [`crate::CONTEXT`].
pub const DEFAULT_SEED: u64 = 0x123456789ABCDEF0;

/// Pre-computed random values for Zobrist hashing.
pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; NUM_SQUARES]; 5]; 2],
    /// Random value for black to move
    pub side_to_move: u64,
    /// Indexed by [color][piece_kind][count]; count 0 is always zero.
    pub pockets: [[[u64; POCKET_LIMIT + 1]; 5]; 2],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl ZobristKeys {
    /// Generate Zobrist keys using xorshift64 from `seed`.
    pub const fn new(seed: u64) -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        // xorshift has a fixed point at zero
        let mut state = if seed == 0 { DEFAULT_SEED } else { seed };

        let mut pieces = [[[0u64; NUM_SQUARES]; 5]; 2];
        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < 5 {
                let mut sq = 0;
                while sq < NUM_SQUARES {
                    state = xorshift64(state);
                    let promo_rank = if color == 0 { 3 } else { 0 };
                    // kind 1 is the pawn
                    pieces[color][kind][sq] = if kind == 1 && sq / 4 == promo_rank {
                        0
                    } else {
                        state
                    };
                    sq += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        let mut pockets = [[[0u64; POCKET_LIMIT + 1]; 5]; 2];
        let mut color = 0;
        while color < 2 {
            // The king is never pocketed, start at the pawn
            let mut kind = 1;
            while kind < 5 {
                let mut count = 1;
                while count <= POCKET_LIMIT {
                    state = xorshift64(state);
                    pockets[color][kind][count] = state;
                    count += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            pockets,
        }
    }

    /// Get the Zobrist key for a piece on a square.
    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    /// Get the Zobrist key for holding `count` pieces of `kind` in reserve.
    #[inline(always)]
    pub fn pocket_key(&self, color: Color, kind: PieceKind, count: u8) -> u64 {
        self.pockets[color.idx()][kind.idx()][count as usize]
    }
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
