//! Pre-computed attack tables for move generation and attack detection.
//!
//! This module contains:
//! - King, ferz and wazir step tables
//! - Pawn capture tables (per color)
//! - Horse tables split by leg direction, so the leg can be tested against
//!   the current occupancy
//! - A Chebyshev distance table
//!
//! All tables are built by `const fn` evaluation and live in [`AttackTables`].

use crate::bitboard::Bitboard;
use crate::types::{Color, Piece, PieceKind, NO_SQUARE, NUM_SQUARES};

/// Leg directions, in the order used to index the horse tables.
pub const NORTH: usize = 0;
pub const EAST: usize = 1;
pub const SOUTH: usize = 2;
pub const WEST: usize = 3;

/// Square index for `(file, rank)`, or `NO_SQUARE` when off the board.
const fn square_at(file: i8, rank: i8) -> u8 {
    if file < 0 || file > 3 || rank < 0 || rank > 3 {
        NO_SQUARE
    } else {
        (rank * 4 + file) as u8
    }
}

const fn bit_at(file: i8, rank: i8) -> u16 {
    let s = square_at(file, rank);
    if s == NO_SQUARE {
        0
    } else {
        1u16 << s
    }
}

/// Immutable attack tables for every square.
pub struct AttackTables {
    pub king: [Bitboard; NUM_SQUARES],
    pub ferz: [Bitboard; NUM_SQUARES],
    pub wazir: [Bitboard; NUM_SQUARES],
    /// Indexed by [color][square].
    pub pawn: [[Bitboard; NUM_SQUARES]; 2],
    /// Leg square per [direction][square], `NO_SQUARE` if the leg is off board.
    pub horse_leg: [[u8; NUM_SQUARES]; 4],
    /// The two jump targets reachable through each leg, per [direction][square].
    pub horse_jump: [[Bitboard; NUM_SQUARES]; 4],
    /// Chebyshev distance between two squares.
    pub distance: [[u8; NUM_SQUARES]; NUM_SQUARES],
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackTables {
    pub const fn new() -> Self {
        let mut king = [Bitboard::EMPTY; NUM_SQUARES];
        let mut ferz = [Bitboard::EMPTY; NUM_SQUARES];
        let mut wazir = [Bitboard::EMPTY; NUM_SQUARES];
        let mut pawn = [[Bitboard::EMPTY; NUM_SQUARES]; 2];
        let mut horse_leg = [[NO_SQUARE; NUM_SQUARES]; 4];
        let mut horse_jump = [[Bitboard::EMPTY; NUM_SQUARES]; 4];
        let mut distance = [[0u8; NUM_SQUARES]; NUM_SQUARES];

        let mut s = 0usize;
        while s < NUM_SQUARES {
            let f = (s % 4) as i8;
            let r = (s / 4) as i8;

            let orth = bit_at(f, r + 1) | bit_at(f + 1, r) | bit_at(f, r - 1) | bit_at(f - 1, r);
            let diag = bit_at(f + 1, r + 1)
                | bit_at(f - 1, r + 1)
                | bit_at(f + 1, r - 1)
                | bit_at(f - 1, r - 1);
            wazir[s] = Bitboard(orth);
            ferz[s] = Bitboard(diag);
            king[s] = Bitboard(orth | diag);

            pawn[0][s] = Bitboard(bit_at(f + 1, r + 1) | bit_at(f - 1, r + 1));
            pawn[1][s] = Bitboard(bit_at(f + 1, r - 1) | bit_at(f - 1, r - 1));

            // Leg one orthogonal step, then one diagonal step away from the origin.
            horse_leg[NORTH][s] = square_at(f, r + 1);
            horse_jump[NORTH][s] = Bitboard(bit_at(f - 1, r + 2) | bit_at(f + 1, r + 2));
            horse_leg[EAST][s] = square_at(f + 1, r);
            horse_jump[EAST][s] = Bitboard(bit_at(f + 2, r - 1) | bit_at(f + 2, r + 1));
            horse_leg[SOUTH][s] = square_at(f, r - 1);
            horse_jump[SOUTH][s] = Bitboard(bit_at(f - 1, r - 2) | bit_at(f + 1, r - 2));
            horse_leg[WEST][s] = square_at(f - 1, r);
            horse_jump[WEST][s] = Bitboard(bit_at(f - 2, r - 1) | bit_at(f - 2, r + 1));

            let mut t = 0usize;
            while t < NUM_SQUARES {
                let df = (t % 4) as i8 - f;
                let dr = (t / 4) as i8 - r;
                let df = if df < 0 { -df } else { df };
                let dr = if dr < 0 { -dr } else { dr };
                distance[s][t] = if df > dr { df as u8 } else { dr as u8 };
                t += 1;
            }
            s += 1;
        }

        AttackTables {
            king,
            ferz,
            wazir,
            pawn,
            horse_leg,
            horse_jump,
            distance,
        }
    }

    /// Horse attacks from `sq`, skipping every leg that is occupied.
    #[inline]
    pub fn horse(&self, sq: u8, occupied: Bitboard) -> Bitboard {
        let mut result = Bitboard::EMPTY;
        for dir in 0..4 {
            let leg = self.horse_leg[dir][sq as usize];
            if leg != NO_SQUARE && !occupied.contains(leg) {
                result |= self.horse_jump[dir][sq as usize];
            }
        }
        result
    }

    /// Pawn capture squares for `color` from `sq`.
    #[inline(always)]
    pub fn pawn(&self, color: Color, sq: u8) -> Bitboard {
        self.pawn[color.idx()][sq as usize]
    }

    /// Squares attacked by `piece` standing on `sq` given the occupancy.
    pub fn attacks(&self, piece: Piece, sq: u8, occupied: Bitboard) -> Bitboard {
        match piece.kind {
            PieceKind::King => self.king[sq as usize],
            PieceKind::Pawn => self.pawn(piece.color, sq),
            PieceKind::Ferz => self.ferz[sq as usize],
            PieceKind::Wazir => self.wazir[sq as usize],
            PieceKind::Horse => self.horse(sq, occupied),
        }
    }

    #[inline(always)]
    pub fn distance(&self, a: u8, b: u8) -> u8 {
        self.distance[a as usize][b as usize]
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
