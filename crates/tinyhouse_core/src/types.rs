/// Number of files and ranks on the board.
pub const BOARD_SIZE: u8 = 4;
/// Number of squares on the board.
pub const NUM_SQUARES: usize = 16;
/// Sentinel for "no square".
pub const NO_SQUARE: u8 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// Rank on which this color's pawns promote.
    pub fn promotion_rank(self) -> i8 {
        match self {
            Color::White => BOARD_SIZE as i8 - 1,
            Color::Black => 0,
        }
    }
    /// Rank direction a pawn of this color moves in.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Pawn,
    Ferz,
    Wazir,
    Horse,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::King,
        PieceKind::Pawn,
        PieceKind::Ferz,
        PieceKind::Wazir,
        PieceKind::Horse,
    ];
    /// Kinds that can sit in a pocket and be dropped.
    pub const DROPPABLE: [PieceKind; 4] = [
        PieceKind::Pawn,
        PieceKind::Ferz,
        PieceKind::Wazir,
        PieceKind::Horse,
    ];
    /// Kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceKind; 3] = [PieceKind::Ferz, PieceKind::Wazir, PieceKind::Horse];

    #[inline(always)]
    pub fn idx(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Pawn => 1,
            PieceKind::Ferz => 2,
            PieceKind::Wazir => 3,
            PieceKind::Horse => 4,
        }
    }

    /// Upper-case notation letter.
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Pawn => 'P',
            PieceKind::Ferz => 'F',
            PieceKind::Wazir => 'W',
            PieceKind::Horse => 'H',
        }
    }

    /// Parses a notation letter, ignoring case.
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'P' => Some(PieceKind::Pawn),
            'F' => Some(PieceKind::Ferz),
            'W' => Some(PieceKind::Wazir),
            'H' => Some(PieceKind::Horse),
            _ => None,
        }
    }

    pub fn is_droppable(self) -> bool {
        self != PieceKind::King
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    /// Notation character: upper case for White, lower case for Black.
    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }
}

/// A move in Tinyhouse.
///
/// Promotions and drops are separate variants so a move can never be both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Normal { from: u8, to: u8 },
    Promotion { from: u8, to: u8, kind: PieceKind },
    Drop { kind: PieceKind, to: u8 },
}

const MOVE_TYPE_PROMOTION: u32 = 1 << 14;
const MOVE_TYPE_DROP: u32 = 2 << 14;

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Move::Normal { from, to }
    }

    #[inline]
    pub fn to(self) -> u8 {
        match self {
            Move::Normal { to, .. } | Move::Promotion { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// Origin square, `None` for drops.
    #[inline]
    pub fn from(self) -> Option<u8> {
        match self {
            Move::Normal { from, .. } | Move::Promotion { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    pub fn is_drop(self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    pub fn promotion(self) -> Option<PieceKind> {
        match self {
            Move::Promotion { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Packs the move into the 32-bit tablebase form.
    ///
    /// Layout: bits 0-3 `to`, bits 4-7 `from` (`to` for drops), bits 8-9 an
    /// auxiliary code for the promoted or dropped kind, bits 14-15 the move
    /// type. The value 0 (a1a1) never denotes a legal move.
    ///
    /// # Panics
    /// On a promotion to a king or pawn, or a king drop.
    pub fn pack(self) -> u32 {
        match self {
            Move::Normal { from, to } => ((from as u32) << 4) | to as u32,
            Move::Promotion { from, to, kind } => {
                let aux = match kind {
                    PieceKind::Wazir => 0,
                    PieceKind::Ferz => 1,
                    PieceKind::Horse => 2,
                    PieceKind::King | PieceKind::Pawn => {
                        unreachable!("promotion to {kind:?}")
                    }
                };
                MOVE_TYPE_PROMOTION | (aux << 8) | ((from as u32) << 4) | to as u32
            }
            Move::Drop { kind, to } => {
                let aux = match kind {
                    PieceKind::Pawn => 0,
                    PieceKind::Wazir => 1,
                    PieceKind::Ferz => 2,
                    PieceKind::Horse => 3,
                    PieceKind::King => unreachable!("a king cannot be dropped"),
                };
                MOVE_TYPE_DROP | (aux << 8) | ((to as u32) << 4) | to as u32
            }
        }
    }

    /// Inverse of [`Move::pack`]. Returns `None` for 0 and for malformed words.
    pub fn unpack(raw: u32) -> Option<Move> {
        if raw == 0 || raw & !0xC3FF != 0 {
            return None;
        }
        let to = (raw & 0x0F) as u8;
        let from = ((raw >> 4) & 0x0F) as u8;
        let aux = (raw >> 8) & 0x03;
        match raw >> 14 {
            0 if aux == 0 && from != to => Some(Move::Normal { from, to }),
            1 => {
                let kind = match aux {
                    0 => PieceKind::Wazir,
                    1 => PieceKind::Ferz,
                    2 => PieceKind::Horse,
                    _ => return None,
                };
                Some(Move::Promotion { from, to, kind })
            }
            2 if from == to => {
                let kind = match aux {
                    0 => PieceKind::Pawn,
                    1 => PieceKind::Wazir,
                    2 => PieceKind::Ferz,
                    _ => PieceKind::Horse,
                };
                Some(Move::Drop { kind, to })
            }
            _ => None,
        }
    }
}

// Helpers
pub fn file_of(sq: u8) -> i8 {
    (sq % BOARD_SIZE) as i8
}
pub fn rank_of(sq: u8) -> i8 {
    (sq / BOARD_SIZE) as i8
}
pub fn sq(file: i8, rank: i8) -> Option<u8> {
    let n = BOARD_SIZE as i8;
    if (0..n).contains(&file) && (0..n).contains(&rank) {
        Some((rank as u8) * BOARD_SIZE + (file as u8))
    } else {
        None
    }
}

pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % BOARD_SIZE)) as char;
    let r = (b'1' + (sq / BOARD_SIZE)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'd').contains(&f) || !(b'1'..=b'4').contains(&r) {
        return None;
    }
    let file = f - b'a';
    let rank = r - b'1';
    Some(rank * BOARD_SIZE + file)
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
