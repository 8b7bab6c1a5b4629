//! Text forms of positions and moves.
//!
//! Position notation lists ranks 4 down to 1 separated by `/`, using
//! `K P F W H` (upper case White, lower case Black) and digits for empty
//! runs. An optional `[...]` pocket section follows the placement, then the
//! side to move and an optional full-move number:
//!
//! ```text
//! fhwk/3p/P3/KWHF w 1
//! k3/4/4/K3[Wp] b 7
//! ```
//!
//! Moves are written `a1b2`, `a3a4=W` (promotion) and `W@c2` (drop).

use std::fmt;
use std::str::FromStr;

use crate::board::Position;
use crate::context::{Context, CONTEXT};
use crate::error::{Error, Result};
use crate::movegen::legal_moves;
use crate::types::*;
use crate::zobrist::POCKET_LIMIT;

impl Position {
    /// Parses notation using the default [`CONTEXT`].
    pub fn from_notation(s: &str) -> Result<Position> {
        Self::from_notation_in(&CONTEXT, s)
    }

    /// Parses notation into a position that hashes with `ctx`.
    pub fn from_notation_in(ctx: &'static Context, s: &str) -> Result<Position> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let (placement, rest) = match parts.split_first() {
            Some(split) => split,
            None => return Err(parse("empty notation")),
        };
        let placement: &str = placement;
        if rest.len() > 2 {
            return Err(parse(format!("unexpected trailing field '{}'", rest[2])));
        }

        let mut pos = Position::empty(ctx);

        let (board_part, pocket_part) = match placement.find('[') {
            Some(i) => {
                let pockets = placement[i + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| parse("unterminated pocket section"))?;
                (&placement[..i], Some(pockets))
            }
            None => (placement, None),
        };

        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(parse(format!(
                "expected {BOARD_SIZE} ranks, found {}",
                ranks.len()
            )));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = BOARD_SIZE as i8 - 1 - rank_idx as i8; // rank 4 first
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if !(1..=BOARD_SIZE as u32).contains(&d) {
                        return Err(parse(format!("bad empty-run digit '{ch}'")));
                    }
                    file += d as i8;
                } else {
                    let piece = Piece::from_char(ch)
                        .ok_or_else(|| parse(format!("unknown piece character '{ch}'")))?;
                    let s = sq(file, rank)
                        .ok_or_else(|| parse(format!("too many files in rank {}", rank + 1)))?;
                    pos.put_piece(s, piece);
                    file += 1;
                }
                if file > BOARD_SIZE as i8 {
                    return Err(parse(format!("too many files in rank {}", rank + 1)));
                }
            }
            if file != BOARD_SIZE as i8 {
                return Err(parse(format!("not enough files in rank {}", rank + 1)));
            }
        }

        if let Some(pockets) = pocket_part {
            for ch in pockets.chars() {
                let piece = Piece::from_char(ch)
                    .ok_or_else(|| parse(format!("unknown pocket character '{ch}'")))?;
                if !piece.kind.is_droppable() {
                    return Err(parse("a king cannot be in a pocket"));
                }
                let count = pos.pocket(piece.color, piece.kind);
                if count as usize >= POCKET_LIMIT {
                    return Err(Error::InvalidPosition("too many pieces in pocket".into()));
                }
                pos.set_pocket(piece.color, piece.kind, count + 1);
            }
        }

        let side = match rest.first() {
            Some(&"w") => Color::White,
            Some(&"b") => Color::Black,
            Some(other) => return Err(parse(format!("bad side to move '{other}'"))),
            None => return Err(parse("missing side to move")),
        };
        let game_ply = match rest.get(1) {
            Some(text) => text
                .parse::<u32>()
                .ok()
                .filter(|&n| n >= 1)
                .and_then(|n| (n - 1).checked_mul(2))
                .and_then(|ply| ply.checked_add((side == Color::Black) as u32))
                .ok_or_else(|| parse(format!("bad move counter '{text}'")))?,
            None => (side == Color::Black) as u32,
        };

        pos.set_side_to_move(side);
        pos.set_game_ply(game_ply);
        pos.refresh();
        pos.validate()?;
        Ok(pos)
    }

    pub fn to_notation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_SIZE as i8).rev() {
            let mut empty = 0;
            for file in 0..BOARD_SIZE as i8 {
                let s = (rank * BOARD_SIZE as i8 + file) as u8;
                match self.piece_at(s) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        if !self.pocket_is_empty(Color::White) || !self.pocket_is_empty(Color::Black) {
            write!(f, "[")?;
            for color in Color::ALL {
                for kind in PieceKind::DROPPABLE {
                    let c = Piece::new(color, kind).to_char();
                    for _ in 0..self.pocket(color, kind) {
                        write!(f, "{c}")?;
                    }
                }
            }
            write!(f, "]")?;
        }

        let side = match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        write!(f, " {side} {}", self.fullmove_number())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Position::from_notation(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Normal { from, to } => write!(f, "{}{}", sq_to_coord(from), sq_to_coord(to)),
            Move::Promotion { from, to, kind } => write!(
                f,
                "{}{}={}",
                sq_to_coord(from),
                sq_to_coord(to),
                kind.letter()
            ),
            Move::Drop { kind, to } => write!(f, "{}@{}", kind.letter(), sq_to_coord(to)),
        }
    }
}

impl Move {
    /// Parses move text without checking legality.
    pub fn parse_text(text: &str) -> Result<Move> {
        let bad = || parse(format!("bad move text '{text}'"));
        if !text.is_ascii() {
            return Err(bad());
        }
        let bytes = text.as_bytes();

        if bytes.len() == 4 && bytes[1] == b'@' {
            let kind = PieceKind::from_letter(bytes[0] as char).ok_or_else(bad)?;
            if !kind.is_droppable() {
                return Err(bad());
            }
            let to = coord_to_sq(&text[2..]).ok_or_else(bad)?;
            return Ok(Move::Drop { kind, to });
        }

        if bytes.len() != 4 && bytes.len() != 6 {
            return Err(bad());
        }
        let from = coord_to_sq(&text[0..2]).ok_or_else(bad)?;
        let to = coord_to_sq(&text[2..4]).ok_or_else(bad)?;
        if from == to {
            return Err(bad());
        }
        if bytes.len() == 4 {
            return Ok(Move::Normal { from, to });
        }
        if bytes[4] != b'=' {
            return Err(bad());
        }
        let kind = PieceKind::from_letter(bytes[5] as char)
            .filter(|k| PieceKind::PROMOTIONS.contains(k))
            .ok_or_else(bad)?;
        Ok(Move::Promotion { from, to, kind })
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Move::parse_text(s)
    }
}

/// Parses `text` and checks it is legal in `pos`.
pub fn parse_move(pos: &Position, text: &str) -> Result<Move> {
    let mv = Move::parse_text(text)?;
    if legal_moves(pos).contains(&mv) {
        Ok(mv)
    } else {
        Err(Error::IllegalMove(format!("{mv} in {pos}")))
    }
}

fn parse(msg: impl Into<String>) -> Error {
    Error::Parse(msg.into())
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
