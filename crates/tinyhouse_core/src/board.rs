use crate::bitboard::Bitboard;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::movegen;
use crate::types::*;
use crate::zobrist::POCKET_LIMIT;

/// Notation of the initial Tinyhouse position.
pub const STARTPOS: &str = "fhwk/3p/P3/KWHF w 1";

/// Maximum number of pieces in play, kings and pockets included.
pub const MAX_PIECES: u32 = 16;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Side to move is in check without a legal move.
    Checkmate { winner: Color },
    /// Side to move has no legal move but is not in check. The stalemated
    /// side wins in Tinyhouse.
    Stalemate { winner: Color },
    /// The current position already occurred in this line of play.
    Repetition,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } | Outcome::Stalemate { winner } => Some(winner),
            Outcome::Repetition => None,
        }
    }
}

#[derive(Clone)]
pub struct Position {
    board: [Option<Piece>; NUM_SQUARES],
    by_kind: [Bitboard; 5],
    by_color: [Bitboard; 2],
    /// Reserve counts indexed by [color][kind]. The king slot stays zero.
    pockets: [[u8; 5]; 2],
    side_to_move: Color,
    game_ply: u32,
    key: u64,
    checkers: Bitboard,
    /// Per color, the occupied horse-leg squares shielding that color's king.
    blockers: [Bitboard; 2],
    /// Keys of the positions before each played move.
    history: Vec<u64>,
    ctx: &'static Context,
}

/// State needed to take back a move. Returned by [`Position::make_move`] and
/// consumed by [`Position::unmake_move`].
#[derive(Debug)]
pub struct Undo {
    captured: Option<Piece>,
    moved: PieceKind,
    key: u64,
    checkers: Bitboard,
    blockers: [Bitboard; 2],
    pockets: [[u8; 5]; 2],
    key_after: u64,
}

impl Undo {
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("notation", &self.to_notation())
            .field("key", &format_args!("{:#018x}", self.key))
            .field("history", &self.history.len())
            .finish()
    }
}

// History and context are not part of the position itself.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.by_kind == other.by_kind
            && self.by_color == other.by_color
            && self.pockets == other.pockets
            && self.side_to_move == other.side_to_move
            && self.game_ply == other.game_ply
            && self.key == other.key
            && self.checkers == other.checkers
            && self.blockers == other.blockers
    }
}

impl Eq for Position {}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        Self::from_notation(STARTPOS).expect("start position notation is valid")
    }

    /// Empty board with White to move, used while parsing.
    pub(crate) fn empty(ctx: &'static Context) -> Self {
        Position {
            board: [None; NUM_SQUARES],
            by_kind: [Bitboard::EMPTY; 5],
            by_color: [Bitboard::EMPTY; 2],
            pockets: [[0; 5]; 2],
            side_to_move: Color::White,
            game_ply: 0,
            key: 0,
            checkers: Bitboard::EMPTY,
            blockers: [Bitboard::EMPTY; 2],
            history: Vec::new(),
            ctx,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    #[inline(always)]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.by_kind[kind.idx()]
    }

    #[inline(always)]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.by_kind[kind.idx()] & self.by_color[color.idx()]
    }

    #[inline(always)]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.by_color[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline(always)]
    pub fn pocket(&self, color: Color, kind: PieceKind) -> u8 {
        self.pockets[color.idx()][kind.idx()]
    }

    pub fn pocket_is_empty(&self, color: Color) -> bool {
        self.pockets[color.idx()].iter().all(|&n| n == 0)
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn game_ply(&self) -> u32 {
        self.game_ply
    }

    /// Full-move number as written in notation, starting at 1.
    pub fn fullmove_number(&self) -> u32 {
        self.game_ply / 2 + 1
    }

    /// Incrementally maintained Zobrist key.
    #[inline(always)]
    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn context(&self) -> &'static Context {
        self.ctx
    }

    /// King square of `color`, or `NO_SQUARE` if it has none.
    #[inline]
    pub fn king_sq(&self, color: Color) -> u8 {
        self.pieces_of(color, PieceKind::King)
            .lsb()
            .unwrap_or(NO_SQUARE)
    }

    /// Pieces giving check to the side to move.
    #[inline(always)]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    #[inline(always)]
    pub fn in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    /// Occupied horse-leg squares whose vacating would expose `color`'s king.
    #[inline(always)]
    pub fn blockers_for_king(&self, color: Color) -> Bitboard {
        self.blockers[color.idx()]
    }

    // ------------------------------------------------------------------
    // Attacks
    // ------------------------------------------------------------------

    /// All pieces of either color attacking `sq`, with `occupied` deciding
    /// which pieces exist and which horse legs are blocked.
    pub fn attackers_to(&self, sq: u8, occupied: Bitboard) -> Bitboard {
        let a = &self.ctx.attacks;
        let s = sq as usize;
        let white = self.by_color[Color::White.idx()];
        let black = self.by_color[Color::Black.idx()];
        let pawns = self.pieces(PieceKind::Pawn);

        let mut attackers = (a.king[s] & self.pieces(PieceKind::King))
            | (a.ferz[s] & self.pieces(PieceKind::Ferz))
            | (a.wazir[s] & self.pieces(PieceKind::Wazir))
            | (a.pawn(Color::Black, sq) & pawns & white)
            | (a.pawn(Color::White, sq) & pawns & black);

        // Horse attacks are not symmetric, so ask every horse directly.
        for h in self.pieces(PieceKind::Horse) & occupied {
            if a.horse(h, occupied).contains(sq) {
                attackers.set(h);
            }
        }
        attackers & occupied
    }

    /// True if `sq` is attacked by any piece of `by`.
    pub fn is_attacked_by(&self, sq: u8, by: Color) -> bool {
        !(self.attackers_to(sq, self.occupied()) & self.color_bb(by)).is_empty()
    }

    fn update_check_info(&mut self) {
        let us = self.side_to_move;
        let ksq = self.king_sq(us);
        self.checkers = if ksq == NO_SQUARE {
            Bitboard::EMPTY
        } else {
            self.attackers_to(ksq, self.occupied()) & self.color_bb(us.other())
        };
        for color in Color::ALL {
            self.blockers[color.idx()] = self.compute_blockers(color);
        }
    }

    fn compute_blockers(&self, color: Color) -> Bitboard {
        let ksq = self.king_sq(color);
        if ksq == NO_SQUARE {
            return Bitboard::EMPTY;
        }
        let a = &self.ctx.attacks;
        let occupied = self.occupied();
        let mut blockers = Bitboard::EMPTY;
        for h in self.pieces_of(color.other(), PieceKind::Horse) {
            for dir in 0..4 {
                let leg = a.horse_leg[dir][h as usize];
                if leg != NO_SQUARE
                    && occupied.contains(leg)
                    && a.horse_jump[dir][h as usize].contains(ksq)
                {
                    blockers.set(leg);
                }
            }
        }
        blockers
    }

    // ------------------------------------------------------------------
    // Low-level board edits
    // ------------------------------------------------------------------

    pub(crate) fn put_piece(&mut self, sq: u8, piece: Piece) {
        debug_assert!(self.board[sq as usize].is_none(), "square already occupied");
        self.board[sq as usize] = Some(piece);
        self.by_kind[piece.kind.idx()].set(sq);
        self.by_color[piece.color.idx()].set(sq);
        self.key ^= self.ctx.zobrist.piece_key(piece, sq);
    }

    fn remove_piece(&mut self, sq: u8) -> Option<Piece> {
        let piece = self.board[sq as usize].take()?;
        self.by_kind[piece.kind.idx()].clear(sq);
        self.by_color[piece.color.idx()].clear(sq);
        self.key ^= self.ctx.zobrist.piece_key(piece, sq);
        Some(piece)
    }

    pub(crate) fn set_pocket(&mut self, color: Color, kind: PieceKind, count: u8) {
        let z = &self.ctx.zobrist;
        let slot = &mut self.pockets[color.idx()][kind.idx()];
        self.key ^= z.pocket_key(color, kind, *slot) ^ z.pocket_key(color, kind, count);
        *slot = count;
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.key ^= self.ctx.zobrist.side_to_move;
            self.side_to_move = color;
        }
    }

    pub(crate) fn set_game_ply(&mut self, ply: u32) {
        self.game_ply = ply;
    }

    /// Recomputes derived state after a setup.
    pub(crate) fn refresh(&mut self) {
        self.key = self.compute_key();
        self.update_check_info();
    }

    /// Zobrist key computed from scratch.
    pub fn compute_key(&self) -> u64 {
        let z = &self.ctx.zobrist;
        let mut key = 0u64;
        for sq in 0..NUM_SQUARES as u8 {
            if let Some(piece) = self.piece_at(sq) {
                key ^= z.piece_key(piece, sq);
            }
        }
        for color in Color::ALL {
            for kind in PieceKind::DROPPABLE {
                key ^= z.pocket_key(color, kind, self.pocket(color, kind));
            }
        }
        if self.side_to_move == Color::Black {
            key ^= z.side_to_move;
        }
        key
    }

    // ------------------------------------------------------------------
    // Make / unmake
    // ------------------------------------------------------------------

    /// Applies a move assumed to be legal.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let prev_key = self.key;
        let prev_checkers = self.checkers;
        let prev_blockers = self.blockers;
        let prev_pockets = self.pockets;

        self.history.push(prev_key);

        let mut captured = None;
        let moved = match mv {
            Move::Drop { kind, to } => {
                let count = self.pocket(us, kind);
                debug_assert!(count > 0, "drop from an empty pocket");
                self.set_pocket(us, kind, count - 1);
                self.put_piece(to, Piece::new(us, kind));
                kind
            }
            Move::Normal { from, to } | Move::Promotion { from, to, .. } => {
                if let Some(cap) = self.remove_piece(to) {
                    debug_assert!(cap.kind != PieceKind::King, "king capture");
                    let count = self.pocket(us, cap.kind);
                    self.set_pocket(us, cap.kind, count + 1);
                    captured = Some(cap);
                }
                let piece = self.remove_piece(from).expect("no piece on from-square");
                self.put_piece(to, piece);
                // The pawn's key on the last rank is zero, so only the
                // promoted piece changes the key.
                if let Move::Promotion { kind, .. } = mv {
                    self.remove_piece(to);
                    self.put_piece(to, Piece::new(us, kind));
                }
                piece.kind
            }
        };

        self.key ^= self.ctx.zobrist.side_to_move;
        self.side_to_move = us.other();
        self.game_ply = self.game_ply.wrapping_add(1);
        self.update_check_info();

        Undo {
            captured,
            moved,
            key: prev_key,
            checkers: prev_checkers,
            blockers: prev_blockers,
            pockets: prev_pockets,
            key_after: self.key,
        }
    }

    /// Takes back `mv`. `undo` must come from the matching `make_move`.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        debug_assert_eq!(
            self.key, undo.key_after,
            "unmake_move called out of order"
        );

        let us = self.side_to_move.other();
        self.side_to_move = us;
        self.game_ply = self.game_ply.wrapping_sub(1);

        match mv {
            Move::Drop { to, .. } => {
                self.remove_piece(to);
            }
            Move::Normal { from, to } | Move::Promotion { from, to, .. } => {
                self.remove_piece(to);
                self.put_piece(from, Piece::new(us, undo.moved));
                if let Some(cap) = undo.captured {
                    self.put_piece(to, cap);
                }
            }
        }

        self.pockets = undo.pockets;
        self.key = undo.key;
        self.checkers = undo.checkers;
        self.blockers = undo.blockers;
        self.history.pop();
    }

    /// Applies `mv` after checking it against the legal move list.
    pub fn play(&mut self, mv: Move) -> Result<Undo> {
        if !movegen::legal_moves(self).contains(&mv) {
            return Err(Error::IllegalMove(format!("{mv} in {self}")));
        }
        Ok(self.make_move(mv))
    }

    // ------------------------------------------------------------------
    // Game state
    // ------------------------------------------------------------------

    /// True if the current position occurred earlier in this line of play.
    pub fn is_repetition(&self) -> bool {
        self.history.contains(&self.key)
    }

    /// Occurrences of the current position, the current one included.
    pub fn repetition_count(&self) -> usize {
        1 + self.history.iter().filter(|&&k| k == self.key).count()
    }

    /// Any recurrence within the line is a draw. `_ply` is accepted for
    /// callers passing the search ply and does not bound the lookback.
    #[inline]
    pub fn is_draw(&self, _ply: u32) -> bool {
        self.is_repetition()
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Terminal state of the position, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_repetition() {
            return Some(Outcome::Repetition);
        }
        let mut tmp = self.clone();
        if movegen::has_legal_move(&mut tmp) {
            return None;
        }
        let us = self.side_to_move;
        if self.in_check() {
            Some(Outcome::Checkmate { winner: us.other() })
        } else {
            Some(Outcome::Stalemate { winner: us })
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Returns the first rule violation as [`Error::InvalidPosition`].
    pub fn validate(&self) -> Result<()> {
        for color in Color::ALL {
            match self.pieces_of(color, PieceKind::King).popcount() {
                0 => return Err(invalid(format!("{color:?} has no king"))),
                1 => {}
                n => return Err(invalid(format!("{color:?} has {n} kings"))),
            }
        }

        let them = self.side_to_move.other();
        if self.is_attacked_by(self.king_sq(them), self.side_to_move) {
            return Err(invalid(format!(
                "{them:?} is in check but not to move"
            )));
        }

        for color in Color::ALL {
            let rank = Bitboard::rank(color.promotion_rank());
            if !(self.pieces_of(color, PieceKind::Pawn) & rank).is_empty() {
                return Err(invalid(format!(
                    "{color:?} pawn on its promotion rank"
                )));
            }
        }

        let in_pockets: u32 = self
            .pockets
            .iter()
            .flat_map(|p| p.iter())
            .map(|&n| n as u32)
            .sum();
        let total = self.occupied().popcount() + in_pockets;
        if total > MAX_PIECES {
            return Err(invalid(format!(
                "{total} pieces in play, at most {MAX_PIECES} allowed"
            )));
        }
        debug_assert!(in_pockets as usize <= POCKET_LIMIT);
        Ok(())
    }

    /// Checks that bitboards, mailbox, key and check info agree.
    pub fn is_consistent(&self) -> bool {
        let white = self.by_color[0];
        let black = self.by_color[1];
        if !(white & black).is_empty() {
            return false;
        }
        let occupied = white | black;

        let mut union = Bitboard::EMPTY;
        for kind in PieceKind::ALL {
            let bb = self.pieces(kind);
            if !(union & bb).is_empty() {
                return false;
            }
            union |= bb;
        }
        if union != occupied {
            return false;
        }

        for sq in 0..NUM_SQUARES as u8 {
            let expected = self.piece_at(sq);
            let actual = if occupied.contains(sq) {
                let color = if white.contains(sq) {
                    Color::White
                } else {
                    Color::Black
                };
                PieceKind::ALL
                    .into_iter()
                    .find(|&k| self.pieces(k).contains(sq))
                    .map(|kind| Piece::new(color, kind))
            } else {
                None
            };
            if expected != actual {
                return false;
            }
        }

        if Color::ALL
            .iter()
            .any(|&c| self.pieces_of(c, PieceKind::King).popcount() != 1)
        {
            return false;
        }
        if self.pockets.iter().any(|p| p[PieceKind::King.idx()] != 0) {
            return false;
        }

        let mut fresh = self.clone();
        fresh.refresh();
        fresh.key == self.key && fresh.checkers == self.checkers && fresh.blockers == self.blockers
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidPosition(msg)
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
