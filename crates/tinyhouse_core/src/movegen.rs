use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::*;

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut moves);
    moves
}

/// Generate legal moves into `out`, reusing its allocation.
///
/// `pos` is only borrowed mutably to simulate moves; it is left unchanged.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    generate_pseudo_legal(pos, out);

    let filter = LegalityFilter::new(pos);
    out.retain(|&mv| filter.is_legal(pos, mv));
}

/// True if the side to move has at least one legal move.
pub fn has_legal_move(pos: &mut Position) -> bool {
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_legal(pos, &mut moves);
    let filter = LegalityFilter::new(pos);
    moves.into_iter().any(|mv| filter.is_legal(pos, mv))
}

/// Check info captured once per generation.
struct LegalityFilter {
    us: Color,
    in_check: bool,
    king_sq: u8,
    blockers: Bitboard,
}

impl LegalityFilter {
    fn new(pos: &Position) -> Self {
        let us = pos.side_to_move();
        LegalityFilter {
            us,
            in_check: pos.in_check(),
            king_sq: pos.king_sq(us),
            blockers: pos.blockers_for_king(us),
        }
    }

    fn is_legal(&self, pos: &mut Position, mv: Move) -> bool {
        // Out of check a drop only adds occupancy and a move can only expose
        // the king by vacating a horse leg.
        let may_expose = self.in_check
            || match mv.from() {
                Some(from) => from == self.king_sq || self.blockers.contains(from),
                None => false,
            };
        if !may_expose {
            return true;
        }

        let undo = pos.make_move(mv);
        let ksq = pos.king_sq(self.us);
        let legal = !pos.is_attacked_by(ksq, self.us.other());
        pos.unmake_move(mv, undo);
        legal
    }
}

/// Pseudo-legal moves: board moves first, then drops.
pub fn generate_pseudo_legal(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let own = pos.color_bb(us);
    let them = pos.color_bb(us.other());
    let occupied = pos.occupied();
    let attacks = &pos.context().attacks;

    for from in own {
        let Some(piece) = pos.piece_at(from) else {
            continue;
        };
        match piece.kind {
            PieceKind::Pawn => {
                if let Some(to) = sq(file_of(from), rank_of(from) + us.forward()) {
                    if !occupied.contains(to) {
                        push_pawn_move(us, from, to, out);
                    }
                }
                for to in attacks.pawn(us, from) & them {
                    push_pawn_move(us, from, to, out);
                }
            }
            _ => {
                for to in attacks.attacks(piece, from, occupied) & !own {
                    out.push(Move::Normal { from, to });
                }
            }
        }
    }

    let empty = !occupied;
    for kind in PieceKind::DROPPABLE {
        if pos.pocket(us, kind) == 0 {
            continue;
        }
        let mut targets = empty;
        if kind == PieceKind::Pawn {
            targets &= !Bitboard::rank(us.promotion_rank());
        }
        for to in targets {
            out.push(Move::Drop { kind, to });
        }
    }
}

fn push_pawn_move(us: Color, from: u8, to: u8, out: &mut Vec<Move>) {
    if rank_of(to) == us.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            out.push(Move::Promotion { from, to, kind });
        }
    } else {
        out.push(Move::Normal { from, to });
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
