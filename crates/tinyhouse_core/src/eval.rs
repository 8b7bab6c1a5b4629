use crate::{board::Position, types::*};

/// Material value of a piece kind. Pocketed pieces count the same as pieces
/// on the board.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Horse => 200,
        PieceKind::Ferz => 200,
        PieceKind::Wazir => 300,
        PieceKind::King => 0,
    }
}

pub fn evaluate(pos: &Position) -> i32 {
    // Simple material evaluation from side-to-move perspective
    let mut score = 0i32;
    for sq in 0..NUM_SQUARES as u8 {
        if let Some(pc) = pos.piece_at(sq) {
            let v = piece_value(pc.kind);
            score += if pc.color == Color::White { v } else { -v };
        }
    }
    for kind in PieceKind::DROPPABLE {
        let v = piece_value(kind);
        score += v * pos.pocket(Color::White, kind) as i32;
        score -= v * pos.pocket(Color::Black, kind) as i32;
    }
    // Convert to side-to-move
    if pos.side_to_move() == Color::White {
        score
    } else {
        -score
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
