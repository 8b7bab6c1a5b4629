use super::*;
use crate::types::coord_to_sq;

const TABLES: AttackTables = AttackTables::new();

fn sq(name: &str) -> u8 {
    coord_to_sq(name).unwrap()
}

#[test]
fn test_king_attacks() {
    // King in the corner sees 3 squares, on an inner square all 8
    assert_eq!(TABLES.king[sq("a1") as usize].popcount(), 3);
    assert_eq!(TABLES.king[sq("b2") as usize].popcount(), 8);
    assert_eq!(TABLES.king[sq("d2") as usize].popcount(), 5);
}

#[test]
fn test_step_pieces() {
    let ferz = TABLES.ferz[sq("a1") as usize];
    assert_eq!(ferz, Bitboard::from_square(sq("b2")));

    let wazir = TABLES.wazir[sq("a1") as usize];
    assert_eq!(
        wazir,
        Bitboard::from_square(sq("a2")) | Bitboard::from_square(sq("b1"))
    );
    assert_eq!(TABLES.wazir[sq("c3") as usize].popcount(), 4);
    assert_eq!(TABLES.ferz[sq("c3") as usize].popcount(), 4);
}

#[test]
fn test_pawn_attacks() {
    // White pawn on b2 attacks a3 and c3
    let attacks = TABLES.pawn(Color::White, sq("b2"));
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(sq("a3")));
    assert!(attacks.contains(sq("c3")));

    // Black pawn on a3 attacks only b2
    let attacks = TABLES.pawn(Color::Black, sq("a3"));
    assert_eq!(attacks, Bitboard::from_square(sq("b2")));

    // Nothing beyond the last rank
    assert!(TABLES.pawn(Color::White, sq("c4")).is_empty());
}

#[test]
fn test_horse_open_board() {
    let attacks = TABLES.horse(sq("a1"), Bitboard::EMPTY);
    assert_eq!(
        attacks,
        Bitboard::from_square(sq("b3")) | Bitboard::from_square(sq("c2"))
    );

    let attacks = TABLES.horse(sq("b2"), Bitboard::EMPTY);
    assert_eq!(attacks.popcount(), 4);
    for target in ["a4", "c4", "d1", "d3"] {
        assert!(attacks.contains(sq(target)), "b2 horse should reach {target}");
    }
}

#[test]
fn test_horse_leg_blocked() {
    // A piece on a2 blocks the northern leg of a horse on a1
    let occ = Bitboard::from_square(sq("a2"));
    assert_eq!(
        TABLES.horse(sq("a1"), occ),
        Bitboard::from_square(sq("c2"))
    );

    // Occupied targets do not block, only legs do
    let occ = Bitboard::from_square(sq("b3"));
    assert!(TABLES.horse(sq("a1"), occ).contains(sq("b3")));
}

#[test]
fn test_horse_attacks_not_symmetric() {
    // With a2 occupied, a1 cannot reach b3 but b3 still reaches a1 via b2
    let occ = Bitboard::from_square(sq("a2"));
    assert!(!TABLES.horse(sq("a1"), occ).contains(sq("b3")));
    assert!(TABLES.horse(sq("b3"), occ).contains(sq("a1")));
}

#[test]
fn test_attacks_dispatch() {
    let white_horse = Piece::new(Color::White, PieceKind::Horse);
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert_eq!(
        TABLES.attacks(white_horse, sq("b2"), Bitboard::EMPTY),
        TABLES.horse(sq("b2"), Bitboard::EMPTY)
    );
    assert_eq!(
        TABLES.attacks(black_pawn, sq("b3"), Bitboard::EMPTY),
        TABLES.pawn(Color::Black, sq("b3"))
    );
}

#[test]
fn test_distance() {
    assert_eq!(TABLES.distance(sq("a1"), sq("d4")), 3);
    assert_eq!(TABLES.distance(sq("a1"), sq("b3")), 2);
    assert_eq!(TABLES.distance(sq("c2"), sq("c2")), 0);
}
