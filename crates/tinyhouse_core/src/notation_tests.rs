use super::*;
use crate::board::STARTPOS;

fn parse_err(s: &str) -> Error {
    Position::from_notation(s).unwrap_err()
}

#[test]
fn test_startpos_round_trip() {
    let pos = Position::from_notation(STARTPOS).unwrap();
    assert_eq!(pos.to_notation(), STARTPOS);
    assert_eq!(pos, Position::startpos());
    assert_eq!(pos.piece_at(0), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(pos.piece_at(15), Some(Piece::new(Color::Black, PieceKind::King)));
    assert_eq!(pos.piece_at(11), Some(Piece::new(Color::Black, PieceKind::Pawn)));
}

#[test]
fn test_pockets_and_counter_round_trip() {
    let text = "k3/4/4/K3[Wp] b 7";
    let pos: Position = text.parse().unwrap();
    assert_eq!(pos.pocket(Color::White, PieceKind::Wazir), 1);
    assert_eq!(pos.pocket(Color::Black, PieceKind::Pawn), 1);
    assert_eq!(pos.side_to_move(), Color::Black);
    assert_eq!(pos.fullmove_number(), 7);
    assert_eq!(pos.game_ply(), 13);
    assert_eq!(pos.to_string(), text);
}

#[test]
fn test_pocket_order_is_normalized() {
    let pos = Position::from_notation("k3/4/4/K3[hPwFP] w 1").unwrap();
    assert_eq!(pos.to_notation(), "k3/4/4/K3[PPFwh] w 1");
    assert_eq!(pos.pocket(Color::White, PieceKind::Pawn), 2);
}

#[test]
fn test_counter_defaults_to_one() {
    let pos = Position::from_notation("k3/4/4/K3 w").unwrap();
    assert_eq!(pos.to_notation(), "k3/4/4/K3 w 1");
}

#[test]
fn test_largest_counters_round_trip() {
    for text in ["k3/4/4/K3 w 2147483648", "k3/4/4/K3 b 2147483648"] {
        let pos = Position::from_notation(text).unwrap();
        assert_eq!(pos.to_notation(), text);
    }
    let pos = Position::from_notation("k3/4/4/K3 b 2147483648").unwrap();
    assert_eq!(pos.game_ply(), u32::MAX);
}

#[test]
fn test_counter_overflow_is_parse_error() {
    for bad in [
        "k3/4/4/K3 w 2147483649",
        "k3/4/4/K3 b 4294967295",
        "k3/4/4/K3 w 4294967296",
    ] {
        assert!(
            matches!(Position::from_notation(bad), Err(Error::Parse(_))),
            "'{bad}' should be a parse error"
        );
    }
}

#[test]
fn test_parse_errors() {
    for bad in [
        "",
        "k3/4/4 w 1",
        "k3/4/4/K3/4 w 1",
        "k4/4/4/K3 w 1",
        "k2/4/4/K3 w 1",
        "k3/4/4/K0 w 1",
        "kx2/4/4/K3 w 1",
        "k3/4/4/K3 x 1",
        "k3/4/4/K3",
        "k3/4/4/K3 w 0",
        "k3/4/4/K3 w one",
        "k3/4/4/K3 w 1 extra",
        "k3/4/4/K3[P w 1",
        "k3/4/4/K3[K] w 1",
        "k3/4/4/K3[X] w 1",
    ] {
        assert!(
            matches!(Position::from_notation(bad), Err(Error::Parse(_))),
            "'{bad}' should be a parse error"
        );
    }
}

#[test]
fn test_invalid_positions() {
    for bad in [
        // Missing kings
        "4/4/4/K3 w 1",
        "k3/4/4/4 w 1",
        // Two white kings
        "k3/4/4/KK2 w 1",
        // Side not to move in check
        "k3/W3/K3/4 w 1",
        // Pawns on their promotion ranks
        "kP2/4/4/K3 w 1",
        "k3/4/4/K2p b 1",
        // Seventeen pieces
        "k3/4/4/K3[PPPPPPPPPPPPPPP] w 1",
    ] {
        assert!(
            matches!(parse_err(bad), Error::InvalidPosition(_)),
            "'{bad}' should be rejected as invalid"
        );
    }
}

#[test]
fn test_move_text() {
    let cases = [
        ("a1b2", Move::Normal { from: 0, to: 5 }),
        (
            "c3c4=W",
            Move::Promotion {
                from: 10,
                to: 14,
                kind: PieceKind::Wazir,
            },
        ),
        (
            "b2b1=H",
            Move::Promotion {
                from: 5,
                to: 1,
                kind: PieceKind::Horse,
            },
        ),
        (
            "P@c2",
            Move::Drop {
                kind: PieceKind::Pawn,
                to: 6,
            },
        ),
        (
            "F@d4",
            Move::Drop {
                kind: PieceKind::Ferz,
                to: 15,
            },
        ),
    ];
    for (text, mv) in cases {
        assert_eq!(Move::parse_text(text).unwrap(), mv, "{text}");
        assert_eq!(mv.to_string(), text);
        assert_eq!(text.parse::<Move>().unwrap(), mv);
    }
}

#[test]
fn test_bad_move_text() {
    for bad in [
        "", "a1", "a1a1", "a1e2", "a5a4", "a3a4=K", "a3a4=P", "a3a4W", "K@c2", "x@c2", "W@e1",
        "a1b2c", "é1b2",
    ] {
        assert!(
            matches!(Move::parse_text(bad), Err(Error::Parse(_))),
            "'{bad}' should not parse"
        );
    }
}

#[test]
fn test_parse_move_checks_legality() {
    let pos = Position::startpos();
    assert_eq!(parse_move(&pos, "a2a3").unwrap(), Move::Normal { from: 4, to: 8 });
    assert!(matches!(parse_move(&pos, "a2a4"), Err(Error::IllegalMove(_))));
    assert!(matches!(parse_move(&pos, "W@c2"), Err(Error::IllegalMove(_))));
    assert!(matches!(parse_move(&pos, "zz"), Err(Error::Parse(_))));
}
