use super::*;
use std::str::FromStr;

fn unit_term(_c: Color, _p: Piece, _s: Square) -> Term {
    (100, 200)
}

#[test]
fn test_blend_endpoints() {
    // Full phase material: pure midgame
    let opening = Tapered {
        mg: 100,
        eg: 200,
        phase: TOTAL_PHASE,
    };
    assert_eq!(opening.blend(), 100);

    // No phase material left: pure endgame
    let ending = Tapered {
        mg: 100,
        eg: 200,
        phase: 0,
    };
    assert_eq!(ending.blend(), 200);
}

#[test]
fn test_blend_midpoint() {
    let halfway = Tapered {
        mg: 0,
        eg: 256,
        phase: TOTAL_PHASE / 2,
    };
    // Endgame weight at half material is 128 (with rounding)
    assert_eq!(halfway.blend(), 128);
}

#[test]
fn test_startpos_phase_is_total() {
    let total = accumulate(&Board::default(), &unit_term);
    assert_eq!(total.phase, TOTAL_PHASE);
    // 16 pieces per side with a symmetric term: white-perspective sum is zero
    assert_eq!(total.mg, 0);
    assert_eq!(total.eg, 0);
}

#[test]
fn test_apply_delta_matches_accumulate() {
    // Covers a capture and a castle in one short line
    let mut board =
        Board::from_str("r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let mut total = accumulate(&board, &unit_term);

    for uci in ["e1g1", "c6d4", "f3d4", "c5d4", "e3d4"] {
        let mv: ChessMove = uci.parse().unwrap();
        total = apply_delta(total, &board, mv, &unit_term);
        board = board.make_move_new(mv);
        assert_eq!(total, accumulate(&board, &unit_term), "diverged after {uci}");
    }
}

#[test]
fn test_en_passant_delta() {
    let board = Board::from_str("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
        .unwrap();
    let ep: ChessMove = "e5d6".parse().unwrap();
    let total = apply_delta(accumulate(&board, &unit_term), &board, ep, &unit_term);
    assert_eq!(total, accumulate(&board.make_move_new(ep), &unit_term));
}

#[test]
fn test_promotion_delta_updates_phase() {
    let board = Board::from_str("8/1P2k3/8/8/8/8/4K3/8 w - - 0 1").unwrap();
    let promo: ChessMove = "b7b8q".parse().unwrap();
    let before = accumulate(&board, &unit_term);
    assert_eq!(before.phase, 0);
    let after = apply_delta(before, &board, promo, &unit_term);
    assert_eq!(after.phase, QUEEN_PHASE);
    assert_eq!(after, accumulate(&board.make_move_new(promo), &unit_term));
}
