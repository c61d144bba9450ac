use super::*;

use std::str::FromStr;

use chess::{MoveGen, Square};

fn mv(s: &str) -> ChessMove {
    ChessMove::from_str(s).unwrap()
}

#[test]
fn test_hash_move_is_ranked_first() {
    let board = Board::default();
    let orderer = MoveOrderer::new();
    let tt_move = mv("g1f3");

    let mut moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
    orderer.order(&board, &mut moves, Some(tt_move), 0);
    assert_eq!(moves[0], tt_move);
}

#[test]
fn test_cheap_attacker_beats_expensive_attacker_on_same_victim() {
    // Black pawn on d5 capturable by the e4 pawn or the d1 rook
    let board = Board::from_str("k7/8/8/3p4/4P3/8/8/K2R4 w - - 0 1").unwrap();
    let orderer = MoveOrderer::new();

    let pawn_takes = orderer.score_move(&board, mv("e4d5"), None, 0);
    let rook_takes = orderer.score_move(&board, mv("d1d5"), None, 0);
    assert!(pawn_takes > rook_takes);
}

#[test]
fn test_fat_victim_beats_thin_victim() {
    // White pawn e4 can take a queen on d5 or a pawn on f5
    let board = Board::from_str("k7/8/8/3q1p2/4P3/8/8/K7 w - - 0 1").unwrap();
    let orderer = MoveOrderer::new();

    let takes_queen = orderer.score_move(&board, mv("e4d5"), None, 0);
    let takes_pawn = orderer.score_move(&board, mv("e4f5"), None, 0);
    assert!(takes_queen > takes_pawn);
}

#[test]
fn test_any_capture_outranks_killers_and_quiets() {
    let board = Board::from_str("k7/8/8/3p4/4P3/8/8/K2R4 w - - 0 1").unwrap();
    let mut orderer = MoveOrderer::new();
    orderer.on_beta_cutoff(&board, mv("d1d2"), 0, 6);

    let capture = orderer.score_move(&board, mv("e4d5"), None, 0);
    let killer = orderer.score_move(&board, mv("d1d2"), None, 0);
    let quiet = orderer.score_move(&board, mv("a1b1"), None, 0);
    assert!(capture > killer);
    assert!(killer > quiet);
}

#[test]
fn test_killer_slots_shift_most_recent_first() {
    let board = Board::default();
    let mut orderer = MoveOrderer::new();
    orderer.on_beta_cutoff(&board, mv("b1c3"), 2, 4);
    orderer.on_beta_cutoff(&board, mv("g1f3"), 2, 4);

    let first = orderer.score_move(&board, mv("g1f3"), None, 2);
    let second = orderer.score_move(&board, mv("b1c3"), None, 2);
    assert!(first > second);

    // Killers are per ply
    assert_eq!(orderer.score_move(&board, mv("g1f3"), None, 3), 0);

    // Re-storing the same killer must not duplicate it into both slots
    orderer.on_beta_cutoff(&board, mv("g1f3"), 2, 4);
    assert!(orderer.score_move(&board, mv("b1c3"), None, 2) > 0);
}

#[test]
fn test_capture_cutoff_leaves_killers_alone() {
    let board = Board::from_str("k7/8/8/3p4/4P3/8/8/K2R4 w - - 0 1").unwrap();
    let mut orderer = MoveOrderer::new();
    orderer.on_beta_cutoff(&board, mv("e4d5"), 0, 6);

    // Still scored as a capture, not as a killer at another ply
    assert_eq!(orderer.score_move(&board, mv("e4d5"), None, 5), 100_000 + 900);
}

#[test]
fn test_history_accumulates_and_decays() {
    let board = Board::default();
    let mut orderer = MoveOrderer::new();
    orderer.on_beta_cutoff(&board, mv("e2e3"), 1, 4);
    orderer.on_beta_cutoff(&board, mv("e2e3"), 5, 2);

    // History is keyed by (side, piece, destination), not by ply
    assert_eq!(orderer.score_move(&board, mv("e2e3"), None, 9), 16 + 4);

    orderer.new_search();
    assert_eq!(orderer.score_move(&board, mv("e2e3"), None, 9), 10);
}

#[test]
fn test_promotions_rank_with_captures() {
    let board = Board::from_str("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let orderer = MoveOrderer::new();

    let promo = ChessMove::new(Square::A7, Square::A8, Some(chess::Piece::Queen));
    let quiet = mv("a1b1");
    assert!(orderer.score_move(&board, promo, None, 0) > 80_000);
    assert!(orderer.score_move(&board, quiet, None, 0) < 80_000);
}
