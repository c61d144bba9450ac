use super::*;
use chess::MoveGen;
use std::str::FromStr;

#[test]
fn test_zobrist_keys_unique() {
    // Verify that piece keys are unique (no collisions in small sample)
    let mut seen = std::collections::HashSet::new();

    for color in 0..2 {
        for piece in 0..6 {
            for sq in 0..64 {
                let key = ZOBRIST.pieces[color][piece][sq];
                assert!(seen.insert(key), "Duplicate Zobrist key found");
            }
        }
    }

    // Check side to move
    assert!(
        seen.insert(ZOBRIST.side_to_move),
        "Side to move key collision"
    );

    // Check castling
    for i in 0..4 {
        assert!(seen.insert(ZOBRIST.castling[i]), "Castling key collision");
    }

    // Check en passant
    for i in 0..8 {
        assert!(
            seen.insert(ZOBRIST.en_passant[i]),
            "En passant key collision"
        );
    }
}

#[test]
fn test_full_hash_deterministic() {
    let board = Board::default();
    assert_eq!(full_hash(&board), full_hash(&board));

    let other = Board::from_str("8/8/8/4k3/8/8/4K3/8 w - - 0 1").unwrap();
    assert_ne!(full_hash(&board), full_hash(&other));
}

#[test]
fn test_side_to_move_changes_hash() {
    let white = Board::from_str("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let black = Board::from_str("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    assert_ne!(full_hash(&white), full_hash(&black));
}

/// Walk every legal move of `board`, checking that the incremental update
/// matches a full rehash of the resulting position.
fn assert_incremental_matches(board: &Board) {
    let h = full_hash(board);
    for mv in MoveGen::new_legal(board) {
        let after = board.make_move_new(mv);
        assert_eq!(
            update_hash(h, board, mv, &after),
            full_hash(&after),
            "incremental hash diverged on {mv}"
        );
    }
}

#[test]
fn test_incremental_matches_full_startpos() {
    assert_incremental_matches(&Board::default());
}

#[test]
fn test_incremental_matches_full_castling() {
    // Both sides may castle either way
    let board =
        Board::from_str("r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R3K2R w KQkq - 0 1")
            .unwrap();
    assert_incremental_matches(&board);
}

#[test]
fn test_incremental_matches_full_en_passant() {
    // White can capture d5 en passant with the c5 or e5 pawn
    let board = Board::from_str("rnbqkbnr/pp2pppp/8/2PpP3/8/8/PP1P1PPP/RNBQKBNR w KQkq d6 0 4")
        .unwrap();
    assert_incremental_matches(&board);
}

#[test]
fn test_incremental_matches_full_promotion() {
    // White pawn on b7 can promote, also by capturing on a8/c8
    let board = Board::from_str("r1b1k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert_incremental_matches(&board);
}

#[test]
fn test_incremental_matches_over_a_game() {
    // Italian opening with a short castle: a multi-move round trip
    let mut board = Board::default();
    let mut h = full_hash(&board);
    for uci in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"] {
        let mv = ChessMove::from_str(uci).unwrap();
        let after = board.make_move_new(mv);
        h = update_hash(h, &board, mv, &after);
        board = after;
        assert_eq!(h, full_hash(&board), "diverged after {uci}");
    }
}
