use super::*;
use std::str::FromStr;

fn sq(s: &str) -> Square {
    Square::from_str(s).unwrap()
}

#[test]
fn test_indices_cover_range_without_collision() {
    let mut seen = vec![false; FEATURES];
    for color in [Color::White, Color::Black] {
        for piece in chess::ALL_PIECES {
            for s in chess::ALL_SQUARES {
                let idx = feature_index(Color::White, color, piece, s);
                assert!(idx < FEATURES);
                assert!(!seen[idx], "collision at {idx}");
                seen[idx] = true;
            }
        }
    }
    assert!(seen.iter().all(|&b| b));
}

#[test]
fn test_perspective_symmetry() {
    // A white knight on g1 seen by White equals a black knight on g8 seen
    // by Black.
    assert_eq!(
        feature_index(Color::White, Color::White, Piece::Knight, sq("g1")),
        feature_index(Color::Black, Color::Black, Piece::Knight, sq("g8")),
    );
    // And vice versa for the opposing piece
    assert_eq!(
        feature_index(Color::White, Color::Black, Piece::Queen, sq("d8")),
        feature_index(Color::Black, Color::White, Piece::Queen, sq("d1")),
    );
}

#[test]
fn test_white_perspective_layout() {
    // White pawn on a1 from the white perspective is feature 0
    assert_eq!(
        feature_index(Color::White, Color::White, Piece::Pawn, sq("a1")),
        0
    );
    // Black king on h8 from the white perspective is the last feature
    assert_eq!(
        feature_index(Color::White, Color::Black, Piece::King, sq("h8")),
        FEATURES - 1
    );
}
