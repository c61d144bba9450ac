//! Input feature indexing for the network.
//!
//! One input per (piece color, piece kind, square) triple: 2 × 6 × 64 = 768.
//! Each perspective sees the board from its own side: the black perspective
//! swaps piece colors and flips squares vertically, so a white knight on g1
//! looks to Black exactly like a black knight on g8 looks to White.

use chess::{Color, Piece, Square};

/// Number of input features per perspective.
pub const FEATURES: usize = 768;

/// Index of the input feature for `piece` of `color` on `sq`, as seen from
/// `perspective`.
#[inline]
pub fn feature_index(perspective: Color, color: Color, piece: Piece, sq: Square) -> usize {
    let (color_idx, sq_idx) = if perspective == Color::White {
        (color.to_index(), sq.to_index())
    } else {
        (1 - color.to_index(), sq.to_index() ^ 56)
    };
    64 * (piece.to_index() + 6 * color_idx) + sq_idx
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod features_tests;
