//! Shared machinery for the two table-based strategies: running
//! (midgame, endgame, phase) sums maintained incrementally, blended at
//! score time by the game-phase formula.
//!
//! Phase is measured in points of non-pawn material still on the board
//! (knight 1, bishop 1, rook 2, queen 4, 24 total). The endgame weight
//! scales that to 0..=256, so evaluation slides smoothly from the midgame
//! tables to the endgame tables as material comes off.

use chess::{Board, ChessMove, Color, Piece, Square, ALL_SQUARES};

use engine_core::moves::{capture_target, castle_rook_squares};

pub const KNIGHT_PHASE: i32 = 1;
pub const BISHOP_PHASE: i32 = 1;
pub const ROOK_PHASE: i32 = 2;
pub const QUEEN_PHASE: i32 = 4;
pub const TOTAL_PHASE: i32 =
    KNIGHT_PHASE * 4 + BISHOP_PHASE * 4 + ROOK_PHASE * 4 + QUEEN_PHASE * 2;

/// Phase points a piece contributes while on the board.
#[inline]
pub fn piece_phase(piece: Piece) -> i32 {
    match piece {
        Piece::Knight => KNIGHT_PHASE,
        Piece::Bishop => BISHOP_PHASE,
        Piece::Rook => ROOK_PHASE,
        Piece::Queen => QUEEN_PHASE,
        Piece::Pawn | Piece::King => 0,
    }
}

/// A (midgame, endgame) contribution of one piece on one square, from
/// White's perspective before the color sign is applied.
pub type Term = (i32, i32);

/// Running white-perspective sums plus remaining phase material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tapered {
    pub mg: i32,
    pub eg: i32,
    /// Non-pawn phase points still on the board (both colors), 0..=24
    pub phase: i32,
}

/// Endgame weight for a number of phase points still on the board:
/// `((TOTAL - present) * 256 + TOTAL/2) / TOTAL`, 0 with full material,
/// 256 with none.
#[inline]
pub fn endgame_weight(present: i32) -> i32 {
    let present = present.clamp(0, TOTAL_PHASE);
    ((TOTAL_PHASE - present) * 256 + TOTAL_PHASE / 2) / TOTAL_PHASE
}

impl Tapered {
    /// Blend midgame and endgame sums by the current phase.
    pub fn blend(&self) -> i32 {
        let weight = endgame_weight(self.phase);
        (self.mg * (256 - weight) + self.eg * weight) / 256
    }
}

/// Full O(pieces) accumulation of `term` over the board.
pub fn accumulate(board: &Board, term: &impl Fn(Color, Piece, Square) -> Term) -> Tapered {
    let mut total = Tapered::default();
    for &sq in ALL_SQUARES.iter() {
        if let Some(piece) = board.piece_on(sq) {
            let color = board
                .color_on(sq)
                .expect("occupied square has a piece color");
            add_piece(&mut total, color, piece, sq, term);
        }
    }
    total
}

/// Advance the running sums across one legal move played from `board`.
/// The inverse is simply restoring the previous copy (the strategies keep
/// a stack of `Tapered` values).
pub fn apply_delta(
    mut total: Tapered,
    board: &Board,
    mv: ChessMove,
    term: &impl Fn(Color, Piece, Square) -> Term,
) -> Tapered {
    let us = board.side_to_move();
    let moved = board
        .piece_on(mv.get_source())
        .expect("legal move starts on an occupied square");
    let placed = mv.get_promotion().unwrap_or(moved);

    remove_piece(&mut total, us, moved, mv.get_source(), term);
    add_piece(&mut total, us, placed, mv.get_dest(), term);

    if let Some((sq, victim)) = capture_target(board, mv) {
        remove_piece(&mut total, !us, victim, sq, term);
    }
    if let Some((rook_from, rook_to)) = castle_rook_squares(board, mv) {
        remove_piece(&mut total, us, Piece::Rook, rook_from, term);
        add_piece(&mut total, us, Piece::Rook, rook_to, term);
    }
    total
}

#[inline]
fn add_piece(
    total: &mut Tapered,
    color: Color,
    piece: Piece,
    sq: Square,
    term: &impl Fn(Color, Piece, Square) -> Term,
) {
    let (mg, eg) = term(color, piece, sq);
    let sign = if color == Color::White { 1 } else { -1 };
    total.mg += sign * mg;
    total.eg += sign * eg;
    total.phase += piece_phase(piece);
}

#[inline]
fn remove_piece(
    total: &mut Tapered,
    color: Color,
    piece: Piece,
    sq: Square,
    term: &impl Fn(Color, Piece, Square) -> Term,
) {
    let (mg, eg) = term(color, piece, sq);
    let sign = if color == Color::White { 1 } else { -1 };
    total.mg -= sign * mg;
    total.eg -= sign * eg;
    total.phase -= piece_phase(piece);
}

/// Orient a white-perspective score to the side to move.
#[inline]
pub fn to_move_perspective(score: i32, board: &Board) -> i32 {
    if board.side_to_move() == Color::White {
        score
    } else {
        -score
    }
}

#[cfg(test)]
#[path = "tapered_tests.rs"]
mod tapered_tests;
