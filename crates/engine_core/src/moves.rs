//! Move classification helpers shared by ordering, evaluation, and state.
//!
//! The board collaborator treats moves as opaque (from, to, promotion)
//! triples; the helpers here recover the capture/quiet classification the
//! search and evaluator need, including the en-passant special case where
//! the captured pawn does not sit on the destination square.

use chess::{Board, ChessMove, Piece, Square};

/// Returns the square and kind of the piece captured by `mv`, if any.
///
/// Handles en passant: a pawn moving diagonally to an empty square captures
/// the pawn beside its destination.
pub fn capture_target(board: &Board, mv: ChessMove) -> Option<(Square, Piece)> {
    if let Some(victim) = board.piece_on(mv.get_dest()) {
        return Some((mv.get_dest(), victim));
    }
    let moved = board.piece_on(mv.get_source())?;
    if moved == Piece::Pawn && mv.get_source().get_file() != mv.get_dest().get_file() {
        let sq = Square::make_square(mv.get_source().get_rank(), mv.get_dest().get_file());
        return Some((sq, Piece::Pawn));
    }
    None
}

/// True if `mv` captures a piece (including en passant).
#[inline]
pub fn is_capture(board: &Board, mv: ChessMove) -> bool {
    capture_target(board, mv).is_some()
}

/// True if `mv` is a quiet move: no capture and no promotion.
#[inline]
pub fn is_quiet(board: &Board, mv: ChessMove) -> bool {
    mv.get_promotion().is_none() && !is_capture(board, mv)
}

/// If `mv` castles, returns the rook's (from, to) squares.
///
/// A king moving two files can only be a castle; the rook jumps from the
/// corner to the square the king crossed.
pub fn castle_rook_squares(board: &Board, mv: ChessMove) -> Option<(Square, Square)> {
    if board.piece_on(mv.get_source()) != Some(Piece::King) {
        return None;
    }
    let from_file = mv.get_source().get_file().to_index() as i8;
    let to_file = mv.get_dest().get_file().to_index() as i8;
    if (from_file - to_file).abs() != 2 {
        return None;
    }
    let rank = mv.get_source().get_rank();
    Some(if to_file > from_file {
        (
            Square::make_square(rank, chess::File::H),
            Square::make_square(rank, chess::File::F),
        )
    } else {
        (
            Square::make_square(rank, chess::File::A),
            Square::make_square(rank, chess::File::D),
        )
    })
}

#[cfg(test)]
#[path = "moves_tests.rs"]
mod moves_tests;
