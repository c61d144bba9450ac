//! Tapered piece-square-table evaluation strategy.
//!
//! Material plus a per-square positional bonus, with separate midgame and
//! endgame tables blended by the game phase. Tables are written the way
//! they are usually printed, eighth rank first, so White indexes them
//! through a vertical flip (`to_index() ^ 56`) and Black directly.
//!
//! On top of the incrementally maintained tables, a handful of structural
//! terms are computed at score time: pawn structure, the bishop pair,
//! rooks on open files, a pawn shield around the king, and bonuses for
//! driving a bare king to the edge in won endgames.

use chess::{BitBoard, Board, ChessMove, Color, Piece, Square, EMPTY};

use crate::tapered::{
    accumulate, apply_delta, endgame_weight, to_move_perspective, Tapered, Term,
};
use crate::{Evaluator, PIECE_VALUES};

#[rustfmt::skip]
const PAWN_PST_MG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_PST_EG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     80,  80,  80,  80,  80,  80,  80,  80,
     50,  50,  50,  50,  50,  50,  50,  50,
     30,  30,  30,  30,  30,  30,  30,  30,
     20,  20,  20,  20,  20,  20,  20,  20,
     10,  10,  10,  10,  10,  10,  10,  10,
     10,  10,  10,  10,  10,  10,  10,  10,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST_MG: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const QUEEN_PST_EG: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_PST_MG: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_PST_EG: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];

/// Midgame and endgame table pair for one piece kind.
#[inline]
fn tables(piece: Piece) -> (&'static [i32; 64], &'static [i32; 64]) {
    match piece {
        Piece::Pawn => (&PAWN_PST_MG, &PAWN_PST_EG),
        Piece::Knight => (&KNIGHT_PST, &KNIGHT_PST),
        Piece::Bishop => (&BISHOP_PST, &BISHOP_PST),
        Piece::Rook => (&ROOK_PST, &ROOK_PST),
        Piece::Queen => (&QUEEN_PST_MG, &QUEEN_PST_EG),
        Piece::King => (&KING_PST_MG, &KING_PST_EG),
    }
}

fn pst_term(color: Color, piece: Piece, sq: Square) -> Term {
    let idx = if color == Color::White {
        sq.to_index() ^ 56
    } else {
        sq.to_index()
    };
    let v = PIECE_VALUES[piece.to_index()];
    let (mg_table, eg_table) = tables(piece);
    (v + mg_table[idx], v + eg_table[idx])
}

const BISHOP_PAIR_BONUS: i32 = 50;
const ROOK_OPEN_FILE_BONUS: i32 = 25;
const ROOK_SEMI_OPEN_FILE_BONUS: i32 = 15;
const PASSED_PAWN_BONUS: [i32; 8] = [0, 10, 20, 40, 70, 120, 200, 0];
const DOUBLED_PAWN_PENALTY: i32 = -15;
const ISOLATED_PAWN_PENALTY: i32 = -20;
const KING_SHIELD_BONUS: i32 = 10;
const KING_PROXIMITY_BONUS: i32 = 10;
const EDGE_RESTRICTION_BONUS: i32 = 30;
const MOBILITY_RESTRICTION_BONUS: i32 = 5;

/// Past this endgame weight the pawn shield stops mattering.
const SHIELD_WEIGHT_LIMIT: i32 = 180;
/// Endgame weight at which the king-driving bonuses switch on.
const KING_DRIVE_WEIGHT: i32 = 200;
/// Endgame weight at which restricting the bare king's mobility counts.
const MOBILITY_WEIGHT: i32 = 210;

#[inline]
fn pawns_of(board: &Board, color: Color) -> BitBoard {
    board.pieces(Piece::Pawn) & board.color_combined(color)
}

#[inline]
fn king_square(board: &Board, color: Color) -> Square {
    (board.pieces(Piece::King) & board.color_combined(color)).to_square()
}

/// No enemy pawn ahead on this or an adjacent file.
fn is_passed(board: &Board, color: Color, sq: Square) -> bool {
    let rank = sq.get_rank().to_index();
    let ahead = match color {
        Color::White => !0u64 << ((rank + 1) * 8),
        Color::Black => (1u64 << (rank * 8)) - 1,
    };
    let lanes = chess::get_file(sq.get_file()) | chess::get_adjacent_files(sq.get_file());
    pawns_of(board, !color) & lanes & BitBoard(ahead) == EMPTY
}

fn pawn_structure(board: &Board, color: Color) -> i32 {
    let own = pawns_of(board, color);
    let mut score = 0;
    for sq in own {
        let rel_rank = match color {
            Color::White => sq.get_rank().to_index(),
            Color::Black => 7 - sq.get_rank().to_index(),
        };
        if is_passed(board, color, sq) {
            score += PASSED_PAWN_BONUS[rel_rank];
        }
        if (own & chess::get_file(sq.get_file())).popcnt() > 1 {
            score += DOUBLED_PAWN_PENALTY;
        }
        if own & chess::get_adjacent_files(sq.get_file()) == EMPTY {
            score += ISOLATED_PAWN_PENALTY;
        }
    }
    score
}

fn bishop_pair(board: &Board, color: Color) -> i32 {
    let bishops = board.pieces(Piece::Bishop) & board.color_combined(color);
    if bishops.popcnt() >= 2 {
        BISHOP_PAIR_BONUS
    } else {
        0
    }
}

fn rook_files(board: &Board, color: Color) -> i32 {
    let own_pawns = pawns_of(board, color);
    let enemy_pawns = pawns_of(board, !color);
    let mut score = 0;
    for sq in board.pieces(Piece::Rook) & board.color_combined(color) {
        let file = chess::get_file(sq.get_file());
        if own_pawns & file == EMPTY {
            score += if enemy_pawns & file == EMPTY {
                ROOK_OPEN_FILE_BONUS
            } else {
                ROOK_SEMI_OPEN_FILE_BONUS
            };
        }
    }
    score
}

/// Friendly pawns on the squares around the king.
fn pawn_shield(board: &Board, color: Color) -> i32 {
    let shield = chess::get_king_moves(king_square(board, color));
    (shield & pawns_of(board, color)).popcnt() as i32 * KING_SHIELD_BONUS
}

/// A queen, a rook, a pawn, or two minors can force mate.
fn has_mating_material(board: &Board, color: Color) -> bool {
    let own = board.color_combined(color);
    let minors = (board.pieces(Piece::Knight) | board.pieces(Piece::Bishop)) & own;
    board.pieces(Piece::Queen) & own != EMPTY
        || board.pieces(Piece::Rook) & own != EMPTY
        || board.pieces(Piece::Pawn) & own != EMPTY
        || minors.popcnt() >= 2
}

#[inline]
fn bare_king(board: &Board, color: Color) -> bool {
    board.color_combined(color).popcnt() == 1
}

#[inline]
fn manhattan(a: Square, b: Square) -> i32 {
    let df = (a.get_file().to_index() as i32 - b.get_file().to_index() as i32).abs();
    let dr = (a.get_rank().to_index() as i32 - b.get_rank().to_index() as i32).abs();
    df + dr
}

#[inline]
fn edge_distance(sq: Square) -> i32 {
    let file = sq.get_file().to_index() as i32;
    let rank = sq.get_rank().to_index() as i32;
    file.min(7 - file).min(rank.min(7 - rank))
}

/// Once one side is a bare king facing mating material, reward walking
/// the attacking king in, cornering the defender, and taking its flight
/// squares away. Gives the search a gradient toward mate that the tables
/// alone cannot.
fn king_drive(board: &Board, weight: i32) -> i32 {
    if weight < KING_DRIVE_WEIGHT {
        return 0;
    }
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        if !has_mating_material(board, color) || !bare_king(board, !color) {
            continue;
        }
        let attacker = king_square(board, color);
        let defender = king_square(board, !color);
        let mut bonus = (7 - manhattan(attacker, defender).min(7)) * KING_PROXIMITY_BONUS;
        bonus += (3 - edge_distance(defender)) * EDGE_RESTRICTION_BONUS;
        if weight >= MOBILITY_WEIGHT {
            let escapes = (chess::get_king_moves(defender) & !board.combined()).popcnt() as i32;
            bonus += (8 - escapes) * MOBILITY_RESTRICTION_BONUS;
        }
        score += if color == Color::White { bonus } else { -bonus };
    }
    score
}

/// Structural terms the tables cannot see, from White's perspective.
fn structure(board: &Board, weight: i32) -> i32 {
    let mut score = pawn_structure(board, Color::White) - pawn_structure(board, Color::Black)
        + bishop_pair(board, Color::White)
        - bishop_pair(board, Color::Black)
        + rook_files(board, Color::White)
        - rook_files(board, Color::Black);
    if weight <= SHIELD_WEIGHT_LIMIT {
        let shield = pawn_shield(board, Color::White) - pawn_shield(board, Color::Black);
        score += shield * (256 - weight) / 256;
    }
    score + king_drive(board, weight)
}

#[derive(Debug, Clone, Default)]
pub struct PstEval {
    stack: Vec<Tapered>,
}

impl PstEval {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn top(&self) -> Tapered {
        *self
            .stack
            .last()
            .expect("evaluator used before reset")
    }
}

impl Evaluator for PstEval {
    fn reset(&mut self, board: &Board) {
        self.stack.clear();
        self.stack.push(accumulate(board, &pst_term));
    }

    fn apply_move(&mut self, board: &Board, mv: ChessMove) {
        let next = apply_delta(self.top(), board, mv, &pst_term);
        self.stack.push(next);
    }

    fn undo_move(&mut self) {
        self.stack.pop();
        debug_assert!(!self.stack.is_empty(), "undo_move underflowed reset state");
    }

    fn evaluate(&self, board: &Board) -> i32 {
        let acc = self.top();
        let score = acc.blend() + structure(board, endgame_weight(acc.phase));
        to_move_perspective(score, board)
    }

    fn name(&self) -> &'static str {
        "pst"
    }
}

#[cfg(test)]
#[path = "pst_tests.rs"]
mod pst_tests;
