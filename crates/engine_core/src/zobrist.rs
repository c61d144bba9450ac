//! Zobrist hashing for chess positions.
//!
//! Zobrist hashing enables incremental hash updates during make/unmake moves,
//! reducing hash computation from O(64) to O(1) per move. This is critical
//! for efficient repetition detection and transposition tables.
//!
//! The hash is computed by XOR-ing together random values for:
//! - Each piece on each square (12 pieces × 64 squares = 768 values)
//! - Side to move (1 value)
//! - Castling rights (4 values)
//! - En passant file (8 values)

use chess::{Board, ChessMove, Color, File, Piece, Square, ALL_SQUARES};

use crate::moves::castle_rook_squares;

/// Pre-computed random values for Zobrist hashing.
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Random values for each piece on each square.
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    /// Random value for black to move (XOR when black's turn)
    pub side_to_move: u64,
    /// Random values for castling rights [wk, wq, bk, bq]
    pub castling: [u64; 4],
    /// Random values for en passant file (0-7)
    pub en_passant: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Generate Zobrist keys using a simple PRNG with fixed seed.
    /// Uses xorshift64 for fast, reproducible random numbers.
    pub const fn new() -> Self {
        // Simple xorshift64 PRNG
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x123456789ABCDEF0u64; // Fixed seed

        // Generate piece keys
        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][piece][sq] = state;
                    sq += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        // Generate side to move key
        state = xorshift64(state);
        let side_to_move = state;

        // Generate castling keys
        let mut castling = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        // Generate en passant keys
        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    /// Get the Zobrist key for a piece of a given color on a square.
    #[inline(always)]
    pub fn piece_key(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color.to_index()][piece.to_index()][sq.to_index()]
    }

    /// Get the Zobrist key for en passant on a file.
    #[inline(always)]
    pub fn ep_key(&self, file: File) -> u64 {
        self.en_passant[file.to_index()]
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// XOR of the castling-right keys currently set on `board`.
#[inline]
fn castling_hash(board: &Board) -> u64 {
    let mut h = 0u64;
    let white = board.castle_rights(Color::White);
    let black = board.castle_rights(Color::Black);
    if white.has_kingside() {
        h ^= ZOBRIST.castling[0];
    }
    if white.has_queenside() {
        h ^= ZOBRIST.castling[1];
    }
    if black.has_kingside() {
        h ^= ZOBRIST.castling[2];
    }
    if black.has_queenside() {
        h ^= ZOBRIST.castling[3];
    }
    h
}

/// Compute the fingerprint of a position from scratch. O(64).
pub fn full_hash(board: &Board) -> u64 {
    let mut h = 0u64;
    for &sq in ALL_SQUARES.iter() {
        if let Some(piece) = board.piece_on(sq) {
            let color = board
                .color_on(sq)
                .expect("occupied square has a piece color");
            h ^= ZOBRIST.piece_key(color, piece, sq);
        }
    }
    if board.side_to_move() == Color::Black {
        h ^= ZOBRIST.side_to_move;
    }
    h ^= castling_hash(board);
    if let Some(ep) = board.en_passant() {
        h ^= ZOBRIST.ep_key(ep.get_file());
    }
    h
}

/// Advance a fingerprint across one legal move without rehashing the board.
///
/// `before` is the position the move is played from, `after` the resulting
/// position. Both are needed only for O(1) field reads (castling rights and
/// en-passant file); the piece deltas come from the move itself. The result
/// equals `full_hash(after)` for every legal move.
pub fn update_hash(prev: u64, before: &Board, mv: ChessMove, after: &Board) -> u64 {
    let mut h = prev;
    let us = before.side_to_move();
    let src = mv.get_source();
    let dst = mv.get_dest();
    let moved = before
        .piece_on(src)
        .expect("legal move starts on an occupied square");

    // Moved piece leaves its square; its (possibly promoted) kind lands.
    h ^= ZOBRIST.piece_key(us, moved, src);
    let placed = mv.get_promotion().unwrap_or(moved);
    h ^= ZOBRIST.piece_key(us, placed, dst);

    if let Some(victim) = before.piece_on(dst) {
        h ^= ZOBRIST.piece_key(!us, victim, dst);
    } else if moved == Piece::Pawn && src.get_file() != dst.get_file() {
        // En passant: the captured pawn sits beside the destination square.
        let captured_sq = Square::make_square(src.get_rank(), dst.get_file());
        h ^= ZOBRIST.piece_key(!us, Piece::Pawn, captured_sq);
    }

    // Castling moves the rook as well.
    if let Some((rook_from, rook_to)) = castle_rook_squares(before, mv) {
        h ^= ZOBRIST.piece_key(us, Piece::Rook, rook_from);
        h ^= ZOBRIST.piece_key(us, Piece::Rook, rook_to);
    }

    // Castling rights and en passant: XOR out the old state, XOR in the new.
    h ^= castling_hash(before) ^ castling_hash(after);
    if let Some(ep) = before.en_passant() {
        h ^= ZOBRIST.ep_key(ep.get_file());
    }
    if let Some(ep) = after.en_passant() {
        h ^= ZOBRIST.ep_key(ep.get_file());
    }
    h ^= ZOBRIST.side_to_move;
    h
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
