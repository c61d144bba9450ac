//! Game state for search: board history, repetition counts, and the
//! incrementally maintained position fingerprint.
//!
//! The board collaborator's `Board` is copy-make (applying a move yields a
//! new board), so undo restores the previous copy. What the collaborator
//! does not track — the fifty-move clock and position repetition — is
//! maintained here, keyed by our own Zobrist fingerprint.

use std::collections::HashMap;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Piece, EMPTY};

use crate::moves::is_capture;
use crate::zobrist::{full_hash, update_hash};

/// Undo information for a single move
#[derive(Debug, Clone, Copy)]
struct UndoInfo {
    prev_board: Board,
    prev_hash: u64,
    prev_halfmove: u8,
}

/// Terminal status of the current position, draws included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    Draw,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Current board position
    board: Board,
    /// Fingerprint of the current position, updated incrementally
    hash: u64,
    /// Halfmoves since the last capture or pawn move (fifty-move rule)
    halfmove_clock: u8,
    /// Stack of undo information, one frame per move made
    undo_stack: Vec<UndoInfo>,
    /// A map counting the number of times each position was seen so far,
    /// for the threefold repetition rule.
    seen_positions: HashMap<u64, u8>,
}

impl GameState {
    pub fn from_board(board: Board) -> Self {
        let hash = full_hash(&board);
        let mut seen_positions = HashMap::with_capacity(128);
        seen_positions.insert(hash, 1);
        Self {
            board,
            hash,
            halfmove_clock: 0,
            undo_stack: Vec::with_capacity(128),
            seen_positions,
        }
    }

    /// Build a state from a FEN string. Fails on malformed positions so the
    /// caller can reject the request instead of searching garbage.
    pub fn from_fen(fen: &str) -> Result<Self, chess::Error> {
        let mut state = Self::from_board(Board::from_str(fen)?);
        // The board parser drops the halfmove-clock field, so pick it up
        // here or fifty-move draws would start from zero mid-game.
        state.halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|field| field.parse::<u32>().ok())
            .map_or(0, |clock| clock.min(u8::MAX as u32) as u8);
        Ok(state)
    }

    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Fingerprint of the current position.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Number of moves made on this state (for mate distance calculation)
    #[inline(always)]
    pub fn ply(&self) -> usize {
        self.undo_stack.len()
    }

    /// Make a move, updating fingerprint, repetition counts, and the
    /// fifty-move clock. Returns how many times the resulting position has
    /// now been seen.
    #[inline]
    pub fn make_move(&mut self, mv: ChessMove) -> u8 {
        self.undo_stack.push(UndoInfo {
            prev_board: self.board,
            prev_hash: self.hash,
            prev_halfmove: self.halfmove_clock,
        });

        let is_pawn_move = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);
        let resets_clock = is_pawn_move || is_capture(&self.board, mv);

        let after = self.board.make_move_new(mv);
        self.hash = update_hash(self.hash, &self.board, mv, &after);
        self.board = after;
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        let entry = self.seen_positions.entry(self.hash).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Undo the last move made through `make_move`.
    #[inline]
    pub fn undo_last_move(&mut self) {
        let undo = self
            .undo_stack
            .pop()
            .expect("undo_last_move without a matching make_move");

        if let Some(count) = self.seen_positions.get_mut(&self.hash) {
            *count -= 1;
            if *count == 0 {
                self.seen_positions.remove(&self.hash);
            }
        }

        self.board = undo.prev_board;
        self.hash = undo.prev_hash;
        self.halfmove_clock = undo.prev_halfmove;
    }

    /// True if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    /// True if the current position has occurred three or more times.
    #[inline]
    pub fn is_repetition_draw(&self) -> bool {
        self.seen_positions.get(&self.hash).copied().unwrap_or(0) >= 3
    }

    /// True if a hundred halfmoves passed without a capture or pawn move.
    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// True if neither side can possibly deliver mate: no pawns, rooks, or
    /// queens, and at most one minor piece on the board.
    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        if *board.pieces(Piece::Pawn) != EMPTY
            || *board.pieces(Piece::Rook) != EMPTY
            || *board.pieces(Piece::Queen) != EMPTY
        {
            return false;
        }
        let minors = board.pieces(Piece::Knight).popcnt() + board.pieces(Piece::Bishop).popcnt();
        minors <= 1
    }

    /// Terminal status query, draws included.
    pub fn status(&self) -> GameStatus {
        match self.board.status() {
            BoardStatus::Checkmate => GameStatus::Checkmate,
            BoardStatus::Stalemate => GameStatus::Stalemate,
            BoardStatus::Ongoing => {
                if self.is_repetition_draw()
                    || self.is_fifty_move_draw()
                    || self.is_insufficient_material()
                {
                    GameStatus::Draw
                } else {
                    GameStatus::Ongoing
                }
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_board(Board::default())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
