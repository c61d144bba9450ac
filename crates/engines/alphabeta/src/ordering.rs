//! Move ordering heuristics.
//!
//! Ranks the legal moves at a node so the likeliest cutoff candidates are
//! searched first: hash move, then captures by most-valuable-victim /
//! least-valuable-attacker, then the two killer moves for this ply, then
//! quiet moves by history score. Ordering is a performance heuristic only;
//! any ordering yields the same search result.

use chess::{Board, ChessMove, Piece};

use engine_core::moves::{capture_target, is_quiet};

use crate::score::MAX_PLY;

/// Piece values for capture ordering. Distinct from evaluation values so
/// the king can rank as the least attractive attacker.
const ORDER_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 10_000];

const TT_MOVE: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 100_000;
const KILLER_FIRST: i32 = 90_000;
const KILLER_SECOND: i32 = 80_000;
const HISTORY_CAP: i32 = 75_000;

#[inline]
fn piece_value(piece: Piece) -> i32 {
    ORDER_VALUES[piece.to_index()]
}

pub struct MoveOrderer {
    /// Two killer slots per ply, most recent first
    killers: [[Option<ChessMove>; 2]; MAX_PLY],
    /// Cutoff statistics for quiet moves, by (side, piece, destination)
    history: [[[i32; 64]; 6]; 2],
}

impl MoveOrderer {
    pub fn new() -> Self {
        Self {
            killers: [[None; 2]; MAX_PLY],
            history: [[[0; 64]; 6]; 2],
        }
    }

    /// Start a new search: clear killers (ply meanings change between
    /// searches) and halve history so old statistics fade rather than
    /// dominate forever.
    pub fn new_search(&mut self) {
        self.killers = [[None; 2]; MAX_PLY];
        for side in self.history.iter_mut() {
            for piece in side.iter_mut() {
                for score in piece.iter_mut() {
                    *score /= 2;
                }
            }
        }
    }

    /// Record a quiet move that caused a beta cutoff.
    pub fn on_beta_cutoff(&mut self, board: &Board, mv: ChessMove, ply: usize, depth: u8) {
        if !is_quiet(board, mv) {
            return;
        }
        if self.killers[ply][0] != Some(mv) {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = Some(mv);
        }
        if let Some(piece) = board.piece_on(mv.get_source()) {
            let side = board.side_to_move().to_index();
            let dest = mv.get_dest().to_index();
            let bonus = i32::from(depth) * i32::from(depth);
            let slot = &mut self.history[side][piece.to_index()][dest];
            *slot = (*slot + bonus).min(HISTORY_CAP);
        }
    }

    /// Priority of `mv` at this node. Higher is searched earlier.
    pub fn score_move(
        &self,
        board: &Board,
        mv: ChessMove,
        tt_move: Option<ChessMove>,
        ply: usize,
    ) -> i32 {
        if tt_move == Some(mv) {
            return TT_MOVE;
        }

        let capture = capture_target(board, mv);
        let promotion = mv.get_promotion();
        if capture.is_some() || promotion.is_some() {
            let mut score = CAPTURE_BASE;
            if let Some((_, victim)) = capture {
                let attacker = board
                    .piece_on(mv.get_source())
                    .map(piece_value)
                    .unwrap_or(0);
                score += 10 * piece_value(victim) - attacker;
            }
            if let Some(piece) = promotion {
                score += piece_value(piece);
            }
            return score;
        }

        if self.killers[ply][0] == Some(mv) {
            return KILLER_FIRST;
        }
        if self.killers[ply][1] == Some(mv) {
            return KILLER_SECOND;
        }

        match board.piece_on(mv.get_source()) {
            Some(piece) => {
                let side = board.side_to_move().to_index();
                self.history[side][piece.to_index()][mv.get_dest().to_index()]
            }
            None => 0,
        }
    }

    /// Sort `moves` best-first for this node.
    pub fn order(
        &self,
        board: &Board,
        moves: &mut [ChessMove],
        tt_move: Option<ChessMove>,
        ply: usize,
    ) {
        moves.sort_by_cached_key(|&mv| -self.score_move(board, mv, tt_move, ply));
    }

    /// Sort captures best-first by victim/attacker value (quiescence has
    /// no hash move or killers to consult).
    pub fn order_captures(&self, board: &Board, moves: &mut [ChessMove]) {
        moves.sort_by_cached_key(|&mv| {
            let victim = capture_target(board, mv)
                .map(|(_, p)| piece_value(p))
                .unwrap_or(0);
            let attacker = board
                .piece_on(mv.get_source())
                .map(piece_value)
                .unwrap_or(0);
            attacker - 10 * victim
        });
    }
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
