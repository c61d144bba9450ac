//! NNUE-style evaluation strategy.
//!
//! Two accumulators are maintained per position, one per perspective, so
//! the output layer always has a "side to move" half and a "side not to
//! move" half regardless of whose turn it is. `apply_move` copies the top
//! accumulator pair and applies the move's feature deltas; `undo_move`
//! pops the copy, which makes undo an exact inverse by construction.

pub mod accumulator;
pub mod features;
pub mod network;
pub mod weights;

pub use network::{Network, EVAL_SCALE, HIDDEN, QA, QB};
pub use weights::WeightsError;

use std::path::Path;
use std::sync::Arc;

use chess::{Board, ChessMove, Color, Piece};

use engine_core::moves::{capture_target, castle_rook_squares};

use crate::Evaluator;
use accumulator::Accumulator;
use features::feature_index;

const PERSPECTIVES: [Color; 2] = [Color::White, Color::Black];

pub struct NnueEval {
    /// Shared read-only parameter blob.
    net: Arc<Network>,
    /// One accumulator pair per position on the current search path,
    /// indexed [white perspective, black perspective]. The top is current.
    stack: Vec<[Accumulator; 2]>,
}

impl NnueEval {
    pub fn new(net: Arc<Network>) -> Self {
        Self {
            net,
            stack: Vec::with_capacity(128),
        }
    }

    /// Load weights from disk and build an evaluator around them.
    /// Fails fast on any format or dimension mismatch.
    pub fn from_file(path: &Path) -> Result<Self, WeightsError> {
        Ok(Self::new(Arc::new(Network::load(path)?)))
    }

    /// The shared network, for constructing sibling evaluators.
    pub fn network(&self) -> Arc<Network> {
        Arc::clone(&self.net)
    }

    #[inline]
    fn top(&self) -> &[Accumulator; 2] {
        self.stack.last().expect("evaluator used before reset")
    }
}

impl Evaluator for NnueEval {
    fn reset(&mut self, board: &Board) {
        self.stack.clear();
        self.stack.push([
            Accumulator::refresh(board, Color::White, &self.net),
            Accumulator::refresh(board, Color::Black, &self.net),
        ]);
    }

    fn apply_move(&mut self, board: &Board, mv: ChessMove) {
        let us = board.side_to_move();
        let moved = board
            .piece_on(mv.get_source())
            .expect("legal move starts on an occupied square");
        let placed = mv.get_promotion().unwrap_or(moved);
        let capture = capture_target(board, mv);
        let rook = castle_rook_squares(board, mv);

        let mut accs = *self.top();
        for (i, &persp) in PERSPECTIVES.iter().enumerate() {
            let acc = &mut accs[i];
            acc.remove_feature(feature_index(persp, us, moved, mv.get_source()), &self.net);
            acc.add_feature(feature_index(persp, us, placed, mv.get_dest()), &self.net);
            if let Some((sq, victim)) = capture {
                acc.remove_feature(feature_index(persp, !us, victim, sq), &self.net);
            }
            if let Some((rook_from, rook_to)) = rook {
                acc.remove_feature(feature_index(persp, us, Piece::Rook, rook_from), &self.net);
                acc.add_feature(feature_index(persp, us, Piece::Rook, rook_to), &self.net);
            }
        }
        self.stack.push(accs);
    }

    fn undo_move(&mut self) {
        self.stack.pop();
        debug_assert!(!self.stack.is_empty(), "undo_move underflowed reset state");
    }

    fn evaluate(&self, board: &Board) -> i32 {
        let accs = self.top();
        let stm = board.side_to_move().to_index();
        self.net.forward(&accs[stm], &accs[1 - stm])
    }

    fn name(&self) -> &'static str {
        "nnue"
    }
}
