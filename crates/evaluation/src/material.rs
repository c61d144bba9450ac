//! Material-counting evaluation strategy.
//!
//! The simplest strategy: fixed piece values, no positional terms. It still
//! runs through the tapered machinery (with identical midgame and endgame
//! values, so the blend is the identity) and is maintained incrementally
//! like the others.

use chess::{Board, ChessMove, Color, Piece, Square};

use crate::tapered::{accumulate, apply_delta, to_move_perspective, Tapered, Term};
use crate::{Evaluator, PIECE_VALUES};

fn material_term(_color: Color, piece: Piece, _sq: Square) -> Term {
    let v = PIECE_VALUES[piece.to_index()];
    (v, v)
}

#[derive(Debug, Clone, Default)]
pub struct MaterialEval {
    /// One frame per move applied since `reset`; the top is current.
    stack: Vec<Tapered>,
}

impl MaterialEval {
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

impl Evaluator for MaterialEval {
    fn reset(&mut self, board: &Board) {
        self.stack.clear();
        self.stack.push(accumulate(board, &material_term));
    }

    fn apply_move(&mut self, board: &Board, mv: ChessMove) {
        let next = apply_delta(self.top(), board, mv, &material_term);
        self.stack.push(next);
    }

    fn undo_move(&mut self) {
        self.stack.pop();
        debug_assert!(!self.stack.is_empty(), "undo_move underflowed reset state");
    }

    fn evaluate(&self, board: &Board) -> i32 {
        to_move_perspective(self.top().blend(), board)
    }

    fn name(&self) -> &'static str {
        "material"
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod material_tests;
