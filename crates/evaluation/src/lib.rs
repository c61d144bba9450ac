//! Incremental position evaluation.
//!
//! Three interchangeable strategies behind one contract:
//! - [`MaterialEval`]: plain material counting
//! - [`PstEval`]: material plus phase-interpolated piece-square tables
//! - [`NnueEval`]: a sparse-input neural network with an incrementally
//!   maintained accumulator
//!
//! All three keep running internal state across moves so the search never
//! recomputes an evaluation from scratch while descending. `apply_move` and
//! `undo_move` are exact inverses: searching a branch and backtracking leaves
//! the evaluator bit-for-bit where it started. All arithmetic is integer
//! centipawns for cross-platform reproducibility.

pub mod material;
pub mod nnue;
pub mod pst;
pub mod tapered;

pub use material::MaterialEval;
pub use nnue::{NnueEval, WeightsError};
pub use pst::PstEval;

use chess::{Board, ChessMove};

/// Material values in centipawns, indexed by `Piece::to_index()`.
/// The king's value is zero: it is never off the board.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// The four-operation contract every evaluation strategy implements.
///
/// The searcher threads one evaluator down its recursion: `apply_move`
/// alongside every move it makes, `undo_move` alongside every backtrack.
/// `board` arguments are always the position the move is played *from*, so
/// captured pieces and castling rooks can be read off it.
pub trait Evaluator: Send {
    /// Build the internal accumulator from scratch. O(pieces on board).
    fn reset(&mut self, board: &Board);

    /// Update the accumulator for `mv` played from `board`.
    /// Touches only the 2-4 features the move changes.
    fn apply_move(&mut self, board: &Board, mv: ChessMove);

    /// Exact inverse of the most recent `apply_move`.
    fn undo_move(&mut self);

    /// Score in centipawns from the perspective of `board`'s side to move.
    /// `board` must be the position the accumulator currently describes.
    fn evaluate(&self, board: &Board) -> i32;

    /// Strategy name for logging and UCI output.
    fn name(&self) -> &'static str;
}
