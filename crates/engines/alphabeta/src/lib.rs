//! Classical searcher: negamax with alpha-beta pruning, a transposition
//! table, killer/history move ordering, and quiescence, driven by
//! iterative deepening with aspiration windows. Generic over the
//! evaluation strategy.

mod ordering;
mod score;
mod search;
mod tt;

pub use ordering::MoveOrderer;
pub use score::{is_mate_score, mate_in, INF, MATE_SCORE, MATE_THRESHOLD};
pub use search::AlphaBetaEngine;
pub use tt::{Bound, Entry, TranspositionTable, DEFAULT_HASH_MB};
