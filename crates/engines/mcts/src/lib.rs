//! Statistics-driven searcher: UCT-guided Monte Carlo tree search with
//! static leaf evaluation instead of random rollouts. An alternative to
//! the alpha-beta searcher behind the same engine interface.

mod search;
mod tree;

pub use search::MctsEngine;
pub use tree::Tree;
