pub mod moves;
pub mod state;
pub mod time_control;
pub mod zobrist;

// Re-export the shared engine plumbing (not search-specific)
pub use moves::*;
pub use state::*;
pub use time_control::*;
pub use zobrist::{full_hash, update_hash, ZOBRIST};

use chess::ChessMove;

// =============================================================================
// Engine trait — implemented by all search backends (alpha-beta, MCTS, ...)
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<ChessMove>,
    /// Evaluation score in centipawns from the side to move's perspective
    pub score: i32,
    /// Search depth reached (deepest fully completed iteration)
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Whether search was stopped early by the time or node budget
    pub stopped: bool,
    /// Principal variation, best line first move included
    pub pv: Vec<ChessMove>,
}

impl SearchResult {
    /// An empty result for positions with no legal moves.
    pub fn no_moves() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            stopped: false,
            pv: Vec::new(),
        }
    }
}

/// Trait that all search backends must implement.
///
/// This allows swapping between the classical alpha-beta searcher and the
/// MCTS searcher (and boxing either behind the UCI layer) without the
/// protocol code knowing which one it drives.
pub trait Engine: Send {
    /// Search the position with the given limits.
    ///
    /// # Arguments
    /// * `state` - Game state including the move history needed for
    ///   repetition detection
    /// * `limits` - Search limits (depth, time, nodes)
    ///
    /// # Returns
    /// SearchResult containing best move, score, and statistics
    fn search(&mut self, state: &GameState, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name for UCI identification
    fn name(&self) -> &str;

    /// Returns the engine's author for UCI identification
    fn author(&self) -> &str {
        "Ferrite developers"
    }

    /// Reset internal state for a new game (clear hash tables, history, etc.)
    fn new_game(&mut self) {}

    /// Optional: Set a UCI option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
