//! The four-phase MCTS loop: select, expand one child, evaluate the new
//! leaf statically, backpropagate.
//!
//! There are no random rollouts. A leaf is scored by the evaluation
//! strategy and the centipawn score is squashed through tanh so values
//! stay in [-1, 1] regardless of material imbalance. The chosen move is
//! the most-visited root child.

use chess::MoveGen;
use log::debug;

use engine_core::{Engine, GameState, SearchLimits, SearchResult};
use evaluation::Evaluator;

use crate::tree::Tree;

/// Iterations to run when neither a node nor a time budget is given.
const DEFAULT_ITERATIONS: u64 = 4_000;

/// Centipawn scale of the tanh squash, matching the evaluation output
/// scale so +400cp maps to a value of tanh(1).
const VALUE_SCALE: f64 = 400.0;

/// Monte Carlo tree searcher over any evaluation strategy.
pub struct MctsEngine<E: Evaluator> {
    eval: E,
    name: String,
}

impl<E: Evaluator> MctsEngine<E> {
    pub fn new(eval: E) -> Self {
        let name = format!("Ferrite MCTS ({})", eval.name());
        Self { eval, name }
    }

    /// One iteration. Returns the ply depth the simulation reached.
    fn simulate(&mut self, tree: &mut Tree, state: &mut GameState) -> u8 {
        let mut id = 0;
        let mut depth: u8 = 0;

        // Selection: descend fully expanded nodes by UCT
        while tree.node(id).untried.is_empty()
            && tree.node(id).terminal.is_none()
            && !tree.node(id).children.is_empty()
        {
            id = tree.select_child(id);
            if let Some(mv) = tree.node(id).mv {
                state.make_move(mv);
                depth = depth.saturating_add(1);
            }
        }

        // Expansion and evaluation
        let value = if let Some(v) = tree.node(id).terminal {
            v
        } else if let Some(mv) = tree.node_mut(id).untried.pop() {
            state.make_move(mv);
            depth = depth.saturating_add(1);
            id = tree.add_child(id, mv, state);
            match tree.node(id).terminal {
                Some(v) => v,
                None => self.leaf_value(state),
            }
        } else {
            // Ongoing node with neither children nor untried moves
            // cannot exist
            debug_assert!(false, "selection reached an inconsistent node");
            0.0
        };

        tree.backpropagate(id, value);

        for _ in 0..depth {
            state.undo_last_move();
        }
        depth
    }

    /// Static evaluation of the position just moved into, squashed to
    /// [-1, 1] from the perspective of the player who moved there.
    fn leaf_value(&mut self, state: &GameState) -> f64 {
        self.eval.reset(state.board());
        let cp = self.eval.evaluate(state.board());
        -(f64::from(cp) / VALUE_SCALE).tanh()
    }
}

/// Inverse of the tanh squash, for reporting a centipawn score.
fn value_to_centipawns(value: f64) -> i32 {
    let clamped = value.clamp(-0.999_999, 0.999_999);
    (clamped.atanh() * VALUE_SCALE).round() as i32
}

impl<E: Evaluator> Engine for MctsEngine<E> {
    fn search(&mut self, state: &GameState, limits: SearchLimits) -> SearchResult {
        limits.start();

        let mut state = state.clone();
        if MoveGen::new_legal(state.board()).next().is_none() {
            return SearchResult::no_moves();
        }

        let mut tree = Tree::new(&state);
        let max_iterations = limits.nodes.unwrap_or(if limits.move_time.is_some() {
            u64::MAX
        } else {
            DEFAULT_ITERATIONS
        });

        let mut iterations: u64 = 0;
        let mut max_depth: u8 = 0;
        let mut stopped = false;
        while iterations < max_iterations {
            // Always complete one iteration so a best move exists even
            // under a degenerate time budget
            let tc = &limits.time_control;
            if iterations > 0 && tc.should_check_time(iterations) && tc.check_time() {
                stopped = true;
                break;
            }
            max_depth = max_depth.max(self.simulate(&mut tree, &mut state));
            iterations += 1;
        }

        let best = match tree.most_visited_root_child() {
            Some(id) => id,
            None => return SearchResult::no_moves(),
        };
        let best_node = tree.node(best);
        let score = value_to_centipawns(best_node.mean_value());
        debug!(
            "mcts iterations {iterations} tree {} depth {max_depth} score {score}",
            tree.len()
        );

        SearchResult {
            best_move: best_node.mv,
            score,
            depth: max_depth,
            nodes: iterations,
            stopped,
            pv: tree.principal_line(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
