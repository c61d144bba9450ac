//! Arena-backed search tree.
//!
//! Nodes live in one flat `Vec` and refer to each other by index, so the
//! tree grows by pushing and never reallocates node-by-node. Each node's
//! statistics are stored from the perspective of the player who made the
//! move into it: that is the player choosing between siblings during
//! selection, so UCT can compare children directly.

use chess::{ChessMove, MoveGen};

use engine_core::{GameState, GameStatus};

/// UCT exploration constant.
const EXPLORATION: f64 = 1.4;

pub struct Node {
    /// Move that led here; `None` only for the root.
    pub mv: Option<ChessMove>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Legal moves not yet expanded into children.
    pub untried: Vec<ChessMove>,
    pub visits: u32,
    /// Sum of simulation values in [-1, 1], from the perspective of the
    /// player who moved into this node.
    pub value_sum: f64,
    /// Fixed value for terminal positions: +1 the mover delivered mate,
    /// 0 a draw. `None` while the game is ongoing here.
    pub terminal: Option<f64>,
}

impl Node {
    fn new(mv: Option<ChessMove>, parent: Option<usize>, state: &GameState) -> Self {
        let (untried, terminal) = match state.status() {
            GameStatus::Ongoing => (MoveGen::new_legal(state.board()).collect(), None),
            GameStatus::Checkmate => (Vec::new(), Some(1.0)),
            GameStatus::Stalemate | GameStatus::Draw => (Vec::new(), Some(0.0)),
        };
        Self {
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            value_sum: 0.0,
            terminal,
        }
    }

    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / f64::from(self.visits)
        }
    }

    /// UCT priority of this node among its siblings. Unvisited nodes get
    /// infinite priority so every child is tried once before any is
    /// revisited.
    fn uct(&self, parent_visits: u32) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let exploration =
            EXPLORATION * (f64::from(parent_visits).ln() / f64::from(self.visits)).sqrt();
        self.mean_value() + exploration
    }
}

pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A fresh tree rooted at `state`'s current position.
    pub fn new(state: &GameState) -> Self {
        Self {
            nodes: vec![Node::new(None, None, state)],
        }
    }

    #[inline]
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: usize) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Append a child of `parent` reached by `mv`; `state` must already
    /// have `mv` applied.
    pub fn add_child(&mut self, parent: usize, mv: ChessMove, state: &GameState) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(mv), Some(parent), state));
        self.nodes[parent].children.push(id);
        id
    }

    /// Child of `id` with the highest UCT priority.
    pub fn select_child(&self, id: usize) -> usize {
        let parent_visits = self.nodes[id].visits;
        self.nodes[id]
            .children
            .iter()
            .copied()
            .max_by(|&a, &b| {
                self.nodes[a]
                    .uct(parent_visits)
                    .total_cmp(&self.nodes[b].uct(parent_visits))
            })
            .expect("select_child on a childless node")
    }

    /// Root child with the most visits. Visit count is more robust to
    /// evaluation noise than the highest mean value.
    pub fn most_visited_root_child(&self) -> Option<usize> {
        self.nodes[0]
            .children
            .iter()
            .copied()
            .max_by_key(|&c| self.nodes[c].visits)
    }

    /// Most-visited line from the root, for reporting.
    pub fn principal_line(&self) -> Vec<ChessMove> {
        let mut line = Vec::new();
        let mut id = 0;
        while let Some(next) = self.nodes[id]
            .children
            .iter()
            .copied()
            .max_by_key(|&c| self.nodes[c].visits)
        {
            match self.nodes[next].mv {
                Some(mv) => line.push(mv),
                None => break,
            }
            id = next;
        }
        line
    }

    /// Add one simulation result at `id` and propagate it to every
    /// ancestor, flipping the sign at each ply.
    pub fn backpropagate(&mut self, id: usize, value: f64) {
        let mut v = value;
        let mut cur = Some(id);
        while let Some(i) = cur {
            self.nodes[i].visits += 1;
            self.nodes[i].value_sum += v;
            v = -v;
            cur = self.nodes[i].parent;
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
