//! Iterative-deepening negamax search with alpha-beta pruning.
//!
//! One recursive function serves both players by negating scores and
//! swapping the (alpha, beta) window at each ply. On top of that base:
//! principal variation search (zero-window tests for non-first moves),
//! a transposition table, aspiration windows between deepening passes,
//! and a quiescence extension at the horizon.
//!
//! Budget exhaustion is not an error. The recursion unwinds by returning
//! `None` from the node that noticed the clock, and the driver reports
//! the result of the last fully completed depth.

use chess::{ChessMove, MoveGen, EMPTY};
use log::debug;

use engine_core::{Engine, GameState, SearchLimits, SearchResult};
use evaluation::Evaluator;

use crate::ordering::MoveOrderer;
use crate::score::{is_mate_score, INF, MATE_SCORE, MAX_PLY};
use crate::tt::{Bound, TranspositionTable, DEFAULT_HASH_MB};

/// Initial half-width of the aspiration window, in centipawns.
const ASPIRATION_WINDOW: i32 = 50;
/// Window widening beyond this falls back to a full-width search.
const ASPIRATION_LIMIT: i32 = 1_000;

/// Alpha-beta searcher over any evaluation strategy.
pub struct AlphaBetaEngine<E: Evaluator> {
    eval: E,
    tt: TranspositionTable,
    orderer: MoveOrderer,
    name: String,
}

impl<E: Evaluator> AlphaBetaEngine<E> {
    pub fn new(eval: E) -> Self {
        Self::with_hash_mb(eval, DEFAULT_HASH_MB)
    }

    pub fn with_hash_mb(eval: E, mb: usize) -> Self {
        let name = format!("Ferrite AlphaBeta ({})", eval.name());
        Self {
            eval,
            tt: TranspositionTable::with_hash_mb(mb),
            orderer: MoveOrderer::new(),
            name,
        }
    }
}

impl<E: Evaluator> Engine for AlphaBetaEngine<E> {
    fn search(&mut self, state: &GameState, limits: SearchLimits) -> SearchResult {
        limits.start();

        let mut state = state.clone();
        if MoveGen::new_legal(state.board()).next().is_none() {
            return SearchResult::no_moves();
        }

        self.eval.reset(state.board());
        self.tt.new_search();
        self.orderer.new_search();

        let max_depth = limits.depth.clamp(1, (MAX_PLY - 1) as u8);
        let ctx = SearchContext {
            state: &mut state,
            eval: &mut self.eval,
            tt: &mut self.tt,
            orderer: &mut self.orderer,
            limits: &limits,
            nodes: 0,
            first_depth_done: false,
        };
        ctx.iterate(max_depth)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self) {
        self.tt.clear();
        self.orderer = MoveOrderer::new();
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        if name.eq_ignore_ascii_case("hash") {
            if let Ok(mb) = value.parse::<usize>() {
                self.tt.resize_mb(mb);
                return true;
            }
        }
        false
    }
}

/// Everything one search invocation mutates, borrowed from the engine so
/// the recursion threads a single exclusive context instead of ambient
/// state.
struct SearchContext<'a, E: Evaluator> {
    state: &'a mut GameState,
    eval: &'a mut E,
    tt: &'a mut TranspositionTable,
    orderer: &'a mut MoveOrderer,
    limits: &'a SearchLimits,
    nodes: u64,
    /// The depth-1 pass runs to completion whatever the budget says, so
    /// a position with legal moves always yields a best move.
    first_depth_done: bool,
}

impl<E: Evaluator> SearchContext<'_, E> {
    /// Deepening driver. Each pass seeds the next through the
    /// transposition table (ordering) and its score (aspiration window);
    /// a pass interrupted by the budget is discarded. Only the first pass
    /// is exempt from interruption, so there is always a move to report.
    fn iterate(mut self, max_depth: u8) -> SearchResult {
        let mut result = SearchResult::no_moves();
        let mut prev_score = None;

        for depth in 1..=max_depth {
            match self.aspiration(depth, prev_score) {
                Some((score, mv)) => {
                    self.first_depth_done = true;
                    prev_score = Some(score);
                    let pv = self.extract_pv(mv, depth);
                    debug!(
                        "depth {depth} score {score} nodes {} pv {}",
                        self.nodes,
                        pv.iter()
                            .map(|m| m.to_string())
                            .collect::<Vec<_>>()
                            .join(" ")
                    );
                    result = SearchResult {
                        best_move: Some(mv),
                        score,
                        depth,
                        nodes: self.nodes,
                        stopped: false,
                        pv,
                    };
                    // The first depth that sees a mate sees the shortest
                    // one; deeper passes cannot improve on it.
                    if is_mate_score(score) {
                        break;
                    }
                }
                None => {
                    result.stopped = true;
                    result.nodes = self.nodes;
                    break;
                }
            }
        }
        result
    }

    /// Search `depth` with a window centered on the previous pass's
    /// score, widening x4 on failure until full width.
    fn aspiration(&mut self, depth: u8, prev: Option<i32>) -> Option<(i32, ChessMove)> {
        let (mut alpha, mut beta) = match prev {
            Some(s) if depth >= 2 && !is_mate_score(s) => {
                (s - ASPIRATION_WINDOW, s + ASPIRATION_WINDOW)
            }
            _ => (-INF, INF),
        };
        let mut delta = ASPIRATION_WINDOW;

        loop {
            let (score, mv) = self.root(depth, alpha, beta)?;
            if score <= alpha {
                delta *= 4;
                alpha = if delta > ASPIRATION_LIMIT {
                    -INF
                } else {
                    score - delta
                };
            } else if score >= beta {
                delta *= 4;
                beta = if delta > ASPIRATION_LIMIT {
                    INF
                } else {
                    score + delta
                };
            } else {
                return Some((score, mv));
            }
        }
    }

    /// One full-depth pass over the root moves. Fail-soft: the returned
    /// score may fall outside the window, which aspiration uses to
    /// recenter.
    fn root(&mut self, depth: u8, mut alpha: i32, beta: i32) -> Option<(i32, ChessMove)> {
        let board = *self.state.board();
        let mut moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        let key = self.state.hash();
        let tt_move = self.tt.probe(key).and_then(|e| e.mv);
        self.orderer.order(&board, &mut moves, tt_move, 0);

        let alpha_orig = alpha;
        let mut best_score = -INF;
        let mut best_move = moves[0];
        for (i, &mv) in moves.iter().enumerate() {
            let score = self.search_child(depth, 0, i == 0, alpha, beta, mv)?;

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score <= alpha_orig {
            Bound::Upper
        } else {
            Bound::Exact
        };
        self.tt.store(key, depth, 0, best_score, bound, Some(best_move));
        Some((best_score, best_move))
    }

    fn negamax(&mut self, depth: u8, ply: usize, mut alpha: i32, mut beta: i32) -> Option<i32> {
        if depth == 0 {
            return self.quiescence(ply, alpha, beta);
        }

        self.nodes += 1;
        self.check_budget()?;

        if self.state.is_repetition_draw()
            || self.state.is_fifty_move_draw()
            || self.state.is_insufficient_material()
        {
            return Some(0);
        }
        if ply >= MAX_PLY {
            return Some(self.eval.evaluate(self.state.board()));
        }

        let key = self.state.hash();
        let alpha_orig = alpha;
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.mv;
            if entry.depth >= depth {
                let score = entry.score(ply);
                match entry.bound {
                    Bound::Exact => return Some(score),
                    Bound::Lower => alpha = alpha.max(score),
                    Bound::Upper => beta = beta.min(score),
                }
                if alpha >= beta {
                    return Some(score);
                }
            }
        }

        let board = *self.state.board();
        let mut moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        if moves.is_empty() {
            return Some(if *board.checkers() != EMPTY {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            });
        }
        self.orderer.order(&board, &mut moves, tt_move, ply);

        let mut best_score = -INF;
        let mut best_move = None;
        for (i, &mv) in moves.iter().enumerate() {
            let score = self.search_child(depth, ply, i == 0, alpha, beta, mv)?;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.orderer.on_beta_cutoff(&board, mv, ply, depth);
                break;
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score <= alpha_orig {
            Bound::Upper
        } else {
            Bound::Exact
        };
        self.tt.store(key, depth, ply, best_score, bound, best_move);
        Some(best_score)
    }

    /// Search one child of the node at `ply`, from the parent's
    /// perspective. The first (best-ordered) move gets the full window;
    /// the rest get a zero-width test first and a re-search only when
    /// that test says the move could raise alpha.
    fn search_child(
        &mut self,
        depth: u8,
        ply: usize,
        first: bool,
        alpha: i32,
        beta: i32,
        mv: ChessMove,
    ) -> Option<i32> {
        self.make(mv);
        let result = if first {
            self.negamax(depth - 1, ply + 1, -beta, -alpha)
        } else {
            match self.negamax(depth - 1, ply + 1, -alpha - 1, -alpha) {
                Some(v) if -v > alpha && -v < beta => {
                    self.negamax(depth - 1, ply + 1, -beta, -alpha)
                }
                other => other,
            }
        };
        self.unmake();
        Some(-result?)
    }

    /// Captures-only extension at the horizon, to avoid scoring a
    /// position mid-exchange. While in check every evasion is searched
    /// instead and there is no stand-pat, so horizon mates are found.
    fn quiescence(&mut self, ply: usize, mut alpha: i32, beta: i32) -> Option<i32> {
        self.nodes += 1;
        self.check_budget()?;

        let board = *self.state.board();
        if ply >= MAX_PLY {
            return Some(self.eval.evaluate(&board));
        }
        let in_check = *board.checkers() != EMPTY;

        let mut moves: Vec<ChessMove>;
        let mut best_score;
        if in_check {
            moves = MoveGen::new_legal(&board).collect();
            if moves.is_empty() {
                return Some(-(MATE_SCORE - ply as i32));
            }
            self.orderer.order(&board, &mut moves, None, ply);
            best_score = -INF;
        } else {
            let stand_pat = self.eval.evaluate(&board);
            if stand_pat >= beta {
                return Some(stand_pat);
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
            best_score = stand_pat;

            let mut gen = MoveGen::new_legal(&board);
            gen.set_iterator_mask(*board.color_combined(!board.side_to_move()));
            moves = gen.collect();
            self.orderer.order_captures(&board, &mut moves);
        }

        for &mv in &moves {
            self.make(mv);
            let result = self.quiescence(ply + 1, -beta, -alpha);
            self.unmake();
            let score = -result?;

            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        Some(best_score)
    }

    /// Walk the transposition table's best moves to rebuild the line the
    /// search considers best play for both sides.
    fn extract_pv(&mut self, first: ChessMove, depth: u8) -> Vec<ChessMove> {
        let mut pv = vec![first];
        self.make(first);
        while pv.len() < depth as usize {
            let mv = match self.tt.probe(self.state.hash()).and_then(|e| e.mv) {
                Some(mv) if self.state.board().legal(mv) => mv,
                _ => break,
            };
            pv.push(mv);
            self.make(mv);
        }
        for _ in 0..pv.len() {
            self.unmake();
        }
        pv
    }

    /// None means the budget ran out and the search must unwind.
    #[inline]
    fn check_budget(&mut self) -> Option<()> {
        if !self.first_depth_done {
            return Some(());
        }
        if self.limits.nodes_exhausted(self.nodes) {
            self.limits.time_control.stop();
            return None;
        }
        let tc = &self.limits.time_control;
        if tc.should_check_time(self.nodes) && tc.check_time() {
            return None;
        }
        if tc.is_stopped() {
            return None;
        }
        Some(())
    }

    #[inline]
    fn make(&mut self, mv: ChessMove) {
        self.eval.apply_move(self.state.board(), mv);
        self.state.make_move(mv);
    }

    #[inline]
    fn unmake(&mut self) {
        self.state.undo_last_move();
        self.eval.undo_move();
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
