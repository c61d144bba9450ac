use super::*;

use evaluation::MaterialEval;

fn state(fen: &str) -> GameState {
    GameState::from_fen(fen).unwrap()
}

#[test]
fn test_value_squash_round_trips_centipawns() {
    assert_eq!(value_to_centipawns(0.0), 0);
    let v = (900.0_f64 / VALUE_SCALE).tanh();
    let cp = value_to_centipawns(v);
    assert!((cp - 900).abs() <= 1, "got {cp}");
    assert!(value_to_centipawns(-v) <= -899);
    // Saturated values stay finite
    assert!(value_to_centipawns(1.0) > 2_000);
}

#[test]
fn test_default_budget_runs_the_fixed_iteration_count() {
    let mut engine = MctsEngine::new(MaterialEval::new());
    let st = GameState::default();
    let result = engine.search(&st, SearchLimits::depth(0));
    assert_eq!(result.nodes, DEFAULT_ITERATIONS);
    assert!(!result.stopped);
    let mv = result.best_move.expect("startpos has moves");
    assert!(st.board().legal(mv));
    assert_eq!(result.pv.first(), Some(&mv));
    assert!(result.depth >= 2, "tree should grow past the root's children");
}

#[test]
fn test_node_budget_caps_iterations() {
    let mut engine = MctsEngine::new(MaterialEval::new());
    let result = engine.search(
        &GameState::default(),
        SearchLimits::depth(0).with_nodes(50),
    );
    assert_eq!(result.nodes, 50);
    assert!(result.best_move.is_some());
}

#[test]
fn test_finds_the_hanging_queen() {
    let mut engine = MctsEngine::new(MaterialEval::new());
    let result = engine.search(
        &state("k7/8/3q4/8/4N3/8/8/K7 w - - 0 1"),
        SearchLimits::depth(0).with_nodes(2_000),
    );
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("e4d6".into()));
    assert!(result.score > 0);
}

#[test]
fn test_prefers_immediate_mate() {
    let mut engine = MctsEngine::new(MaterialEval::new());
    let result = engine.search(
        &state("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1"),
        SearchLimits::depth(0).with_nodes(8_000),
    );
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("a1a8".into()));
}

#[test]
fn test_no_legal_moves_reports_empty_result() {
    let mut engine = MctsEngine::new(MaterialEval::new());
    let result = engine.search(
        &state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1"),
        SearchLimits::depth(0),
    );
    assert!(result.best_move.is_none());
    assert_eq!(result.nodes, 0);
}
