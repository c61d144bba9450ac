use super::*;

use std::str::FromStr;

use chess::Board;

fn startpos_tree() -> (Tree, GameState) {
    let state = GameState::default();
    let tree = Tree::new(&state);
    (tree, state)
}

#[test]
fn test_root_starts_with_all_legal_moves_untried() {
    let (tree, _) = startpos_tree();
    assert_eq!(tree.node(0).untried.len(), 20);
    assert!(tree.node(0).children.is_empty());
    assert!(tree.node(0).terminal.is_none());
    assert!(tree.node(0).mv.is_none());
}

#[test]
fn test_terminal_nodes_carry_fixed_values() {
    // Side to move is checkmated: the player who moved in scores +1
    let mated =
        GameState::from_board(Board::from_str("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap());
    let tree = Tree::new(&mated);
    assert_eq!(tree.node(0).terminal, Some(1.0));

    let stalemated =
        GameState::from_board(Board::from_str("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap());
    let tree = Tree::new(&stalemated);
    assert_eq!(tree.node(0).terminal, Some(0.0));
}

#[test]
fn test_every_child_is_tried_once_before_any_revisit() {
    let (mut tree, mut state) = startpos_tree();

    // Expand two children and visit only the first
    let mv_a = tree.node_mut(0).untried.pop().unwrap();
    state.make_move(mv_a);
    let a = tree.add_child(0, mv_a, &state);
    state.undo_last_move();

    let mv_b = tree.node_mut(0).untried.pop().unwrap();
    state.make_move(mv_b);
    let b = tree.add_child(0, mv_b, &state);
    state.undo_last_move();

    tree.backpropagate(a, 1.0);
    // The unvisited sibling has infinite priority
    assert_eq!(tree.select_child(0), b);

    tree.backpropagate(b, -1.0);
    // Both visited once: the better mean wins the comparison now
    assert_eq!(tree.select_child(0), a);
}

#[test]
fn test_backpropagation_alternates_signs_up_the_path() {
    let (mut tree, mut state) = startpos_tree();

    let mv_a = tree.node_mut(0).untried.pop().unwrap();
    state.make_move(mv_a);
    let a = tree.add_child(0, mv_a, &state);

    let mv_b = tree.node_mut(a).untried.pop().unwrap();
    state.make_move(mv_b);
    let b = tree.add_child(a, mv_b, &state);

    tree.backpropagate(b, 0.5);
    assert_eq!(tree.node(b).visits, 1);
    assert_eq!(tree.node(a).visits, 1);
    assert_eq!(tree.node(0).visits, 1);
    assert_eq!(tree.node(b).value_sum, 0.5);
    assert_eq!(tree.node(a).value_sum, -0.5);
    assert_eq!(tree.node(0).value_sum, 0.5);

    state.undo_last_move();
    state.undo_last_move();
}

#[test]
fn test_most_visited_child_wins_over_higher_mean() {
    let (mut tree, mut state) = startpos_tree();

    let mv_a = tree.node_mut(0).untried.pop().unwrap();
    state.make_move(mv_a);
    let a = tree.add_child(0, mv_a, &state);
    state.undo_last_move();

    let mv_b = tree.node_mut(0).untried.pop().unwrap();
    state.make_move(mv_b);
    let b = tree.add_child(0, mv_b, &state);
    state.undo_last_move();

    // `a` visited three times with modest values, `b` once with a high one
    tree.backpropagate(a, 0.2);
    tree.backpropagate(a, 0.2);
    tree.backpropagate(a, 0.2);
    tree.backpropagate(b, 0.9);

    assert_eq!(tree.most_visited_root_child(), Some(a));
    assert_eq!(tree.principal_line().first(), Some(&mv_a));
    assert!(tree.node(b).mean_value() > tree.node(a).mean_value());
}
