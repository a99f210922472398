//! Candidate-generator tests: enumeration shape, stacking, determinism, and
//! the zero-legal-moves signals the lifecycle layer relies on.

use crate::domain::candidates::{any_legal, find_candidate, generate_candidates};
use crate::domain::cards_types::Side;
use crate::domain::dealing::new_game;
use crate::domain::executor::execute_move;
use crate::domain::test_state_helpers::{attempts, card, game_with_hands, owned_total};

#[test]
fn every_hand_card_gets_a_single_candidate_per_slot() {
    let game = new_game(3);
    let candidates = generate_candidates(&game, Side::Host);

    let singles = candidates
        .iter()
        .filter(|c| c.mv.attempts.len() == 1)
        .count();
    // 5 hand cards x 5 lanes x 6 placement rows
    assert_eq!(singles, 150);
    assert!(candidates
        .iter()
        .all(|c| c.mv.attempts.iter().all(|a| a.row != 3)));
}

#[test]
fn breach_singles_are_legal_on_a_fresh_board() {
    let game = new_game(3);
    let candidates = generate_candidates(&game, Side::Host);
    for c in candidates.iter().filter(|c| c.mv.attempts.len() == 1) {
        let row = c.mv.attempts[0].row;
        if row == 2 || row == 1 {
            assert!(c.legal, "expected {:?} to be legal", c.mv);
        }
        if row == 4 || row == 5 || row == 6 {
            assert!(!c.legal, "expected {:?} to be illegal", c.mv);
        }
    }
}

#[test]
fn stacked_candidates_cross_the_middle_gap() {
    let game = game_with_hands(&["5H", "5S", "2C", "3D", "9C"], &["4D"]);
    let candidates = generate_candidates(&game, Side::Host);

    let stack = attempts(&[("5H", 0, 2), ("5S", 0, 4)]);
    let found = find_candidate(&candidates, &stack).expect("stack not enumerated");
    assert!(found.legal);

    // The mirrored order exists too: each ordering is its own candidate.
    let mirrored = attempts(&[("5S", 0, 2), ("5H", 0, 4)]);
    assert!(find_candidate(&candidates, &mirrored).is_some());
}

#[test]
fn generation_is_deterministic() {
    let game = new_game(17);
    let a = generate_candidates(&game, Side::Host);
    let b = generate_candidates(&game, Side::Host);
    assert_eq!(a, b);
}

#[test]
fn all_lanes_won_means_no_legal_moves_for_either_side() {
    let mut game = new_game(5);
    for lane in &mut game.lanes {
        lane.won_by = Some(Side::Host);
    }
    assert!(!any_legal(&generate_candidates(&game, Side::Host)));
    game.set_turn(Side::Guest);
    assert!(!any_legal(&generate_candidates(&game, Side::Guest)));
}

#[test]
fn one_sided_lockout_is_detectable() {
    // Four lanes are closed; lane 4 constrains the next card to follow a 2C.
    // The host holds a club, the guest holds nothing compatible.
    let mut game = game_with_hands(&["3C"], &["5H", "6H"]);
    for lane_idx in 0..4 {
        game.lanes[lane_idx].won_by = Some(Side::Guest);
    }
    game.lanes[4].last_played = Some(card("2C"));

    assert!(any_legal(&generate_candidates(&game, Side::Host)));
    game.set_turn(Side::Guest);
    assert!(!any_legal(&generate_candidates(&game, Side::Guest)));
}

#[test]
fn legal_candidates_execute_without_invariant_errors() {
    let game = new_game(9);
    let candidates = generate_candidates(&game, Side::Host);
    for c in candidates.iter().filter(|c| c.legal).take(40) {
        let mut copy = game.clone();
        execute_move(&mut copy, Side::Host, &c.mv).expect("legal candidate failed to execute");
        assert_eq!(owned_total(&copy, Side::Host), 26);
        assert_eq!(owned_total(&copy, Side::Guest), 26);
    }
}
