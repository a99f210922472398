//! Executor tests: capture resolution, the ace rule, lane and game wins, the
//! last-played bookkeeping, and card conservation through all of them.

use crate::domain::cards_types::Side;
use crate::domain::executor::execute_move;
use crate::domain::movement::CardStore;
use crate::domain::test_state_helpers::{
    attempts, card, game_with_hands, owned_total, play_from_hand, single,
};
use crate::errors::domain::{DomainError, InfraErrorKind};

fn assert_conserved(game: &crate::domain::state::GameState) {
    assert_eq!(owned_total(game, Side::Host), 26, "host cards not conserved");
    assert_eq!(
        owned_total(game, Side::Guest),
        26,
        "guest cards not conserved"
    );
}

#[test]
fn breach_placement_captures_an_unowned_middle() {
    let mut game = game_with_hands(&["5H", "2C", "3D", "9S", "JC"], &[]);
    let out = execute_move(&mut game, Side::Host, &single("5H", 0, 2)).unwrap();

    let lane = &game.lanes[0];
    assert_eq!(lane.advantage, Some(Side::Host));
    assert!(lane.rows[2].is_empty());
    assert_eq!(lane.rows[3].len(), 1);
    assert_eq!(lane.rows[3][0].card, card("5H"));
    assert_eq!(lane.rows[3][0].owned_by, Side::Host);
    assert_eq!(lane.last_played, Some(card("5H")));

    // hand -> lane, then lane -> middle
    assert_eq!(out.movements.len(), 2);
    assert_eq!(out.movements[0].from, CardStore::Hand { side: Side::Host });
    assert_eq!(out.movements[1].to, CardStore::Lane { lane: 0, row: 3 });
    assert_eq!(game.host.hand.len(), 4);
    assert_conserved(&game);
}

#[test]
fn uncontested_capture_orders_own_cards_before_opponents() {
    let mut game = game_with_hands(&["5H", "4C"], &["8D"]);
    play_from_hand(&mut game, Side::Guest, "8D", 0, 4);
    play_from_hand(&mut game, Side::Host, "4C", 0, 1);

    execute_move(&mut game, Side::Host, &single("5H", 0, 2)).unwrap();

    let middle = &game.lanes[0].rows[3];
    let owners: Vec<Side> = middle.iter().map(|p| p.owned_by).collect();
    assert_eq!(owners, vec![Side::Host, Side::Host, Side::Guest]);
    assert_eq!(middle[0].card, card("4C"));
    assert_eq!(middle[1].card, card("5H"));
    assert_eq!(middle[2].card, card("8D"));
    assert_conserved(&game);
}

#[test]
fn contested_capture_takes_tops_and_returns_the_rest() {
    let mut game = game_with_hands(&["5H", "4C", "3S"], &["9C", "8D"]);
    play_from_hand(&mut game, Side::Guest, "9C", 0, 3);
    game.lanes[0].advantage = Some(Side::Guest);
    play_from_hand(&mut game, Side::Host, "3S", 0, 0);
    play_from_hand(&mut game, Side::Host, "4C", 0, 1);
    play_from_hand(&mut game, Side::Guest, "8D", 0, 4);

    let guest_deck_before = game.guest.deck.len();
    execute_move(&mut game, Side::Host, &single("5H", 0, 2)).unwrap();

    let lane = &game.lanes[0];
    assert_eq!(lane.advantage, Some(Side::Host));
    // Exposed tops of rows 0, 1, 2 form the new middle pile.
    let middle_cards: Vec<_> = lane.rows[3].iter().map(|p| p.card).collect();
    assert_eq!(middle_cards, vec![card("3S"), card("4C"), card("5H")]);
    assert!(lane.rows[0].is_empty());
    assert!(lane.rows[4].is_empty());
    // The old middle pile and the guest's lane card went back to their
    // owner's deck.
    assert_eq!(game.guest.deck.len(), guest_deck_before + 2);
    assert!(game.guest.deck.contains(&card("9C")));
    assert!(game.guest.deck.contains(&card("8D")));
    assert_conserved(&game);
}

#[test]
fn opposing_ace_faceoff_wipes_the_lane() {
    let mut game = game_with_hands(&["AH", "2C"], &["AS", "3D"]);
    play_from_hand(&mut game, Side::Host, "2C", 2, 2);
    play_from_hand(&mut game, Side::Host, "AH", 2, 4);
    play_from_hand(&mut game, Side::Guest, "3D", 2, 5);
    game.lanes[2].advantage = Some(Side::Host);
    game.set_turn(Side::Guest);

    let out = execute_move(&mut game, Side::Guest, &single("AS", 2, 5)).unwrap();

    let lane = &game.lanes[2];
    assert!(lane.is_empty());
    assert_eq!(lane.advantage, None);
    assert_eq!(lane.last_played, None);
    assert_eq!(game.host.destroyed.len(), 2);
    assert_eq!(game.guest.destroyed.len(), 2);
    assert!(game.host.destroyed.contains(&card("AH")));
    assert!(game.guest.destroyed.contains(&card("AS")));
    // placement + four destructions
    assert_eq!(out.movements.len(), 5);
    assert!(out.movements[1..]
        .iter()
        .all(|m| m.to == CardStore::Destroyed));
    assert_conserved(&game);
}

#[test]
fn ace_covering_an_ace_still_triggers_the_wipe() {
    let mut game = game_with_hands(&["AH"], &["AS"]);
    play_from_hand(&mut game, Side::Host, "AH", 1, 4);
    game.set_turn(Side::Guest);

    execute_move(&mut game, Side::Guest, &single("AS", 1, 4)).unwrap();

    assert!(game.lanes[1].is_empty());
    assert_eq!(game.host.destroyed, vec![card("AH")]);
    assert_eq!(game.guest.destroyed, vec![card("AS")]);
    assert_conserved(&game);
}

#[test]
fn lone_ace_does_not_wipe() {
    let mut game = game_with_hands(&["AH"], &[]);
    execute_move(&mut game, Side::Host, &single("AH", 0, 2)).unwrap();
    // Captured the middle like any other card.
    assert_eq!(game.lanes[0].advantage, Some(Side::Host));
    assert_eq!(game.lanes[0].rows[3].len(), 1);
    assert_conserved(&game);
}

#[test]
fn reaching_the_far_row_wins_the_lane_and_marks_the_red_joker() {
    let mut game = game_with_hands(&["5H", "5S", "5C", "5D"], &[]);
    play_from_hand(&mut game, Side::Host, "5S", 1, 4);
    play_from_hand(&mut game, Side::Host, "5C", 1, 5);
    play_from_hand(&mut game, Side::Host, "5D", 1, 3);
    game.lanes[1].advantage = Some(Side::Host);
    let deck_before = game.host.deck.len();

    let out = execute_move(&mut game, Side::Host, &single("5H", 1, 6)).unwrap();

    assert_eq!(game.lanes[1].won_by, Some(Side::Host));
    assert_eq!(game.red_joker_lane, Some(1));
    assert_eq!(game.black_joker_lane, None);
    assert!(game.lanes[1].is_empty());
    assert_eq!(game.host.deck.len(), deck_before + 4);
    assert_eq!(out.lanes_won, vec![1]);
    assert_eq!(out.game_won, None);
    assert!(!game.has_ended);
    assert_conserved(&game);
}

#[test]
fn second_lane_win_ends_the_game() {
    let mut game = game_with_hands(&["5H"], &[]);
    game.lanes[0].won_by = Some(Side::Host);
    game.red_joker_lane = Some(0);
    game.lanes[3].advantage = Some(Side::Host);

    let out = execute_move(&mut game, Side::Host, &single("5H", 3, 6)).unwrap();

    assert_eq!(game.lanes[3].won_by, Some(Side::Host));
    assert_eq!(game.black_joker_lane, Some(3));
    assert_eq!(out.game_won, Some(Side::Host));
    assert!(game.has_ended);
    assert_eq!(game.won_by, Some(Side::Host));
}

#[test]
fn reinforcement_keeps_the_most_offensive_card_as_last_played() {
    let mut game = game_with_hands(&["5C", "5H", "9H"], &[]);
    play_from_hand(&mut game, Side::Host, "9H", 0, 4);
    play_from_hand(&mut game, Side::Host, "5C", 0, 1);

    execute_move(&mut game, Side::Host, &single("5H", 0, 1)).unwrap();

    // 5H reinforced the 5C but the nine out on row 4 is still the host's
    // most advanced card, so it keeps the last-played role.
    assert_eq!(game.lanes[0].last_played, Some(card("9H")));
}

#[test]
fn reinforcement_at_the_front_takes_over_last_played() {
    let mut game = game_with_hands(&["9H", "5H"], &[]);
    play_from_hand(&mut game, Side::Host, "5H", 0, 2);

    execute_move(&mut game, Side::Host, &single("9H", 0, 2)).unwrap();

    // The new card tops the host's furthest row, so it is most offensive.
    // (Landing on row 2 also captured the middle.)
    assert_eq!(game.lanes[0].last_played, Some(card("9H")));
}

#[test]
fn stacked_move_applies_attempts_in_order() {
    let mut game = game_with_hands(&["5H", "5S"], &[]);
    let mv = attempts(&[("5H", 0, 2), ("5S", 0, 4)]);

    execute_move(&mut game, Side::Host, &mv).unwrap();

    let lane = &game.lanes[0];
    // First attempt breached and folded into the middle; the second landed
    // on the now-owned attack row.
    assert_eq!(lane.advantage, Some(Side::Host));
    assert_eq!(lane.rows[3].len(), 1);
    assert_eq!(lane.rows[4].len(), 1);
    assert_eq!(lane.rows[4][0].card, card("5S"));
    assert_eq!(lane.last_played, Some(card("5S")));
    assert_conserved(&game);
}

#[test]
fn executing_a_card_not_in_hand_is_an_invariant_violation() {
    let mut game = game_with_hands(&["2C"], &[]);
    let err = execute_move(&mut game, Side::Host, &single("5H", 0, 2)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Infra(InfraErrorKind::DataCorruption, _)
    ));
}

#[test]
fn moves_are_recorded_in_history() {
    let mut game = game_with_hands(&["5H"], &[]);
    execute_move(&mut game, Side::Host, &single("5H", 0, 2)).unwrap();
    assert_eq!(game.move_history.len(), 1);
    assert_eq!(game.move_history[0].notation, "5H02");
    assert_eq!(game.move_history[0].side, Side::Host);
}
