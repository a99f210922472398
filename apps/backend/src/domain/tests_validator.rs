//! Rule-chain tests: each of the fifteen checks, in order, plus the legality
//! scenarios the rest of the engine depends on. The validator reports the
//! *first* failing check, so each test stages a position where every earlier
//! check passes.

use crate::domain::cards_types::Side;
use crate::domain::state::{GameState, Move};
use crate::domain::test_state_helpers::{
    attempts, card, fresh_game, game_with_hands, play_from_hand, single,
};
use crate::domain::validator::{validate_move, RejectReason};

fn expect_reject(game: &GameState, mv: &Move, side: Side, reason: RejectReason) {
    assert_eq!(validate_move(game, mv, side), Err(reason));
}

#[test]
fn check_1_rejects_off_turn_moves() {
    let game = fresh_game();
    expect_reject(
        &game,
        &single("5H", 0, 4),
        Side::Guest,
        RejectReason::NotYourTurn,
    );
}

#[test]
fn check_2_rejects_bad_attempt_counts() {
    let game = fresh_game();
    expect_reject(
        &game,
        &Move {
            attempts: Vec::new(),
        },
        Side::Host,
        RejectReason::BadAttemptCount,
    );
    let five = attempts(&[
        ("5H", 0, 0),
        ("5S", 0, 1),
        ("5C", 0, 2),
        ("5D", 0, 4),
        ("6H", 0, 5),
    ]);
    expect_reject(&game, &five, Side::Host, RejectReason::BadAttemptCount);
}

#[test]
fn check_3_rejects_split_lanes() {
    let game = fresh_game();
    let mv = attempts(&[("5H", 0, 2), ("5S", 1, 4)]);
    expect_reject(&game, &mv, Side::Host, RejectReason::MultipleLanes);
}

#[test]
fn check_4_rejects_duplicate_rows() {
    let game = fresh_game();
    let mv = attempts(&[("5H", 0, 2), ("5S", 0, 2)]);
    expect_reject(&game, &mv, Side::Host, RejectReason::DuplicateRows);
}

#[test]
fn check_5_rejects_won_lanes() {
    let mut game = fresh_game();
    game.lanes[0].won_by = Some(Side::Guest);
    expect_reject(
        &game,
        &single("5H", 0, 2),
        Side::Host,
        RejectReason::LaneAlreadyWon,
    );
}

#[test]
fn check_6_rejects_the_middle_row() {
    let game = fresh_game();
    expect_reject(
        &game,
        &single("5H", 0, 3),
        Side::Host,
        RejectReason::MiddleRowTarget,
    );
}

#[test]
fn check_7_rejects_gapped_rows_but_allows_the_middle_gap() {
    let game = fresh_game();
    let gapped = attempts(&[("5H", 0, 0), ("5S", 0, 2)]);
    expect_reject(&game, &gapped, Side::Host, RejectReason::RowsNotContiguous);

    // {2,4} spans only the excluded middle and is contiguous.
    let across = attempts(&[("5H", 0, 2), ("5S", 0, 4)]);
    assert_eq!(validate_move(&game, &across, Side::Host), Ok(()));
}

#[test]
fn check_8_rejects_mixed_kinds_in_a_stack() {
    let game = fresh_game();
    let mv = attempts(&[("5H", 0, 1), ("6S", 0, 2)]);
    expect_reject(&game, &mv, Side::Host, RejectReason::MixedKinds);
}

#[test]
fn check_9_rejects_skipped_rows_on_attack_and_retreat() {
    let game = fresh_game();
    // Attacking row 5 without holding row 4.
    expect_reject(
        &game,
        &single("5H", 0, 5),
        Side::Host,
        RejectReason::SkippedRow,
    );
    // Falling back to row 0 without holding row 1.
    expect_reject(
        &game,
        &single("5H", 0, 0),
        Side::Host,
        RejectReason::SkippedRow,
    );
}

#[test]
fn check_9_passes_once_the_intermediate_row_is_held() {
    let mut game = game_with_hands(&["5H", "5S"], &[]);
    play_from_hand(&mut game, Side::Host, "5S", 0, 1);
    assert_eq!(validate_move(&game, &single("5H", 0, 0), Side::Host), Ok(()));
}

#[test]
fn check_10_rejects_capturing_a_greater_same_suit_card() {
    let mut game = game_with_hands(&["5H"], &["9H", "3H"]);
    play_from_hand(&mut game, Side::Guest, "9H", 0, 2);
    expect_reject(
        &game,
        &single("5H", 0, 2),
        Side::Host,
        RejectReason::CaptureGreaterCard,
    );

    // A lesser opposing card can be captured.
    let mut game = game_with_hands(&["5H"], &["3H"]);
    play_from_hand(&mut game, Side::Guest, "3H", 0, 2);
    assert_eq!(validate_move(&game, &single("5H", 0, 2), Side::Host), Ok(()));
}

#[test]
fn check_11_requires_pressing_an_owned_advantage() {
    let mut game = fresh_game();
    game.lanes[0].advantage = Some(Side::Host);
    expect_reject(
        &game,
        &single("5H", 0, 1),
        Side::Host,
        RejectReason::MustAttack,
    );
}

#[test]
fn check_12_requires_defending_against_an_opposing_advantage() {
    let mut game = fresh_game();
    game.lanes[0].advantage = Some(Side::Guest);
    expect_reject(
        &game,
        &single("5H", 0, 4),
        Side::Host,
        RejectReason::MustDefend,
    );
}

#[test]
fn check_13_requires_advantage_before_attacking() {
    let game = fresh_game();
    expect_reject(
        &game,
        &single("5H", 0, 4),
        Side::Host,
        RejectReason::NotReadyToAttack,
    );
}

#[test]
fn check_14_requires_following_the_last_card() {
    let mut game = fresh_game();
    game.lanes[0].last_played = Some(card("9C"));
    expect_reject(
        &game,
        &single("5H", 0, 2),
        Side::Host,
        RejectReason::LastCardMismatch,
    );
    // Matching suit or matching kind both satisfy the constraint.
    assert_eq!(validate_move(&game, &single("5C", 0, 2), Side::Host), Ok(()));
    assert_eq!(validate_move(&game, &single("9H", 0, 2), Side::Host), Ok(()));
}

#[test]
fn check_15_rejects_reinforcing_a_greater_own_card() {
    let mut game = game_with_hands(&["5H", "9H"], &[]);
    play_from_hand(&mut game, Side::Host, "9H", 0, 2);
    game.lanes[0].last_played = Some(card("9H"));
    expect_reject(
        &game,
        &single("5H", 0, 2),
        Side::Host,
        RejectReason::ReinforceGreaterCard,
    );

    // Reinforcing upward is allowed.
    let mut game = game_with_hands(&["9H", "5H"], &[]);
    play_from_hand(&mut game, Side::Host, "5H", 0, 2);
    game.lanes[0].last_played = Some(card("5H"));
    assert_eq!(validate_move(&game, &single("9H", 0, 2), Side::Host), Ok(()));
}

#[test]
fn first_breach_placement_on_an_empty_lane_is_legal() {
    let game = game_with_hands(&["5H"], &[]);
    assert_eq!(validate_move(&game, &single("5H", 0, 2), Side::Host), Ok(()));
}

#[test]
fn guest_rules_mirror_host_rules() {
    let mut game = fresh_game();
    game.set_turn(Side::Guest);

    // Guest's breach row is 4.
    assert_eq!(
        validate_move(&game, &single("5H", 0, 4), Side::Guest),
        Ok(())
    );
    // Row 2 is an attack for the guest and needs advantage first.
    expect_reject(
        &game,
        &single("5H", 0, 2),
        Side::Guest,
        RejectReason::NotReadyToAttack,
    );
    // Guest retreat to row 6 requires row 5.
    expect_reject(
        &game,
        &single("5H", 0, 6),
        Side::Guest,
        RejectReason::SkippedRow,
    );
}

#[test]
fn rejection_messages_are_stable() {
    assert_eq!(
        RejectReason::CaptureGreaterCard.to_string(),
        "can't capture a greater card"
    );
    assert_eq!(RejectReason::MustAttack.to_string(), "must attack");
    assert_eq!(RejectReason::MustDefend.to_string(), "must defend");
    assert_eq!(
        RejectReason::NotReadyToAttack.to_string(),
        "not ready to attack"
    );
    assert_eq!(
        RejectReason::ReinforceGreaterCard.to_string(),
        "can't reinforce a greater card"
    );
}
