//! Move legality: a fixed-order chain of named rule checks.
//!
//! Each check is a small predicate over (game, move, acting side). The chain
//! short-circuits: the first failing check determines the rejection reason,
//! and callers (and tests) rely on that order being stable.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use super::cards_types::Side;
use super::lane::{is_own_side_row, rows_between_breach, MIDDLE_ROW};
use super::state::{GameState, Move, PlaceCardAttempt};

/// Why a proposed move is illegal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotYourTurn,
    BadAttemptCount,
    MultipleLanes,
    DuplicateRows,
    LaneAlreadyWon,
    MiddleRowTarget,
    RowsNotContiguous,
    MixedKinds,
    SkippedRow,
    CaptureGreaterCard,
    MustAttack,
    MustDefend,
    NotReadyToAttack,
    LastCardMismatch,
    ReinforceGreaterCard,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let msg = match self {
            RejectReason::NotYourTurn => "not your turn",
            RejectReason::BadAttemptCount => "move must contain one to four placements",
            RejectReason::MultipleLanes => "all placements must target the same lane",
            RejectReason::DuplicateRows => "placements can't target the same row twice",
            RejectReason::LaneAlreadyWon => "lane has already been won",
            RejectReason::MiddleRowTarget => "can't place into the middle row",
            RejectReason::RowsNotContiguous => "placement rows must be contiguous",
            RejectReason::MixedKinds => "stacked placements must share a kind",
            RejectReason::SkippedRow => "can't skip an unresolved row",
            RejectReason::CaptureGreaterCard => "can't capture a greater card",
            RejectReason::MustAttack => "must attack",
            RejectReason::MustDefend => "must defend",
            RejectReason::NotReadyToAttack => "not ready to attack",
            RejectReason::LastCardMismatch => "card must follow the last card played in the lane",
            RejectReason::ReinforceGreaterCard => "can't reinforce a greater card",
        };
        f.write_str(msg)
    }
}

/// The attempt closest to the acting side's edge: the one whose target row is
/// least far along the side's advance direction.
pub fn initial_attempt(mv: &Move, side: Side) -> &PlaceCardAttempt {
    let key = |a: &&PlaceCardAttempt| a.row;
    match side {
        Side::Host => mv.attempts.iter().min_by_key(key),
        Side::Guest => mv.attempts.iter().max_by_key(key),
    }
    .expect("validated moves have at least one attempt")
}

type Check = fn(&GameState, &Move, Side) -> Result<(), RejectReason>;

/// The rule chain, in evaluation order. Later checks may assume everything
/// earlier in the chain has passed.
pub const RULE_CHAIN: &[(&str, Check)] = &[
    ("turn_order", check_turn_order),
    ("attempt_count", check_attempt_count),
    ("single_lane", check_single_lane),
    ("distinct_rows", check_distinct_rows),
    ("lane_not_won", check_lane_not_won),
    ("no_middle_row", check_no_middle_row),
    ("contiguous_rows", check_contiguous_rows),
    ("matching_kinds", check_matching_kinds),
    ("no_skipped_row", check_no_skipped_row),
    ("no_greater_capture", check_no_greater_capture),
    ("must_attack", check_must_attack),
    ("must_defend", check_must_defend),
    ("ready_to_attack", check_ready_to_attack),
    ("follows_last_card", check_follows_last_card),
    ("no_greater_reinforce", check_no_greater_reinforce),
];

/// Validate a proposed move. Returns the first failing rule's reason.
pub fn validate_move(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    for (_rule, check) in RULE_CHAIN {
        check(game, mv, side)?;
    }
    Ok(())
}

fn check_turn_order(game: &GameState, _mv: &Move, side: Side) -> Result<(), RejectReason> {
    if game.side_to_move() != side {
        return Err(RejectReason::NotYourTurn);
    }
    Ok(())
}

fn check_attempt_count(_game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    if mv.attempts.is_empty() || mv.attempts.len() > 4 {
        return Err(RejectReason::BadAttemptCount);
    }
    Ok(())
}

fn check_single_lane(_game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    let lane = mv.attempts[0].lane;
    if mv.attempts.iter().any(|a| a.lane != lane) {
        return Err(RejectReason::MultipleLanes);
    }
    Ok(())
}

fn check_distinct_rows(_game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    for (i, a) in mv.attempts.iter().enumerate() {
        if mv.attempts[..i].iter().any(|b| b.row == a.row) {
            return Err(RejectReason::DuplicateRows);
        }
    }
    Ok(())
}

fn check_lane_not_won(game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    if game.lanes[mv.attempts[0].lane].won_by.is_some() {
        return Err(RejectReason::LaneAlreadyWon);
    }
    Ok(())
}

fn check_no_middle_row(_game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    if mv.attempts.iter().any(|a| a.row == MIDDLE_ROW) {
        return Err(RejectReason::MiddleRowTarget);
    }
    Ok(())
}

/// Sorted target rows must be consecutive, treating the excluded middle row
/// as no gap: {1,2} and {2,4} are contiguous, {1,4} is not.
fn check_contiguous_rows(_game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    let mut rows: Vec<usize> = mv.attempts.iter().map(|a| a.row).collect();
    rows.sort_unstable();
    for pair in rows.windows(2) {
        let contiguous = pair[1] - pair[0] == 1
            || (pair[0] == MIDDLE_ROW - 1 && pair[1] == MIDDLE_ROW + 1);
        if !contiguous {
            return Err(RejectReason::RowsNotContiguous);
        }
    }
    Ok(())
}

fn check_matching_kinds(_game: &GameState, mv: &Move, _side: Side) -> Result<(), RejectReason> {
    let kind = mv.attempts[0].card.kind;
    if mv.attempts.iter().any(|a| a.card.kind != kind) {
        return Err(RejectReason::MixedKinds);
    }
    Ok(())
}

/// The initial attempt may not leapfrog rows the player has not claimed yet:
/// every row strictly between the side's breach row and the initial row must
/// be topped by one of the player's own cards.
fn check_no_skipped_row(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    for row in rows_between_breach(side, initial.row) {
        let held = lane
            .top_card(row)
            .map(|p| p.owned_by == side)
            .unwrap_or(false);
        if !held {
            return Err(RejectReason::SkippedRow);
        }
    }
    Ok(())
}

fn check_no_greater_capture(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    if let Some(top) = lane.top_card(initial.row) {
        if top.owned_by != side
            && top.card.suit == initial.card.suit
            && top.card.kind > initial.card.kind
        {
            return Err(RejectReason::CaptureGreaterCard);
        }
    }
    Ok(())
}

/// Holding the lane advantage obliges the player to press it: no more
/// placements on their own side of that lane.
fn check_must_attack(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    if is_own_side_row(side, initial.row) && lane.advantage == Some(side) {
        return Err(RejectReason::MustAttack);
    }
    Ok(())
}

/// When the opponent holds the advantage the player must fall back and
/// defend their own side rather than attack.
fn check_must_defend(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    if !is_own_side_row(side, initial.row) && lane.advantage == Some(side.opponent()) {
        return Err(RejectReason::MustDefend);
    }
    Ok(())
}

/// Attacking a lane requires having captured its middle first.
fn check_ready_to_attack(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    if !is_own_side_row(side, initial.row) && lane.advantage.is_none() {
        return Err(RejectReason::NotReadyToAttack);
    }
    Ok(())
}

fn check_follows_last_card(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    if let Some(last) = lane.last_played {
        if initial.card.suit != last.suit && initial.card.kind != last.kind {
            return Err(RejectReason::LastCardMismatch);
        }
    }
    Ok(())
}

fn check_no_greater_reinforce(game: &GameState, mv: &Move, side: Side) -> Result<(), RejectReason> {
    let initial = initial_attempt(mv, side);
    let lane = &game.lanes[initial.lane];
    if let Some(top) = lane.top_card(initial.row) {
        if top.owned_by == side
            && top.card.suit == initial.card.suit
            && top.card.kind > initial.card.kind
        {
            return Err(RejectReason::ReinforceGreaterCard);
        }
    }
    Ok(())
}
