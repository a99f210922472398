//! Move execution: applies an already-validated move attempt by attempt,
//! resolving the ace rule, middle captures, and lane/game wins, and producing
//! the card-movement ledger for the broadcast collaborator.

use super::cards_types::{Card, Kind, PlacedCard, Side};
use super::dealing::reshuffle_deck;
use super::lane::{breach_row, home_rows, win_row, Lane, LANE_ROWS, MIDDLE_ROW, PLACEMENT_ROWS};
use super::movement::{CardMovement, CardStore};
use super::state::{GameState, Move, PlaceCardAttempt};
use crate::errors::domain::DomainError;

/// What a move did, beyond mutating the game.
#[derive(Debug, Default)]
pub struct MoveOutcome {
    pub movements: Vec<CardMovement>,
    pub lanes_won: Vec<usize>,
    pub game_won: Option<Side>,
}

/// Apply a validated move for `side`. Attempts are applied in the order
/// given. Errors here mean the validator and executor disagree about the
/// game state and are not recoverable.
pub fn execute_move(
    game: &mut GameState,
    side: Side,
    mv: &Move,
) -> Result<MoveOutcome, DomainError> {
    let mut outcome = MoveOutcome::default();
    for attempt in &mv.attempts {
        apply_attempt(game, side, attempt, &mut outcome)?;
        if game.has_ended {
            break;
        }
    }
    game.record_move(side, mv.notation());
    Ok(outcome)
}

fn apply_attempt(
    game: &mut GameState,
    side: Side,
    attempt: &PlaceCardAttempt,
    outcome: &mut MoveOutcome,
) -> Result<(), DomainError> {
    let player = game.player_mut(side);
    let idx = player
        .hand
        .iter()
        .position(|c| *c == attempt.card)
        .ok_or_else(|| {
            DomainError::invariant(format!(
                "executing placement of {} which is not in the {side:?} hand",
                attempt.card
            ))
        })?;
    let card = player.hand.remove(idx);

    let lane_idx = attempt.lane;
    let row = attempt.row;
    let lane = &mut game.lanes[lane_idx];
    let reinforced_own = lane
        .top_card(row)
        .map(|p| p.owned_by == side)
        .unwrap_or(false);
    lane.rows[row].push(PlacedCard {
        card,
        owned_by: side,
    });
    outcome.movements.push(CardMovement::new(
        CardStore::Hand { side },
        CardStore::Lane {
            lane: lane_idx,
            row,
        },
        card,
    ));

    update_last_played(lane, side, card, reinforced_own);

    // Ace rule: opposing aces facing off wipe the lane; nothing else in this
    // attempt resolves afterwards.
    if card.kind == Kind::Ace && ace_faceoff(lane, side) {
        wipe_lane(game, lane_idx, outcome);
        return Ok(());
    }

    if row == breach_row(side) {
        match game.lanes[lane_idx].advantage {
            None => capture_middle_uncontested(game, lane_idx, side, outcome),
            Some(adv) if adv != side => capture_middle_contested(game, lane_idx, side, outcome),
            Some(_) => {}
        }
    }

    if row == win_row(side) {
        win_lane(game, lane_idx, side, outcome);
    }

    Ok(())
}

/// `last_played` normally becomes the placed card. Reinforcing one of your
/// own cards only counts as the lane's latest offensive card if the new card
/// actually is your most advanced one; otherwise the previous most-offensive
/// card keeps the role, preserving suit/kind continuity for later turns.
fn update_last_played(lane: &mut Lane, side: Side, card: Card, reinforced_own: bool) {
    if reinforced_own {
        match lane.most_offensive(side) {
            Some(mo) if mo.card != card => lane.last_played = Some(mo.card),
            _ => lane.last_played = Some(card),
        }
    } else {
        lane.last_played = Some(card);
    }
}

/// An ace faceoff exists when the opposing side's most-offensive card is an
/// Ace, or (degenerate case: the opposing ace was just covered) when any
/// row's top two cards are opposing Aces.
fn ace_faceoff(lane: &Lane, side: Side) -> bool {
    if lane
        .most_offensive(side.opponent())
        .map(|p| p.card.kind == Kind::Ace)
        .unwrap_or(false)
    {
        return true;
    }
    lane.rows.iter().any(|stack| {
        let n = stack.len();
        n >= 2
            && stack[n - 1].card.kind == Kind::Ace
            && stack[n - 2].card.kind == Kind::Ace
            && stack[n - 1].owned_by != stack[n - 2].owned_by
    })
}

/// Destroy every card in the lane and reset its flags.
fn wipe_lane(game: &mut GameState, lane_idx: usize, outcome: &mut MoveOutcome) {
    let lane = &mut game.lanes[lane_idx];
    let mut destroyed: Vec<PlacedCard> = Vec::new();
    for row in 0..LANE_ROWS {
        for placed in lane.rows[row].drain(..) {
            outcome.movements.push(CardMovement::new(
                CardStore::Lane {
                    lane: lane_idx,
                    row,
                },
                CardStore::Destroyed,
                placed.card,
            ));
            destroyed.push(placed);
        }
    }
    lane.last_played = None;
    lane.advantage = None;
    for placed in destroyed {
        game.player_mut(placed.owned_by).destroyed.push(placed.card);
    }
}

/// First capture of an unowned middle: the whole lane folds into the middle
/// pile, the capturing side's cards ordered before the opponent's, each group
/// keeping lane-relative order.
fn capture_middle_uncontested(
    game: &mut GameState,
    lane_idx: usize,
    side: Side,
    outcome: &mut MoveOutcome,
) {
    let lane = &mut game.lanes[lane_idx];
    let mut own: Vec<(usize, PlacedCard)> = Vec::new();
    let mut opp: Vec<(usize, PlacedCard)> = Vec::new();
    for row in PLACEMENT_ROWS {
        for placed in lane.rows[row].drain(..) {
            if placed.owned_by == side {
                own.push((row, placed));
            } else {
                opp.push((row, placed));
            }
        }
    }
    for (row, placed) in own.into_iter().chain(opp) {
        outcome.movements.push(CardMovement::new(
            CardStore::Lane {
                lane: lane_idx,
                row,
            },
            CardStore::Lane {
                lane: lane_idx,
                row: MIDDLE_ROW,
            },
            placed.card,
        ));
        lane.rows[MIDDLE_ROW].push(placed);
    }
    lane.advantage = Some(side);
}

/// Retaking a middle the opponent holds: only the exposed top card of each of
/// the capturing side's three rows joins the middle; every other card in the
/// lane goes back to its owner's deck, reshuffled.
fn capture_middle_contested(
    game: &mut GameState,
    lane_idx: usize,
    side: Side,
    outcome: &mut MoveOutcome,
) {
    let lane = &mut game.lanes[lane_idx];
    let mut to_middle: Vec<PlacedCard> = Vec::new();
    for row in home_rows(side) {
        if let Some(placed) = lane.rows[row].pop() {
            outcome.movements.push(CardMovement::new(
                CardStore::Lane {
                    lane: lane_idx,
                    row,
                },
                CardStore::Lane {
                    lane: lane_idx,
                    row: MIDDLE_ROW,
                },
                placed.card,
            ));
            to_middle.push(placed);
        }
    }

    let returned = drain_lane_to_decks(lane, lane_idx, outcome);
    lane.rows[MIDDLE_ROW] = to_middle;
    lane.advantage = Some(side);
    restock_decks(game, returned);
}

/// Landing on the far row wins the lane: mark it, send every card home, and
/// mark the joker lane slots. Two lanes won ends the game.
fn win_lane(game: &mut GameState, lane_idx: usize, side: Side, outcome: &mut MoveOutcome) {
    let lane = &mut game.lanes[lane_idx];
    lane.won_by = Some(side);
    let returned = drain_lane_to_decks(lane, lane_idx, outcome);
    restock_decks(game, returned);

    if game.red_joker_lane.is_none() {
        game.red_joker_lane = Some(lane_idx);
    } else if game.black_joker_lane.is_none() {
        game.black_joker_lane = Some(lane_idx);
    }

    outcome.lanes_won.push(lane_idx);
    if game.lanes_won_by(side) == 2 {
        game.won_by = Some(side);
        game.has_ended = true;
        outcome.game_won = Some(side);
    }
}

/// Drain every row (middle included) into per-owner return piles, recording
/// ledger movements.
fn drain_lane_to_decks(
    lane: &mut Lane,
    lane_idx: usize,
    outcome: &mut MoveOutcome,
) -> Vec<PlacedCard> {
    let mut returned = Vec::new();
    for row in 0..LANE_ROWS {
        for placed in lane.rows[row].drain(..) {
            outcome.movements.push(CardMovement::new(
                CardStore::Lane {
                    lane: lane_idx,
                    row,
                },
                CardStore::Deck {
                    side: placed.owned_by,
                },
                placed.card,
            ));
            returned.push(placed);
        }
    }
    returned
}

/// Put returned cards back in their owners' decks and reshuffle each deck
/// that received any.
fn restock_decks(game: &mut GameState, returned: Vec<PlacedCard>) {
    let mut touched = [false, false];
    for placed in returned {
        touched[placed.owned_by as usize] = true;
        game.player_mut(placed.owned_by).deck.push(placed.card);
    }
    for (i, side) in [Side::Host, Side::Guest].into_iter().enumerate() {
        if touched[i] {
            reshuffle_deck(game, side);
        }
    }
}
