//! Candidate-move enumeration.
//!
//! For a side, every single-card placement and every same-kind stacked
//! placement is constructed and run through the validator. The resulting
//! snapshot powers three things: the desync/cheat guard on submitted moves,
//! forced turn-skips when a side has nothing legal, and mutual-stalemate
//! detection.

use super::cards_types::{Card, Side};
use super::lane::{is_own_side_row, next_row_outward, LANE_COUNT, PLACEMENT_ROWS};
use super::state::{CandidateMove, GameState, Move, PlaceCardAttempt};
use super::validator::validate_move;

/// Enumerate and validate every candidate move for `side`.
///
/// Deterministic for a given game state: running it twice yields the same
/// list in the same order.
pub fn generate_candidates(game: &GameState, side: Side) -> Vec<CandidateMove> {
    let hand = &game.player(side).hand;
    let mut out = Vec::new();

    for &card in hand {
        for lane in 0..LANE_COUNT {
            for row in PLACEMENT_ROWS {
                push_validated(
                    game,
                    side,
                    Move::single(PlaceCardAttempt { card, lane, row }),
                    &mut out,
                );

                // Stacks grow outward from a placement on the player's own
                // side, one same-kind card per subsequent row.
                if is_own_side_row(side, row) {
                    let partners: Vec<Card> = hand
                        .iter()
                        .copied()
                        .filter(|c| c.kind == card.kind && c.suit != card.suit)
                        .collect();
                    for selection in ordered_selections(&partners) {
                        if let Some(mv) = stacked_move(side, card, lane, row, &selection) {
                            push_validated(game, side, mv, &mut out);
                        }
                    }
                }
            }
        }
    }

    out
}

/// Whether any candidate in a snapshot is legal.
pub fn any_legal(candidates: &[CandidateMove]) -> bool {
    candidates.iter().any(|c| c.legal)
}

/// Find the snapshot entry matching a submitted move, if present.
pub fn find_candidate<'a>(candidates: &'a [CandidateMove], mv: &Move) -> Option<&'a CandidateMove> {
    candidates.iter().find(|c| &c.mv == mv)
}

fn push_validated(game: &GameState, side: Side, mv: Move, out: &mut Vec<CandidateMove>) {
    let result = validate_move(game, &mv, side);
    out.push(CandidateMove {
        mv,
        legal: result.is_ok(),
        reason: result.err(),
    });
}

/// Build the compound move extending `first` outward with `rest`, one row per
/// card, skipping the middle. None when the stack would run off the board.
fn stacked_move(
    side: Side,
    first: Card,
    lane: usize,
    row: usize,
    rest: &[Card],
) -> Option<Move> {
    let mut attempts = vec![PlaceCardAttempt {
        card: first,
        lane,
        row,
    }];
    let mut current = row;
    for &card in rest {
        current = next_row_outward(side, current)?;
        attempts.push(PlaceCardAttempt {
            card,
            lane,
            row: current,
        });
    }
    Some(Move { attempts })
}

/// Every ordered, non-empty selection of `cards`: each subset in each order.
/// Order matters because it determines the stacking sequence.
fn ordered_selections(cards: &[Card]) -> Vec<Vec<Card>> {
    let mut result = Vec::new();
    let mut current = Vec::new();
    let mut used = vec![false; cards.len()];
    extend_selections(cards, &mut used, &mut current, &mut result);
    result
}

fn extend_selections(
    cards: &[Card],
    used: &mut [bool],
    current: &mut Vec<Card>,
    result: &mut Vec<Vec<Card>>,
) {
    for i in 0..cards.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(cards[i]);
        result.push(current.clone());
        extend_selections(cards, used, current, result);
        current.pop();
        used[i] = false;
    }
}
