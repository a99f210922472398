//! Per-player view of game state - what information a client may see.
//!
//! Lanes, destroyed piles, jokers, and the move history are public. A
//! player's own hand is private to them; opponents see only counts. Ledger
//! movements that would reveal what the opponent drew are redacted.

use serde::Serialize;

use super::cards_types::{Card, Side};
use super::lane::{Lane, LANE_COUNT};
use super::movement::CardMovement;
use super::state::{GameState, HistoryEntry, Move};

/// Everything one player is allowed to know about a game, plus the legal
/// moves precomputed for them when it is their turn.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerGameView {
    pub side: Side,
    pub is_your_turn: bool,
    pub hand: Vec<Card>,
    pub deck_count: usize,
    pub destroyed: Vec<Card>,
    pub opponent_hand_count: usize,
    pub opponent_deck_count: usize,
    pub opponent_destroyed: Vec<Card>,
    pub lanes: [Lane; LANE_COUNT],
    pub won_by: Option<Side>,
    pub has_ended: bool,
    pub red_joker_lane: Option<usize>,
    pub black_joker_lane: Option<usize>,
    pub draw_offered_by: Option<Side>,
    /// Legal moves for the viewer; empty when it is not their turn.
    pub legal_moves: Vec<Move>,
    /// Ledger of the mutation that produced this view, redacted for the viewer.
    pub movements: Vec<CardMovement>,
    pub move_history: Vec<HistoryEntry>,
}

/// Build the view of `game` as seen by `viewer`, attaching the (redacted)
/// movements of the mutation that just happened.
pub fn redacted_view(game: &GameState, viewer: Side, movements: &[CardMovement]) -> PlayerGameView {
    let me = game.player(viewer);
    let them = game.player(viewer.opponent());

    let legal_moves = if game.side_to_move() == viewer && !game.has_ended {
        game.candidate_moves
            .iter()
            .filter(|c| c.legal)
            .map(|c| c.mv.clone())
            .collect()
    } else {
        Vec::new()
    };

    PlayerGameView {
        side: viewer,
        is_your_turn: !game.has_ended && game.side_to_move() == viewer,
        hand: me.hand.clone(),
        deck_count: me.deck.len(),
        destroyed: me.destroyed.clone(),
        opponent_hand_count: them.hand.len(),
        opponent_deck_count: them.deck.len(),
        opponent_destroyed: them.destroyed.clone(),
        lanes: game.lanes.clone(),
        won_by: game.won_by,
        has_ended: game.has_ended,
        red_joker_lane: game.red_joker_lane,
        black_joker_lane: game.black_joker_lane,
        draw_offered_by: game.draw_offered_by,
        legal_moves,
        movements: redact_movements(movements, viewer),
        move_history: game.move_history.clone(),
    }
}

/// Null the card identity of any movement that would leak an opponent draw.
pub fn redact_movements(movements: &[CardMovement], viewer: Side) -> Vec<CardMovement> {
    movements
        .iter()
        .map(|m| {
            if m.leaks_hidden_draw(viewer) {
                m.redacted()
            } else {
                m.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candidates::generate_candidates;
    use crate::domain::dealing::new_game;
    use crate::domain::movement::CardStore;

    #[test]
    fn opponent_hand_is_hidden() {
        let mut game = new_game(11);
        game.candidate_moves = generate_candidates(&game, Side::Host);

        let host_view = redacted_view(&game, Side::Host, &[]);
        assert_eq!(host_view.hand, game.host.hand);
        assert_eq!(host_view.opponent_hand_count, game.guest.hand.len());

        let guest_view = redacted_view(&game, Side::Guest, &[]);
        assert_eq!(guest_view.hand, game.guest.hand);
        assert!(!guest_view.is_your_turn);
        assert!(guest_view.legal_moves.is_empty());
        assert!(!host_view.legal_moves.is_empty());
    }

    #[test]
    fn opponent_draws_are_redacted_but_own_are_not() {
        let game = new_game(11);
        let card = game.guest.deck.last().copied().unwrap();
        let movements = vec![CardMovement::new(
            CardStore::Deck { side: Side::Guest },
            CardStore::Hand { side: Side::Guest },
            card,
        )];

        let host_view = redacted_view(&game, Side::Host, &movements);
        assert!(host_view.movements[0].card.is_none());

        let guest_view = redacted_view(&game, Side::Guest, &movements);
        assert_eq!(guest_view.movements[0].card, Some(card));
    }
}
