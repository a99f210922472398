//! Helpers for building specific board positions in tests.
//!
//! `game_with_hands` deals an explicit position while keeping the 26/26 card
//! split intact, and `play_from_hand` stages lane contents without going
//! through the executor, so rule tests control exactly what is on the board.

use super::cards_types::{Card, PlacedCard, Side, ALL_KINDS, ALL_SUITS};
use super::dealing::new_game;
use super::state::{GameState, Move, PlaceCardAttempt, DECK_SIZE};

pub fn card(token: &str) -> Card {
    token.parse().expect("bad card token in test")
}

pub fn single(token: &str, lane: usize, row: usize) -> Move {
    Move::single(PlaceCardAttempt {
        card: card(token),
        lane,
        row,
    })
}

pub fn attempts(specs: &[(&str, usize, usize)]) -> Move {
    Move {
        attempts: specs
            .iter()
            .map(|&(token, lane, row)| PlaceCardAttempt {
                card: card(token),
                lane,
                row,
            })
            .collect(),
    }
}

/// A fresh deterministic game.
pub fn fresh_game() -> GameState {
    new_game(0xC0FFEE)
}

/// A game whose hands are exactly the given cards (hands may exceed five for
/// staging). The remaining 52 cards are split so each side still owns 26.
pub fn game_with_hands(host_hand: &[&str], guest_hand: &[&str]) -> GameState {
    let mut pool: Vec<Card> = Vec::with_capacity(52);
    for suit in ALL_SUITS {
        for kind in ALL_KINDS {
            pool.push(Card { suit, kind });
        }
    }
    let mut take = |pool: &mut Vec<Card>, token: &str| -> Card {
        let wanted = card(token);
        let idx = pool
            .iter()
            .position(|c| *c == wanted)
            .expect("card listed twice in test hands");
        pool.remove(idx)
    };

    let host_cards: Vec<Card> = host_hand.iter().map(|t| take(&mut pool, t)).collect();
    let guest_cards: Vec<Card> = guest_hand.iter().map(|t| take(&mut pool, t)).collect();

    let mut game = new_game(0xC0FFEE);
    game.host.hand = host_cards;
    game.guest.hand = guest_cards;
    game.host.destroyed.clear();
    game.guest.destroyed.clear();
    let host_deck_len = DECK_SIZE - game.host.hand.len();
    game.host.deck = pool.drain(..host_deck_len).collect();
    game.guest.deck = pool;
    game
}

/// Move a card from a side's hand straight onto a lane row, bypassing the
/// executor. Keeps conservation intact since the card stays with its owner.
pub fn play_from_hand(game: &mut GameState, side: Side, token: &str, lane: usize, row: usize) {
    let wanted = card(token);
    let player = game.player_mut(side);
    let idx = player
        .hand
        .iter()
        .position(|c| *c == wanted)
        .expect("staged card is not in that hand");
    let c = player.hand.remove(idx);
    game.lanes[lane].rows[row].push(PlacedCard {
        card: c,
        owned_by: side,
    });
}

/// Per-side conservation count: deck + hand + destroyed + owned lane cards.
pub fn owned_total(game: &GameState, side: Side) -> usize {
    let player = game.player(side);
    player.deck.len()
        + player.hand.len()
        + player.destroyed.len()
        + game
            .lanes
            .iter()
            .map(|l| l.cards_owned_by(side))
            .sum::<usize>()
}
