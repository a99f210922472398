//! Deterministic deck handling: the initial 26/26 split and every in-game
//! reshuffle derive from the game's base seed, so a whole game replays
//! identically from (seed, move list).

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use time::OffsetDateTime;

use super::cards_types::{Card, Side, ALL_KINDS, ALL_SUITS};
use super::movement::{CardMovement, CardStore};
use super::state::{GameState, PlayerState, HAND_SIZE};

/// Generate a full 52-card deck in standard order.
fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in ALL_SUITS {
        for kind in ALL_KINDS {
            deck.push(Card { suit, kind });
        }
    }
    deck
}

fn shuffle_with_seed(cards: &mut [Card], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    cards.shuffle(&mut rng);
}

/// Create a fresh game: shuffle one deck, split it into two 26-card halves,
/// and draw each side's opening hand. The host moves first.
pub fn new_game(seed: u64) -> GameState {
    let mut deck = full_deck();
    shuffle_with_seed(&mut deck, seed);
    let guest_half = deck.split_off(deck.len() / 2);

    let mut game = GameState {
        lanes: Default::default(),
        host: PlayerState {
            deck,
            hand: Vec::new(),
            destroyed: Vec::new(),
        },
        guest: PlayerState {
            deck: guest_half,
            hand: Vec::new(),
            destroyed: Vec::new(),
        },
        host_turn: true,
        won_by: None,
        has_ended: false,
        red_joker_lane: None,
        black_joker_lane: None,
        move_history: Vec::new(),
        candidate_moves: Vec::new(),
        consecutive_passes: 0,
        draw_offered_by: None,
        rng_seed: seed,
        shuffle_count: 0,
        created_at: OffsetDateTime::now_utc(),
    };
    draw_to_hand_size(&mut game, Side::Host);
    draw_to_hand_size(&mut game, Side::Guest);
    game
}

/// Reshuffle a side's deck in place with the game's next derived seed.
pub fn reshuffle_deck(game: &mut GameState, side: Side) {
    let seed = game.next_shuffle_seed();
    shuffle_with_seed(&mut game.player_mut(side).deck, seed);
}

/// Draw from the deck until the hand is back at `HAND_SIZE` (or the deck runs
/// out), recording one ledger movement per drawn card.
pub fn draw_to_hand_size(game: &mut GameState, side: Side) -> Vec<CardMovement> {
    let player = game.player_mut(side);
    let mut movements = Vec::new();
    while player.hand.len() < HAND_SIZE {
        let Some(card) = player.deck.pop() else {
            break;
        };
        player.hand.push(card);
        movements.push(CardMovement::new(
            CardStore::Deck { side },
            CardStore::Hand { side },
            card,
        ));
    }
    movements
}

/// A pass: the whole hand goes back into the deck, the deck is reshuffled,
/// and a fresh hand of five is drawn.
pub fn redraw_hand(game: &mut GameState, side: Side) -> Vec<CardMovement> {
    let player = game.player_mut(side);
    let mut movements: Vec<CardMovement> = player
        .hand
        .drain(..)
        .map(|card| {
            CardMovement::new(CardStore::Hand { side }, CardStore::Deck { side }, card)
        })
        .collect();
    let returned: Vec<Card> = movements.iter().filter_map(|m| m.card).collect();
    player.deck.extend(returned);
    reshuffle_deck(game, side);
    movements.extend(draw_to_hand_size(game, side));
    movements
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_game_is_deterministic() {
        let a = new_game(12345);
        let b = new_game(12345);
        assert_eq!(a.host.deck, b.host.deck);
        assert_eq!(a.guest.hand, b.guest.hand);
    }

    #[test]
    fn different_seeds_differ() {
        let a = new_game(12345);
        let b = new_game(54321);
        assert_ne!(a.host.deck, b.host.deck);
    }

    #[test]
    fn split_is_disjoint_and_complete() {
        let game = new_game(42);
        let mut all: Vec<Card> = Vec::new();
        all.extend(&game.host.deck);
        all.extend(&game.host.hand);
        all.extend(&game.guest.deck);
        all.extend(&game.guest.hand);
        assert_eq!(all.len(), 52);
        let unique: HashSet<Card> = all.into_iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn opening_hands_are_drawn() {
        let game = new_game(7);
        assert_eq!(game.host.hand.len(), HAND_SIZE);
        assert_eq!(game.guest.hand.len(), HAND_SIZE);
        assert_eq!(game.host.deck.len(), 26 - HAND_SIZE);
        assert_eq!(game.guest.deck.len(), 26 - HAND_SIZE);
    }

    #[test]
    fn redraw_keeps_hand_at_five() {
        let mut game = new_game(7);
        let before: HashSet<Card> = game
            .host
            .hand
            .iter()
            .chain(&game.host.deck)
            .copied()
            .collect();
        let movements = redraw_hand(&mut game, Side::Host);
        assert_eq!(game.host.hand.len(), HAND_SIZE);
        // 5 returns + 5 draws
        assert_eq!(movements.len(), 10);
        let after: HashSet<Card> = game
            .host
            .hand
            .iter()
            .chain(&game.host.deck)
            .copied()
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn draw_stops_on_empty_deck() {
        let mut game = new_game(7);
        game.host.deck.clear();
        game.host.hand.truncate(2);
        let movements = draw_to_hand_size(&mut game, Side::Host);
        assert!(movements.is_empty());
        assert_eq!(game.host.hand.len(), 2);
    }
}
