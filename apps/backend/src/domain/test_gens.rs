// Proptest generators for domain types.

use proptest::prelude::*;

use super::cards_types::{Card, Kind, Suit};
use super::lane::{LANE_COUNT, LANE_ROWS};
use super::state::PlaceCardAttempt;

/// Generate a random Suit
pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Clubs),
        Just(Suit::Diamonds),
        Just(Suit::Hearts),
        Just(Suit::Spades),
    ]
}

/// Generate a random Kind
pub fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Two),
        Just(Kind::Three),
        Just(Kind::Four),
        Just(Kind::Five),
        Just(Kind::Six),
        Just(Kind::Seven),
        Just(Kind::Eight),
        Just(Kind::Nine),
        Just(Kind::Ten),
        Just(Kind::Jack),
        Just(Kind::Queen),
        Just(Kind::King),
        Just(Kind::Ace),
    ]
}

/// Generate a random Card
pub fn card() -> impl Strategy<Value = Card> {
    (kind(), suit()).prop_map(|(kind, suit)| Card { kind, suit })
}

/// Generate a random placement attempt anywhere on the board.
pub fn attempt() -> impl Strategy<Value = PlaceCardAttempt> {
    (card(), 0..LANE_COUNT, 0..LANE_ROWS).prop_map(|(card, lane, row)| PlaceCardAttempt {
        card,
        lane,
        row,
    })
}
