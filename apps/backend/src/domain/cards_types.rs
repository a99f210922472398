//! Core card-related types: Card, Kind, Suit, Side

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

/// Card kind, Two..Ace. The derived ordering encodes capture strength:
/// a greater kind beats a lesser one within the same suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Kind {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// Which player a thing belongs to. There are exactly two seats per game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Host,
    Guest,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Host => Side::Guest,
            Side::Guest => Side::Host,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub kind: Kind,
}

// Note: Ord/Eq on Card is only for stable sorting: suit order C<D<H<S then
// kind order. Capture comparisons in the rules always go through kind alone.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.kind.cmp(&other.kind),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A card sitting on a lane row. The owner tag exists only while the card is
/// on the board; decks and hands imply ownership structurally.
#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedCard {
    pub card: Card,
    pub owned_by: Side,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

pub const ALL_KINDS: [Kind; 13] = [
    Kind::Two,
    Kind::Three,
    Kind::Four,
    Kind::Five,
    Kind::Six,
    Kind::Seven,
    Kind::Eight,
    Kind::Nine,
    Kind::Ten,
    Kind::Jack,
    Kind::Queen,
    Kind::King,
    Kind::Ace,
];
