//! Card movement ledger records.
//!
//! Every physical relocation of a card (hand to lane, lane to middle, lane to
//! deck, lane to destroyed, deck to hand) is recorded as a `CardMovement` and
//! handed to the broadcast collaborator after a mutation completes.

use serde::Serialize;

use super::cards_types::{Card, Side};

/// A place a card can physically be.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardStore {
    Hand { side: Side },
    Deck { side: Side },
    Lane { lane: usize, row: usize },
    Destroyed,
}

impl CardStore {
    fn describe(&self) -> String {
        match self {
            CardStore::Hand { side } => format!("{} hand", side_label(*side)),
            CardStore::Deck { side } => format!("{} deck", side_label(*side)),
            CardStore::Lane { lane, row } => format!("lane {lane} row {row}"),
            CardStore::Destroyed => "destroyed".to_string(),
        }
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Host => "host",
        Side::Guest => "guest",
    }
}

/// One physical relocation. `card` is None after redaction, when revealing
/// the identity would leak an opponent's hidden draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMovement {
    pub from: CardStore,
    pub to: CardStore,
    pub card: Option<Card>,
    pub notation: String,
}

impl CardMovement {
    pub fn new(from: CardStore, to: CardStore, card: Card) -> Self {
        let notation = format!("{card} {} \u{2192} {}", from.describe(), to.describe());
        Self {
            from,
            to,
            card: Some(card),
            notation,
        }
    }

    /// A copy with the card identity hidden.
    pub fn redacted(&self) -> Self {
        Self {
            from: self.from,
            to: self.to,
            card: None,
            notation: format!("{} \u{2192} {}", self.from.describe(), self.to.describe()),
        }
    }

    /// Whether showing this movement to `viewer` would reveal a card the
    /// opponent drew from their own deck.
    pub fn leaks_hidden_draw(&self, viewer: Side) -> bool {
        matches!(
            (self.from, self.to),
            (CardStore::Deck { side: from }, CardStore::Hand { side: to })
                if from != viewer && to != viewer
        )
    }
}
