//! Serde support for Card: serialized as its two-character token ("AS").

use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::Card;

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct CardVisitor;

impl Visitor<'_> for CardVisitor {
    type Value = Card;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a two-character card token like \"AS\"")
    }

    fn visit_str<E: DeError>(self, value: &str) -> Result<Card, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Card, D::Error> {
        deserializer.deserialize_str(CardVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_types::{Kind, Suit};

    #[test]
    fn serializes_as_token() {
        let card = Card {
            suit: Suit::Spades,
            kind: Kind::Ace,
        };
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"AS\"");
    }

    #[test]
    fn deserializes_from_token() {
        let card: Card = serde_json::from_str("\"TD\"").unwrap();
        assert_eq!(card.suit, Suit::Diamonds);
        assert_eq!(card.kind, Kind::Ten);
    }

    #[test]
    fn rejects_invalid_tokens() {
        for tok in ["1H", "11S", "Ah", "ZZ", "", "10H"] {
            let res: Result<Card, _> = serde_json::from_str(&format!("\"{tok}\""));
            assert!(res.is_err());
        }
    }
}
