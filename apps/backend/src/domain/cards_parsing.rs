//! Card and placement notation (e.g., "AS", "2C", "AS05").

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::cards_types::{Card, Kind, Suit};
use super::state::PlaceCardAttempt;
use crate::errors::domain::{DomainError, ValidationKind};

fn kind_char(kind: Kind) -> char {
    match kind {
        Kind::Two => '2',
        Kind::Three => '3',
        Kind::Four => '4',
        Kind::Five => '5',
        Kind::Six => '6',
        Kind::Seven => '7',
        Kind::Eight => '8',
        Kind::Nine => '9',
        Kind::Ten => 'T',
        Kind::Jack => 'J',
        Kind::Queen => 'Q',
        Kind::King => 'K',
        Kind::Ace => 'A',
    }
}

fn suit_char(suit: Suit) -> char {
    match suit {
        Suit::Clubs => 'C',
        Suit::Diamonds => 'D',
        Suit::Hearts => 'H',
        Suit::Spades => 'S',
    }
}

fn parse_kind(ch: char, token: &str) -> Result<Kind, DomainError> {
    Ok(match ch {
        '2' => Kind::Two,
        '3' => Kind::Three,
        '4' => Kind::Four,
        '5' => Kind::Five,
        '6' => Kind::Six,
        '7' => Kind::Seven,
        '8' => Kind::Eight,
        '9' => Kind::Nine,
        'T' => Kind::Ten,
        'J' => Kind::Jack,
        'Q' => Kind::Queen,
        'K' => Kind::King,
        'A' => Kind::Ace,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Parse card: {token}"),
            ))
        }
    })
}

fn parse_suit(ch: char, token: &str) -> Result<Suit, DomainError> {
    Ok(match ch {
        'C' => Suit::Clubs,
        'D' => Suit::Diamonds,
        'H' => Suit::Hearts,
        'S' => Suit::Spades,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Parse card: {token}"),
            ))
        }
    })
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", kind_char(self.kind), suit_char(self.suit))
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(kind_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Parse card: {s}"),
            ));
        };
        Ok(Card {
            kind: parse_kind(kind_ch, s)?,
            suit: parse_suit(suit_ch, s)?,
        })
    }
}

/// Placement notation: card token + lane digit + row digit, e.g. `AS05` is
/// the Ace of Spades into lane 0 row 5.
impl Display for PlaceCardAttempt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.card, self.lane, self.row)
    }
}

impl FromStr for PlaceCardAttempt {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || {
            DomainError::validation(
                ValidationKind::ParseNotation,
                format!("Parse placement: {s}"),
            )
        };
        if s.len() != 4 || !s.is_ascii() {
            return Err(bad());
        }
        let card: Card = s[..2].parse()?;
        let lane = s[2..3].parse::<usize>().map_err(|_| bad())?;
        let row = s[3..4].parse::<usize>().map_err(|_| bad())?;
        if lane >= super::lane::LANE_COUNT || row >= super::lane::LANE_ROWS {
            return Err(bad());
        }
        Ok(PlaceCardAttempt { card, lane, row })
    }
}

/// Non-panicking helper to parse card tokens (e.g., "AS", "2C") into Cards.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_tokens_round_trip() {
        for token in ["AS", "2C", "TD", "9H", "KS", "JC"] {
            let card: Card = token.parse().unwrap();
            assert_eq!(card.to_string(), token);
        }
    }

    #[test]
    fn rejects_invalid_card_tokens() {
        for token in ["1H", "11S", "Ah", "ZZ", "", "10H", "A"] {
            assert!(token.parse::<Card>().is_err(), "accepted {token:?}");
        }
    }

    #[test]
    fn placement_notation_round_trips() {
        for token in ["AS05", "2C40", "TH26", "5H02"] {
            let attempt: PlaceCardAttempt = token.parse().unwrap();
            assert_eq!(attempt.to_string(), token);
        }
    }

    #[test]
    fn rejects_out_of_range_placements() {
        assert!("AS55".parse::<PlaceCardAttempt>().is_err()); // lane 5
        assert!("AS07".parse::<PlaceCardAttempt>().is_err()); // row 7
        assert!("AS0".parse::<PlaceCardAttempt>().is_err());
        assert!("ASx5".parse::<PlaceCardAttempt>().is_err());
    }

    #[test]
    fn try_parse_cards_collects_or_fails() {
        let cards = try_parse_cards(["AS", "TD", "9C"]).unwrap();
        assert_eq!(cards.len(), 3);
        assert!(try_parse_cards(["AS", "1H"]).is_err());
    }
}
