//! Entire game container, sufficient for pure domain operations.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::cards_types::{Card, Side};
use super::lane::{Lane, LANE_COUNT};
use super::validator::RejectReason;

/// Cards a player holds after each of their turns.
pub const HAND_SIZE: usize = 5;

/// Cards each side starts with (half of a standard deck).
pub const DECK_SIZE: usize = 26;

/// Explicit passes (by either side, with no placement in between) that end
/// the game with no winner.
pub const PASS_LIMIT: u8 = 3;

/// One half of the table: a player's deck, hand, and destroyed pile.
///
/// Every card a side owns is in exactly one of these collections or on a
/// lane; the four together always total 26.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub destroyed: Vec<Card>,
}

/// A single card placement within a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlaceCardAttempt {
    pub card: Card,
    pub lane: usize,
    pub row: usize,
}

/// A move: one placement, or an ordered stack of same-kind placements.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub attempts: Vec<PlaceCardAttempt>,
}

impl Move {
    pub fn single(attempt: PlaceCardAttempt) -> Self {
        Self {
            attempts: vec![attempt],
        }
    }

    /// History/display notation: attempt tokens joined with '+'.
    pub fn notation(&self) -> String {
        self.attempts
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// A precomputed, validator-checked move for the side to act. The snapshot of
/// all of these for a turn powers stalemate detection and the desync guard.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub mv: Move,
    pub legal: bool,
    pub reason: Option<RejectReason>,
}

/// One entry of the move history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub side: Side,
    pub notation: String,
    #[serde(with = "time::serde::rfc3339")]
    pub played_at: OffsetDateTime,
}

/// Full authoritative game state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub lanes: [Lane; LANE_COUNT],
    pub host: PlayerState,
    pub guest: PlayerState,
    pub host_turn: bool,
    /// Winner once the game has ended with one; stays None for draws.
    pub won_by: Option<Side>,
    pub has_ended: bool,
    /// First and second lane won (by any player), in order.
    pub red_joker_lane: Option<usize>,
    pub black_joker_lane: Option<usize>,
    pub move_history: Vec<HistoryEntry>,
    /// Candidate snapshot for the side currently to act.
    pub candidate_moves: Vec<CandidateMove>,
    pub consecutive_passes: u8,
    pub draw_offered_by: Option<Side>,
    /// Base seed all in-game shuffles derive from.
    pub rng_seed: u64,
    /// Bumped on every shuffle so derived seeds never repeat.
    pub shuffle_count: u32,
    pub created_at: OffsetDateTime,
}

impl GameState {
    pub fn player(&self, side: Side) -> &PlayerState {
        match side {
            Side::Host => &self.host,
            Side::Guest => &self.guest,
        }
    }

    pub fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        match side {
            Side::Host => &mut self.host,
            Side::Guest => &mut self.guest,
        }
    }

    pub fn side_to_move(&self) -> Side {
        if self.host_turn {
            Side::Host
        } else {
            Side::Guest
        }
    }

    pub fn set_turn(&mut self, side: Side) {
        self.host_turn = side == Side::Host;
    }

    pub fn lanes_won_by(&self, side: Side) -> usize {
        self.lanes.iter().filter(|l| l.won_by == Some(side)).count()
    }

    /// The next seed for a deck shuffle. Mixing the bumped counter into the
    /// base seed keeps every shuffle deterministic per game yet distinct.
    pub fn next_shuffle_seed(&mut self) -> u64 {
        self.shuffle_count += 1;
        self.rng_seed
            .wrapping_add((self.shuffle_count as u64).wrapping_mul(0x9E37_79B9))
    }

    pub fn record_move(&mut self, side: Side, notation: impl Into<String>) {
        self.move_history.push(HistoryEntry {
            side,
            notation: notation.into(),
            played_at: OffsetDateTime::now_utc(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_types::{Kind, Suit};

    #[test]
    fn turn_helpers_agree() {
        let mut game = crate::domain::dealing::new_game(7);
        assert_eq!(game.side_to_move(), Side::Host);
        game.set_turn(Side::Guest);
        assert_eq!(game.side_to_move(), Side::Guest);
        assert!(!game.host_turn);
    }

    #[test]
    fn shuffle_seeds_never_repeat() {
        let mut game = crate::domain::dealing::new_game(7);
        let a = game.next_shuffle_seed();
        let b = game.next_shuffle_seed();
        let c = game.next_shuffle_seed();
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn move_notation_joins_attempts() {
        let mv = Move {
            attempts: vec![
                PlaceCardAttempt {
                    card: Card {
                        suit: Suit::Hearts,
                        kind: Kind::Five,
                    },
                    lane: 0,
                    row: 2,
                },
                PlaceCardAttempt {
                    card: Card {
                        suit: Suit::Spades,
                        kind: Kind::Five,
                    },
                    lane: 0,
                    row: 4,
                },
            ],
        };
        assert_eq!(mv.notation(), "5H02+5S04");
    }
}
