//! Property-based tests: notation round-trips, generator idempotence, and
//! conservation/monotonicity invariants under random legal play.

use proptest::prelude::*;

use crate::domain::candidates::generate_candidates;
use crate::domain::cards_types::Side;
use crate::domain::dealing::{draw_to_hand_size, new_game};
use crate::domain::executor::execute_move;
use crate::domain::state::{CandidateMove, PlaceCardAttempt};
use crate::domain::test_gens;
use crate::domain::test_state_helpers::owned_total;

proptest! {
    /// Encoding then decoding any placement's notation yields the same
    /// (kind, suit, lane, row).
    #[test]
    fn prop_attempt_notation_round_trips(attempt in test_gens::attempt()) {
        let token = attempt.to_string();
        let parsed: PlaceCardAttempt = token.parse().unwrap();
        prop_assert_eq!(parsed, attempt);
    }

    /// Re-running the candidate generator on an unchanged game yields an
    /// identical candidate set.
    #[test]
    fn prop_candidate_generation_is_idempotent(seed in any::<u64>()) {
        let game = new_game(seed);
        let first = generate_candidates(&game, Side::Host);
        let second = generate_candidates(&game, Side::Host);
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Random legal play never breaks per-side card conservation, never
    /// un-wins a lane, and never overfills the board.
    #[test]
    fn prop_random_playout_preserves_invariants(
        seed in any::<u64>(),
        picks in proptest::collection::vec(any::<usize>(), 16),
    ) {
        let mut game = new_game(seed);
        let mut side = Side::Host;
        let mut lanes_won_seen: [Option<Side>; 5] = [None; 5];

        for pick in picks {
            game.set_turn(side);
            let candidates = generate_candidates(&game, side);
            let legal: Vec<&CandidateMove> =
                candidates.iter().filter(|c| c.legal).collect();
            if legal.is_empty() {
                side = side.opponent();
                continue;
            }
            let mv = legal[pick % legal.len()].mv.clone();
            execute_move(&mut game, side, &mv).unwrap();
            draw_to_hand_size(&mut game, side);

            prop_assert_eq!(owned_total(&game, Side::Host), 26);
            prop_assert_eq!(owned_total(&game, Side::Guest), 26);

            for (i, lane) in game.lanes.iter().enumerate() {
                if let Some(winner) = lanes_won_seen[i] {
                    prop_assert_eq!(lane.won_by, Some(winner), "lane win flipped");
                }
                if let Some(winner) = lane.won_by {
                    lanes_won_seen[i] = Some(winner);
                }
                prop_assert!(lane.card_count() <= 52);
                // A won lane is always emptied on the spot.
                if lane.won_by.is_some() {
                    prop_assert!(lane.is_empty());
                }
            }

            if game.has_ended {
                prop_assert!(game.won_by.is_some());
                break;
            }
            side = side.opponent();
        }
    }
}
