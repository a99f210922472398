//! Service-level tests: full create/join/move/pass/draw/resign/disconnect
//! flows over the in-memory store, with a recording sink and paused tokio
//! time for the clock and grace timers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{FlowCode, GameFlowService};
use crate::config::GameConfig;
use crate::domain::state::{GameState, Move, PlaceCardAttempt};
use crate::domain::{generate_candidates, Card, Side};
use crate::store::{GameStore, InMemoryGameStore};
use crate::ws::protocol::{EndReason, ServerEvent};
use crate::ws::sink::MessageSink;

const HOST: &str = "conn-host";
const GUEST: &str = "conn-guest";

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(String, ServerEvent)>>,
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, connection_id: &str, event: ServerEvent) {
        self.events.lock().push((connection_id.to_string(), event));
    }
}

impl RecordingSink {
    fn kinds_for(&self, connection_id: &str) -> Vec<&'static str> {
        self.events
            .lock()
            .iter()
            .filter(|(c, _)| c == connection_id)
            .map(|(_, e)| e.kind())
            .collect()
    }

    fn last_for(&self, connection_id: &str) -> Option<ServerEvent> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|(c, _)| c == connection_id)
            .map(|(_, e)| e.clone())
    }
}

struct Fixture {
    service: GameFlowService,
    store: Arc<InMemoryGameStore>,
    sink: Arc<RecordingSink>,
    code: String,
}

impl Fixture {
    async fn started() -> Self {
        let store = Arc::new(InMemoryGameStore::new());
        let sink = Arc::new(RecordingSink::default());
        let service =
            GameFlowService::new(store.clone(), sink.clone(), GameConfig::default());
        let code = service.create_game(HOST).await.unwrap();
        service.join_game(GUEST, &code).await.unwrap();
        Self {
            service,
            store,
            sink,
            code,
        }
    }

    fn with_game<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let handle = self.store.find_by_code(&self.code).unwrap();
        let mut session = handle.lock();
        f(&mut session.game)
    }

    fn side_to_move(&self) -> Side {
        self.with_game(|g| g.side_to_move())
    }

    /// A legal single placement into the mover's breach row of lane 0.
    fn breach_move(&self) -> Move {
        self.with_game(|g| {
            g.candidate_moves
                .iter()
                .filter(|c| c.legal)
                .map(|c| c.mv.clone())
                .find(|m| m.attempts.len() == 1 && (m.attempts[0].row == 2 || m.attempts[0].row == 4))
                .expect("no breach move available")
        })
    }

    fn game_is_gone(&self) -> bool {
        self.store.find_by_code(&self.code).is_none()
    }

    /// Replace a side's hand, pulling the requested cards from whichever deck
    /// holds them.
    fn force_hand(&self, side: Side, tokens: &[&str]) {
        self.with_game(|game| {
            let old: Vec<Card> = game.player_mut(side).hand.drain(..).collect();
            game.player_mut(side).deck.extend(old);
            for token in tokens {
                let wanted: Card = token.parse().unwrap();
                for owner in [Side::Host, Side::Guest] {
                    let player = game.player_mut(owner);
                    if let Some(idx) = player.deck.iter().position(|c| *c == wanted) {
                        player.deck.remove(idx);
                        break;
                    }
                    if let Some(idx) = player.hand.iter().position(|c| *c == wanted) {
                        player.hand.remove(idx);
                        break;
                    }
                }
                game.player_mut(side).hand.push(wanted);
            }
            let to_move = game.side_to_move();
            game.candidate_moves = generate_candidates(game, to_move);
        });
    }
}

#[tokio::test(start_paused = true)]
async fn join_starts_the_game_and_notifies_both_seats() {
    let fx = Fixture::started().await;

    assert_eq!(fx.sink.kinds_for(HOST), vec!["game_created", "game_started"]);
    assert_eq!(fx.sink.kinds_for(GUEST), vec!["game_started"]);
    assert_eq!(fx.side_to_move(), Side::Host);
    assert!(fx.store.find_by_connection(HOST).is_some());
    assert!(fx.store.find_by_connection(GUEST).is_some());

    match fx.sink.last_for(GUEST).unwrap() {
        ServerEvent::GameStarted { view, clocks, .. } => {
            assert_eq!(view.hand.len(), 5);
            assert_eq!(view.opponent_hand_count, 5);
            assert!(!view.is_your_turn);
            assert_eq!(clocks.your_remaining_ms, 300_000);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn joining_an_unknown_code_is_not_found() {
    let store = Arc::new(InMemoryGameStore::new());
    let sink = Arc::new(RecordingSink::default());
    let service = GameFlowService::new(store, sink, GameConfig::default());
    let err = service.join_game(GUEST, "ZZZZ").await.unwrap_err();
    assert_eq!(err.code(), "PENDING_GAME_NOT_FOUND");
}

#[tokio::test(start_paused = true)]
async fn a_legal_move_hands_the_turn_over() {
    let fx = Fixture::started().await;
    let mv = fx.breach_move();

    let outcome = fx.service.make_move(HOST, mv, None).await.unwrap();

    assert_eq!(outcome.code, FlowCode::Ok);
    assert_eq!(outcome.view.hand.len(), 5, "mover redraws to five");
    assert_eq!(fx.side_to_move(), Side::Guest);
    assert!(fx.sink.kinds_for(GUEST).contains(&"game_view"));

    let handle = fx.store.find_by_code(&fx.code).unwrap();
    let session = handle.lock();
    assert_eq!(session.clocks.running_side(), Some(Side::Guest));
    assert!(session.game.candidate_moves.iter().any(|c| c.legal));
}

#[tokio::test(start_paused = true)]
async fn moves_outside_the_candidate_snapshot_are_rejected() {
    let fx = Fixture::started().await;
    let card = fx.with_game(|g| g.host.hand[0]);
    // Row 3 placements are never enumerated.
    let bogus = Move::single(PlaceCardAttempt { card, lane: 0, row: 3 });

    let outcome = fx.service.make_move(HOST, bogus, None).await.unwrap();

    assert_eq!(outcome.code, FlowCode::Rejected);
    assert!(outcome.reason.unwrap().contains("candidate set"));
    assert_eq!(fx.side_to_move(), Side::Host, "state unchanged");
    assert!(matches!(
        fx.sink.last_for(HOST),
        Some(ServerEvent::MoveRejected { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn off_turn_submissions_are_rejected() {
    let fx = Fixture::started().await;
    let mv = fx.breach_move();
    let outcome = fx.service.make_move(GUEST, mv, None).await.unwrap();
    assert_eq!(outcome.code, FlowCode::Rejected);
    assert_eq!(outcome.reason.unwrap(), "not your turn");
}

#[tokio::test(start_paused = true)]
async fn an_opponent_with_no_moves_is_skipped() {
    let fx = Fixture::started().await;
    // Close lanes 1-4 and pin lane 0 so only clubs can follow; the guest
    // holds nothing compatible.
    fx.with_game(|game| {
        for lane_idx in 1..5 {
            game.lanes[lane_idx].won_by = Some(Side::Guest);
        }
    });
    fx.force_hand(Side::Guest, &["5H", "6H", "7H", "8H", "9H"]);
    fx.force_hand(Side::Host, &["3C", "4C", "2D", "2H", "2S"]);

    let mv = fx.with_game(|g| {
        g.candidate_moves
            .iter()
            .filter(|c| c.legal)
            .map(|c| c.mv.clone())
            .find(|m| {
                m.attempts.len() == 1
                    && m.attempts[0].row == 2
                    && m.attempts[0].lane == 0
                    && m.attempts[0].card == "3C".parse().unwrap()
            })
            .expect("3C breach move missing")
    });
    let outcome = fx.service.make_move(HOST, mv, None).await.unwrap();

    assert_eq!(outcome.code, FlowCode::TurnSkippedNoMoves);
    assert_eq!(fx.side_to_move(), Side::Host);
    assert!(fx.sink.kinds_for(GUEST).contains(&"turn_skipped"));
    assert!(fx.sink.kinds_for(HOST).contains(&"turn_skipped"));
}

#[tokio::test(start_paused = true)]
async fn mutual_lockout_ends_in_stalemate() {
    let fx = Fixture::started().await;
    fx.with_game(|game| {
        for lane in &mut game.lanes {
            lane.won_by = Some(Side::Guest);
        }
        game.candidate_moves = generate_candidates(game, Side::Host);
    });

    // The host has nothing to play either, so passing detects the deadlock.
    let outcome = fx.service.pass_move(HOST).await.unwrap();

    assert_eq!(outcome.code, FlowCode::GameEnded);
    assert!(fx.game_is_gone());
    match fx.sink.last_for(HOST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, None);
            assert_eq!(reason, EndReason::Stalemate);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn three_consecutive_passes_end_the_game() {
    let fx = Fixture::started().await;

    let first = fx.service.pass_move(HOST).await.unwrap();
    assert_eq!(first.code, FlowCode::Ok);
    assert_eq!(first.view.hand.len(), 5);
    let second = fx.service.pass_move(GUEST).await.unwrap();
    assert_eq!(second.code, FlowCode::Ok);
    let third = fx.service.pass_move(HOST).await.unwrap();

    assert_eq!(third.code, FlowCode::GameEnded);
    assert!(fx.game_is_gone());
    match fx.sink.last_for(GUEST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, None);
            assert_eq!(reason, EndReason::PassedOut);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn a_move_resets_the_pass_streak() {
    let fx = Fixture::started().await;
    fx.service.pass_move(HOST).await.unwrap();
    fx.service.pass_move(GUEST).await.unwrap();
    let mv = fx.breach_move();
    fx.service.make_move(HOST, mv, None).await.unwrap();
    fx.service.pass_move(GUEST).await.unwrap();
    fx.service.pass_move(HOST).await.unwrap();
    // Only two passes since the placement.
    assert!(!fx.game_is_gone());
}

#[tokio::test(start_paused = true)]
async fn resignation_awards_the_opponent() {
    let fx = Fixture::started().await;
    let outcome = fx.service.resign_game(GUEST).await.unwrap();
    assert_eq!(outcome.code, FlowCode::GameEnded);
    assert!(fx.game_is_gone());
    match fx.sink.last_for(HOST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, Some(Side::Host));
            assert_eq!(reason, EndReason::Resignation);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn draw_offers_can_be_accepted_or_declined() {
    let fx = Fixture::started().await;

    fx.service.offer_draw(HOST).await.unwrap();
    assert!(matches!(
        fx.sink.last_for(GUEST),
        Some(ServerEvent::DrawOffered { by: Side::Host })
    ));

    fx.service.decline_draw(GUEST).await.unwrap();
    assert!(matches!(
        fx.sink.last_for(HOST),
        Some(ServerEvent::DrawDeclined { by: Side::Guest })
    ));
    assert!(!fx.game_is_gone());

    fx.service.offer_draw(GUEST).await.unwrap();
    let outcome = fx.service.accept_draw(HOST).await.unwrap();
    assert_eq!(outcome.code, FlowCode::GameEnded);
    assert!(fx.game_is_gone());
    match fx.sink.last_for(GUEST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, None);
            assert_eq!(reason, EndReason::DrawAgreed);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn accepting_a_missing_draw_offer_is_a_conflict() {
    let fx = Fixture::started().await;
    let err = fx.service.accept_draw(HOST).await.unwrap_err();
    assert_eq!(err.code(), "NO_DRAW_OFFER");
}

#[tokio::test(start_paused = true)]
async fn running_out_of_clock_loses_the_game() {
    let fx = Fixture::started().await;

    tokio::time::sleep(Duration::from_secs(301)).await;
    tokio::task::yield_now().await;

    assert!(fx.game_is_gone());
    match fx.sink.last_for(HOST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, Some(Side::Guest), "host was on the clock");
            assert_eq!(reason, EndReason::ClockTimeout);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn moving_reschedules_the_clock_for_the_other_side() {
    let fx = Fixture::started().await;

    // Host thinks for two minutes, then moves.
    tokio::time::sleep(Duration::from_secs(120)).await;
    let mv = fx.breach_move();
    fx.service.make_move(HOST, mv, None).await.unwrap();

    // 4 more minutes: guest's full five-minute clock has not expired.
    tokio::time::sleep(Duration::from_secs(240)).await;
    tokio::task::yield_now().await;
    assert!(!fx.game_is_gone());

    // But another 90 seconds finishes the guest off.
    tokio::time::sleep(Duration::from_secs(90)).await;
    tokio::task::yield_now().await;
    assert!(fx.game_is_gone());
    match fx.sink.last_for(GUEST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, Some(Side::Host));
            assert_eq!(reason, EndReason::ClockTimeout);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn disconnect_grace_forfeits_the_absent_side() {
    let fx = Fixture::started().await;

    fx.service.mark_disconnected(GUEST).await.unwrap();
    assert!(matches!(
        fx.sink.last_for(HOST),
        Some(ServerEvent::OpponentDisconnected { grace_secs: 30 })
    ));

    tokio::time::sleep(Duration::from_secs(31)).await;
    tokio::task::yield_now().await;

    assert!(fx.game_is_gone());
    match fx.sink.last_for(HOST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, Some(Side::Host));
            assert_eq!(reason, EndReason::DisconnectTimeout);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn reconnecting_cancels_the_grace_timer_and_rebinds() {
    let fx = Fixture::started().await;

    fx.service.mark_disconnected(GUEST).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let outcome = fx.service.reconnect(&fx.code, "conn-guest-2").await.unwrap();
    assert_eq!(outcome.code, FlowCode::Ok);
    assert!(fx.store.find_by_connection("conn-guest-2").is_some());
    assert!(fx.store.find_by_connection(GUEST).is_none());
    assert!(matches!(
        fx.sink.last_for(HOST),
        Some(ServerEvent::OpponentReconnected)
    ));
    assert!(matches!(
        fx.sink.last_for("conn-guest-2"),
        Some(ServerEvent::GameView { .. })
    ));

    // Long past the grace deadline: the game is still alive.
    tokio::time::sleep(Duration::from_secs(60)).await;
    tokio::task::yield_now().await;
    assert!(!fx.game_is_gone());
}

#[tokio::test(start_paused = true)]
async fn both_sides_disconnected_ends_immediately() {
    let fx = Fixture::started().await;

    fx.service.mark_disconnected(HOST).await.unwrap();
    fx.service.mark_disconnected(GUEST).await.unwrap();

    assert!(fx.game_is_gone());
    match fx.sink.last_for(HOST).unwrap() {
        ServerEvent::GameEnded { winner, reason, .. } => {
            assert_eq!(winner, None);
            assert_eq!(reason, EndReason::Abandoned);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn disconnecting_a_pending_host_drops_the_pending_game() {
    let store = Arc::new(InMemoryGameStore::new());
    let sink = Arc::new(RecordingSink::default());
    let service = GameFlowService::new(store.clone(), sink, GameConfig::default());
    let code = service.create_game(HOST).await.unwrap();

    service.mark_disconnected(HOST).await.unwrap();

    let err = service.join_game(GUEST, &code).await.unwrap_err();
    assert_eq!(err.code(), "PENDING_GAME_NOT_FOUND");
}

#[test]
fn hand_reorders_must_be_permutations() {
    let mut game = crate::domain::dealing::new_game(8);
    let mut reordered = game.host.hand.clone();
    reordered.reverse();
    GameFlowService::apply_hand_reorder(&mut game, Side::Host, reordered.clone());
    assert_eq!(game.host.hand, reordered);

    let bogus = vec![reordered[0]; 5];
    let before = game.host.hand.clone();
    GameFlowService::apply_hand_reorder(&mut game, Side::Host, bogus);
    assert_eq!(game.host.hand, before, "non-permutation ignored");
}
