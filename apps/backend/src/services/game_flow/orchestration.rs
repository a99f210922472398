//! Shared post-action processing: turn hand-off, candidate recompute, forced
//! skips, stalemate detection, clock switching, timer scheduling, and game
//! finalization.

use std::sync::Arc;

use rand::Rng;
use tokio::time::Instant;
use tracing::{info, warn};

use super::{FlowCode, GameFlowService};
use crate::clock::TimerHandle;
use crate::domain::candidates::{any_legal, generate_candidates};
use crate::domain::movement::CardMovement;
use crate::domain::player_view::redacted_view;
use crate::domain::Side;
use crate::error::EngineError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::store::{ConnectionId, GameHandle, GameSession};
use crate::ws::protocol::{ClockView, EndReason, ServerEvent};

/// Messages to deliver once the per-game lock is released.
pub(super) type Outbox = Vec<(ConnectionId, ServerEvent)>;

impl GameFlowService {
    pub(super) fn require_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Arc<GameHandle>, EngineError> {
        self.store.find_by_connection(connection_id).ok_or_else(|| {
            EngineError::from(DomainError::not_found(
                NotFoundKind::Connection,
                format!("no game for connection {connection_id}"),
            ))
        })
    }

    pub(super) fn require_seat(
        session: &GameSession,
        connection_id: &str,
    ) -> Result<Side, EngineError> {
        session.side_of(connection_id).ok_or_else(|| {
            EngineError::from(DomainError::not_found(
                NotFoundKind::Connection,
                format!(
                    "connection {connection_id} holds no seat in game {}",
                    session.code
                ),
            ))
        })
    }

    pub(super) async fn deliver(&self, outbox: Outbox) {
        for (connection_id, event) in outbox {
            self.sink.send(&connection_id, event).await;
        }
    }

    pub(super) fn clock_view(session: &GameSession, viewer: Side, now: Instant) -> ClockView {
        ClockView {
            your_remaining_ms: session
                .clocks
                .remaining(viewer, session.clock_duration, now)
                .as_millis() as u64,
            opponent_remaining_ms: session
                .clocks
                .remaining(viewer.opponent(), session.clock_duration, now)
                .as_millis() as u64,
        }
    }

    /// A `GameView` for each seat, with the movement ledger redacted per
    /// viewer.
    pub(super) fn view_events(
        session: &GameSession,
        movements: &[CardMovement],
        now: Instant,
    ) -> Outbox {
        [Side::Host, Side::Guest]
            .into_iter()
            .map(|side| {
                (
                    session.seat(side).connection_id.clone(),
                    ServerEvent::GameView {
                        view: redacted_view(&session.game, side, movements),
                        clocks: Self::clock_view(session, side, now),
                    },
                )
            })
            .collect()
    }

    /// Everything that happens after a successful move or pass: hand the turn
    /// over, recompute the candidate snapshot, skip the turn back if the next
    /// side has nothing legal (ending the game if neither side does), switch
    /// the clocks, and reschedule the turn timer.
    pub(super) fn advance_after_action(
        &self,
        session: &mut GameSession,
        movements: &[CardMovement],
    ) -> (FlowCode, Outbox) {
        let now = Instant::now();

        if session.game.has_ended {
            let winner = session.game.won_by;
            let outbox = self.finalize_locked(session, EndReason::LanesWon, winner, movements, now);
            return (FlowCode::GameEnded, outbox);
        }

        let mover = session.game.side_to_move();
        let next = mover.opponent();
        session.game.set_turn(next);
        session.game.candidate_moves = generate_candidates(&session.game, next);

        let mut code = FlowCode::Ok;
        let mut skipped: Option<Side> = None;
        if !any_legal(&session.game.candidate_moves) {
            session.game.set_turn(mover);
            session.game.candidate_moves = generate_candidates(&session.game, mover);
            if any_legal(&session.game.candidate_moves) {
                info!(game_code = %session.code, side = ?next, "turn skipped, no legal moves");
                code = FlowCode::TurnSkippedNoMoves;
                skipped = Some(next);
            } else {
                info!(game_code = %session.code, "no legal moves for either side, game ends");
                let outbox =
                    self.finalize_locked(session, EndReason::Stalemate, None, movements, now);
                return (FlowCode::GameEnded, outbox);
            }
        }

        let active = session.game.side_to_move();
        session.clocks.switch_to(active, now);
        self.reschedule_turn_timer(session, now);

        let mut outbox = Outbox::new();
        if let Some(side) = skipped {
            for seat in [Side::Host, Side::Guest] {
                outbox.push((
                    session.seat(seat).connection_id.clone(),
                    ServerEvent::TurnSkipped { side },
                ));
            }
        }
        outbox.extend(Self::view_events(session, movements, now));
        (code, outbox)
    }

    /// Cancel the previous turn timer and schedule a fresh one for whatever
    /// time the active side has left.
    pub(super) fn reschedule_turn_timer(&self, session: &mut GameSession, now: Instant) {
        let active = session.game.side_to_move();
        let remaining = session.clocks.remaining(active, session.clock_duration, now);
        let service = self.clone();
        let code = session.code.clone();
        session.timers.turn = Some(TimerHandle::spawn(remaining, async move {
            service.handle_turn_timeout(&code).await;
        }));
    }

    /// Terminal transition: mark the game ended, stop the clocks, cancel the
    /// timers, drop the game from the store, and build `GameEnded` events.
    pub(super) fn finalize_locked(
        &self,
        session: &mut GameSession,
        reason: EndReason,
        winner: Option<Side>,
        movements: &[CardMovement],
        now: Instant,
    ) -> Outbox {
        session.game.has_ended = true;
        session.game.won_by = winner;
        session.clocks.halt(now);
        session.timers.cancel_all();
        self.store.remove(&session.code);
        info!(game_code = %session.code, ?winner, ?reason, "game ended");

        [Side::Host, Side::Guest]
            .into_iter()
            .map(|side| {
                (
                    session.seat(side).connection_id.clone(),
                    ServerEvent::GameEnded {
                        winner,
                        reason,
                        view: redacted_view(&session.game, side, movements),
                    },
                )
            })
            .collect()
    }

    /// Clock timeout callback. Re-validates under the lock: the game may have
    /// ended, or a move may have switched the turn, between scheduling and
    /// firing.
    pub(crate) async fn handle_turn_timeout(&self, code: &str) {
        let Some(handle) = self.store.find_by_code(code) else {
            return;
        };
        let outbox = {
            let mut session = handle.lock();
            if session.game.has_ended {
                return;
            }
            let now = Instant::now();
            let active = session.game.side_to_move();
            let remaining = session.clocks.remaining(active, session.clock_duration, now);
            if !remaining.is_zero() {
                // Raced with a concurrent turn switch; put a timer back for
                // whoever is actually on the clock.
                warn!(game_code = %code, remaining_ms = remaining.as_millis() as u64,
                    "turn timer fired with time left, rescheduling");
                self.reschedule_turn_timer(&mut session, now);
                Vec::new()
            } else {
                self.finalize_locked(
                    &mut session,
                    EndReason::ClockTimeout,
                    Some(active.opponent()),
                    &[],
                    now,
                )
            }
        };
        self.deliver(outbox).await;
    }

    /// Disconnect grace callback: if the seat is still disconnected when the
    /// grace period ends, the connected side wins.
    pub(crate) async fn handle_grace_timeout(&self, code: &str) {
        let Some(handle) = self.store.find_by_code(code) else {
            return;
        };
        let outbox = {
            let mut session = handle.lock();
            if session.game.has_ended {
                return;
            }
            let Some(gone) = session.disconnected_side() else {
                return;
            };
            let now = Instant::now();
            info!(game_code = %code, side = ?gone, "grace period expired without reconnect");
            self.finalize_locked(
                &mut session,
                EndReason::DisconnectTimeout,
                Some(gone.opponent()),
                &[],
                now,
            )
        };
        self.deliver(outbox).await;
    }

    /// A short uppercase code not currently used by any pending or running
    /// game.
    pub(super) fn generate_game_code(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..4)
                .map(|_| char::from(b'A' + rng.random_range(0..26)))
                .collect();
            if !self.store.contains_code(&code) {
                return code;
            }
        }
    }
}
