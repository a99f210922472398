//! Player-initiated actions: create/join, moves, passes, draw offers, and
//! resignation.

use std::sync::Arc;

use rand::Rng;
use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::orchestration::Outbox;
use super::{FlowCode, FlowOutcome, GameFlowService};
use crate::clock::{GameClocks, TimerSlots};
use crate::domain::candidates::{find_candidate, generate_candidates};
use crate::domain::dealing::{draw_to_hand_size, new_game, redraw_hand};
use crate::domain::executor::execute_move;
use crate::domain::player_view::redacted_view;
use crate::domain::state::PASS_LIMIT;
use crate::domain::validator::{validate_move, RejectReason};
use crate::domain::{Card, GameState, Move, Side};
use crate::error::EngineError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::store::{GameHandle, GameSession, PendingGame, SeatBinding};
use crate::ws::protocol::{EndReason, ServerEvent};

impl GameFlowService {
    /// Open a pending game; the returned code is what a guest joins with.
    pub async fn create_game(&self, connection_id: &str) -> Result<String, EngineError> {
        let code = self.generate_game_code();
        self.store.add_pending(PendingGame {
            code: code.clone(),
            host_connection: connection_id.to_string(),
            created_at: OffsetDateTime::now_utc(),
        });
        info!(game_code = %code, "pending game created");
        self.sink
            .send(
                connection_id,
                ServerEvent::GameCreated {
                    game_code: code.clone(),
                },
            )
            .await;
        Ok(code)
    }

    /// Join a pending game as guest: deal the decks, compute the host's
    /// opening candidates, start the host's clock, and notify both players.
    pub async fn join_game(
        &self,
        connection_id: &str,
        game_code: &str,
    ) -> Result<FlowOutcome, EngineError> {
        let pending = self.store.take_pending(game_code).ok_or_else(|| {
            EngineError::from(DomainError::not_found(
                NotFoundKind::PendingGame,
                format!("no pending game with code {game_code}"),
            ))
        })?;
        if pending.host_connection == connection_id {
            self.store.add_pending(pending);
            return Err(DomainError::conflict(
                ConflictKind::SeatTaken,
                "host can't join their own game",
            )
            .into());
        }

        let seed: u64 = rand::rng().random();
        let mut game = new_game(seed);
        game.candidate_moves = generate_candidates(&game, Side::Host);

        let now = Instant::now();
        let mut clocks = GameClocks::new();
        clocks.switch_to(Side::Host, now);

        let handle = Arc::new(GameHandle::new(GameSession {
            id: Uuid::new_v4(),
            code: pending.code.clone(),
            game,
            clocks,
            clock_duration: self.config.clock_duration,
            host_seat: SeatBinding::new(pending.host_connection.clone()),
            guest_seat: SeatBinding::new(connection_id.to_string()),
            timers: TimerSlots::default(),
        }));
        self.store.insert(pending.code.clone(), handle.clone());
        self.store
            .bind_connection(pending.host_connection, pending.code.clone());
        self.store
            .bind_connection(connection_id.to_string(), pending.code);

        let (outcome, outbox) = {
            let mut session = handle.lock();
            self.reschedule_turn_timer(&mut session, now);
            info!(game_code = %session.code, game_id = %session.id, "game started");

            let outbox: Outbox = [Side::Host, Side::Guest]
                .into_iter()
                .map(|side| {
                    (
                        session.seat(side).connection_id.clone(),
                        ServerEvent::GameStarted {
                            game_code: session.code.clone(),
                            view: redacted_view(&session.game, side, &[]),
                            clocks: Self::clock_view(&session, side, now),
                        },
                    )
                })
                .collect();
            let outcome = FlowOutcome {
                code: FlowCode::Ok,
                reason: None,
                view: redacted_view(&session.game, Side::Guest, &[]),
            };
            (outcome, outbox)
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    /// Submit a move for whichever seat this connection holds.
    ///
    /// The move must match an entry of the current candidate snapshot (the
    /// desync/cheat guard) and pass the rule chain; rejections leave the game
    /// untouched and surface as `FlowCode::Rejected` plus a reason.
    pub async fn make_move(
        &self,
        connection_id: &str,
        mv: Move,
        hand_reorder: Option<Vec<Card>>,
    ) -> Result<FlowOutcome, EngineError> {
        let handle = self.require_by_connection(connection_id)?;
        let (outcome, outbox) = {
            let mut session = handle.lock();
            self.make_move_locked(&mut session, connection_id, mv, hand_reorder)?
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    fn make_move_locked(
        &self,
        session: &mut GameSession,
        connection_id: &str,
        mv: Move,
        hand_reorder: Option<Vec<Card>>,
    ) -> Result<(FlowOutcome, Outbox), EngineError> {
        let side = Self::require_seat(session, connection_id)?;
        debug!(game_code = %session.code, ?side, notation = %mv.notation(), "move submitted");

        if session.game.side_to_move() != side {
            return Ok(Self::rejection(
                session,
                connection_id,
                side,
                RejectReason::NotYourTurn.to_string(),
            ));
        }

        let candidate = match find_candidate(&session.game.candidate_moves, &mv) {
            None => {
                return Ok(Self::rejection(
                    session,
                    connection_id,
                    side,
                    "move is not in the candidate set for this turn".to_string(),
                ))
            }
            Some(c) => c.clone(),
        };
        if !candidate.legal {
            let reason = candidate
                .reason
                .map(|r| r.to_string())
                .unwrap_or_else(|| "illegal move".to_string());
            return Ok(Self::rejection(session, connection_id, side, reason));
        }

        // The snapshot was validated when it was generated; a disagreement
        // now means the snapshot and the live state have drifted apart.
        if let Err(reason) = validate_move(&session.game, &mv, side) {
            return Err(DomainError::invariant(format!(
                "candidate snapshot and validator disagree on {}: {reason}",
                mv.notation()
            ))
            .into());
        }

        let executed = execute_move(&mut session.game, side, &mv)?;
        session.game.consecutive_passes = 0;
        session.game.draw_offered_by = None;

        let mut movements = executed.movements;
        movements.extend(draw_to_hand_size(&mut session.game, side));
        if let Some(order) = hand_reorder {
            Self::apply_hand_reorder(&mut session.game, side, order);
        }
        info!(
            game_code = %session.code,
            ?side,
            notation = %mv.notation(),
            lanes_won = ?executed.lanes_won,
            "move executed"
        );

        let (code, outbox) = self.advance_after_action(session, &movements);
        let view = redacted_view(&session.game, side, &movements);
        Ok((
            FlowOutcome {
                code,
                reason: None,
                view,
            },
            outbox,
        ))
    }

    /// Pass: consume the turn and redraw the hand to five. Three passes in a
    /// row (either side, no placement in between) end the game with no
    /// winner.
    pub async fn pass_move(&self, connection_id: &str) -> Result<FlowOutcome, EngineError> {
        let handle = self.require_by_connection(connection_id)?;
        let (outcome, outbox) = {
            let mut session = handle.lock();
            self.pass_move_locked(&mut session, connection_id)?
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    fn pass_move_locked(
        &self,
        session: &mut GameSession,
        connection_id: &str,
    ) -> Result<(FlowOutcome, Outbox), EngineError> {
        let side = Self::require_seat(session, connection_id)?;
        if session.game.side_to_move() != side {
            return Ok(Self::rejection(
                session,
                connection_id,
                side,
                RejectReason::NotYourTurn.to_string(),
            ));
        }

        let movements = redraw_hand(&mut session.game, side);
        session.game.consecutive_passes += 1;
        session.game.record_move(side, "pass");
        info!(
            game_code = %session.code,
            ?side,
            consecutive_passes = session.game.consecutive_passes,
            "turn passed"
        );

        if session.game.consecutive_passes >= PASS_LIMIT {
            let now = Instant::now();
            let outbox =
                self.finalize_locked(session, EndReason::PassedOut, None, &movements, now);
            let view = redacted_view(&session.game, side, &movements);
            return Ok((
                FlowOutcome {
                    code: FlowCode::GameEnded,
                    reason: None,
                    view,
                },
                outbox,
            ));
        }

        let (code, outbox) = self.advance_after_action(session, &movements);
        let view = redacted_view(&session.game, side, &movements);
        Ok((
            FlowOutcome {
                code,
                reason: None,
                view,
            },
            outbox,
        ))
    }

    pub async fn offer_draw(&self, connection_id: &str) -> Result<FlowOutcome, EngineError> {
        let handle = self.require_by_connection(connection_id)?;
        let (outcome, outbox) = {
            let mut session = handle.lock();
            let side = Self::require_seat(&session, connection_id)?;
            if session.game.draw_offered_by.is_some() {
                return Err(DomainError::conflict(
                    ConflictKind::Other("DRAW_ALREADY_OFFERED".into()),
                    "a draw offer is already pending",
                )
                .into());
            }
            session.game.draw_offered_by = Some(side);
            info!(game_code = %session.code, ?side, "draw offered");
            let outbox = vec![(
                session.seat(side.opponent()).connection_id.clone(),
                ServerEvent::DrawOffered { by: side },
            )];
            let view = redacted_view(&session.game, side, &[]);
            (
                FlowOutcome {
                    code: FlowCode::Ok,
                    reason: None,
                    view,
                },
                outbox,
            )
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    pub async fn accept_draw(&self, connection_id: &str) -> Result<FlowOutcome, EngineError> {
        let handle = self.require_by_connection(connection_id)?;
        let (outcome, outbox) = {
            let mut session = handle.lock();
            let side = Self::require_seat(&session, connection_id)?;
            if session.game.draw_offered_by != Some(side.opponent()) {
                return Err(DomainError::conflict(
                    ConflictKind::NoDrawOffer,
                    "no draw offer from the opponent",
                )
                .into());
            }
            let now = Instant::now();
            let outbox = self.finalize_locked(&mut session, EndReason::DrawAgreed, None, &[], now);
            let view = redacted_view(&session.game, side, &[]);
            (
                FlowOutcome {
                    code: FlowCode::GameEnded,
                    reason: None,
                    view,
                },
                outbox,
            )
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    pub async fn decline_draw(&self, connection_id: &str) -> Result<FlowOutcome, EngineError> {
        let handle = self.require_by_connection(connection_id)?;
        let (outcome, outbox) = {
            let mut session = handle.lock();
            let side = Self::require_seat(&session, connection_id)?;
            if session.game.draw_offered_by != Some(side.opponent()) {
                return Err(DomainError::conflict(
                    ConflictKind::NoDrawOffer,
                    "no draw offer from the opponent",
                )
                .into());
            }
            session.game.draw_offered_by = None;
            let outbox = vec![(
                session.seat(side.opponent()).connection_id.clone(),
                ServerEvent::DrawDeclined { by: side },
            )];
            let view = redacted_view(&session.game, side, &[]);
            (
                FlowOutcome {
                    code: FlowCode::Ok,
                    reason: None,
                    view,
                },
                outbox,
            )
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    pub async fn resign_game(&self, connection_id: &str) -> Result<FlowOutcome, EngineError> {
        let handle = self.require_by_connection(connection_id)?;
        let (outcome, outbox) = {
            let mut session = handle.lock();
            let side = Self::require_seat(&session, connection_id)?;
            let now = Instant::now();
            info!(game_code = %session.code, ?side, "resignation");
            let outbox = self.finalize_locked(
                &mut session,
                EndReason::Resignation,
                Some(side.opponent()),
                &[],
                now,
            );
            let view = redacted_view(&session.game, side, &[]);
            (
                FlowOutcome {
                    code: FlowCode::GameEnded,
                    reason: None,
                    view,
                },
                outbox,
            )
        };
        self.deliver(outbox).await;
        Ok(outcome)
    }

    fn rejection(
        session: &GameSession,
        connection_id: &str,
        side: Side,
        reason: String,
    ) -> (FlowOutcome, Outbox) {
        debug!(game_code = %session.code, ?side, %reason, "action rejected");
        let outbox = vec![(
            connection_id.to_string(),
            ServerEvent::MoveRejected {
                reason: reason.clone(),
            },
        )];
        let view = redacted_view(&session.game, side, &[]);
        (
            FlowOutcome {
                code: FlowCode::Rejected,
                reason: Some(reason),
                view,
            },
            outbox,
        )
    }

    /// Apply a client's cosmetic hand rearrangement. Anything that is not an
    /// exact permutation of the current hand is ignored.
    pub(super) fn apply_hand_reorder(game: &mut GameState, side: Side, order: Vec<Card>) {
        let hand = &mut game.player_mut(side).hand;
        let mut current = hand.clone();
        let mut requested = order.clone();
        current.sort();
        requested.sort();
        if current == requested {
            *hand = order;
        } else {
            warn!(?side, "ignoring hand reorder that is not a permutation of the hand");
        }
    }
}
