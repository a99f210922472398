//! Disconnect and reconnect handling.

use tokio::time::Instant;
use tracing::info;

use super::{FlowCode, FlowOutcome, GameFlowService};
use crate::clock::TimerHandle;
use crate::domain::player_view::redacted_view;
use crate::error::EngineError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::ws::protocol::{EndReason, ServerEvent};

impl GameFlowService {
    /// Mark a connection as gone.
    ///
    /// A pending game dies with its host. For a running game the seat is
    /// flagged and a grace timer starts; if both seats are gone the game ends
    /// immediately with no winner.
    pub async fn mark_disconnected(&self, connection_id: &str) -> Result<(), EngineError> {
        self.store.remove_pending_by_connection(connection_id);
        let Some(handle) = self.store.find_by_connection(connection_id) else {
            return Ok(());
        };
        let outbox = {
            let mut session = handle.lock();
            let Some(side) = session.side_of(connection_id) else {
                return Ok(());
            };
            session.seat_mut(side).disconnected = true;
            let opponent = side.opponent();
            if session.seat(opponent).disconnected {
                info!(game_code = %session.code, "both sides disconnected, ending game");
                let now = Instant::now();
                self.finalize_locked(&mut session, EndReason::Abandoned, None, &[], now)
            } else {
                let grace = self.config.disconnect_grace;
                info!(
                    game_code = %session.code,
                    ?side,
                    grace_secs = grace.as_secs(),
                    "player disconnected, grace timer started"
                );
                let service = self.clone();
                let code = session.code.clone();
                session.timers.grace = Some(TimerHandle::spawn(grace, async move {
                    service.handle_grace_timeout(&code).await;
                }));
                vec![(
                    session.seat(opponent).connection_id.clone(),
                    ServerEvent::OpponentDisconnected {
                        grace_secs: grace.as_secs(),
                    },
                )]
            }
        };
        self.deliver(outbox).await;
        Ok(())
    }

    /// Rebind a disconnected seat to a new connection, found by game code.
    /// Cancels the grace timer and brings the player back up to date.
    pub async fn reconnect(
        &self,
        game_code: &str,
        connection_id: &str,
    ) -> Result<FlowOutcome, EngineError> {
        let handle = self.store.find_by_code(game_code).ok_or_else(|| {
            EngineError::from(DomainError::not_found(
                NotFoundKind::Game,
                format!("no game with code {game_code}"),
            ))
        })?;
        let (outcome, outbox, old_connection) = {
            let mut session = handle.lock();
            let Some(side) = session.disconnected_side() else {
                return Err(DomainError::conflict(
                    ConflictKind::Other("NO_RECONNECT_SLOT".into()),
                    "no seat awaiting reconnection",
                )
                .into());
            };
            let seat = session.seat_mut(side);
            let old_connection =
                std::mem::replace(&mut seat.connection_id, connection_id.to_string());
            seat.disconnected = false;
            session.timers.grace = None;
            info!(game_code = %session.code, ?side, "player reconnected");

            let now = Instant::now();
            let view = redacted_view(&session.game, side, &[]);
            let outbox = vec![
                (
                    connection_id.to_string(),
                    ServerEvent::GameView {
                        view: view.clone(),
                        clocks: Self::clock_view(&session, side, now),
                    },
                ),
                (
                    session.seat(side.opponent()).connection_id.clone(),
                    ServerEvent::OpponentReconnected,
                ),
            ];
            (
                FlowOutcome {
                    code: FlowCode::Ok,
                    reason: None,
                    view,
                },
                outbox,
                old_connection,
            )
        };
        self.store.unbind_connection(&old_connection);
        self.store
            .bind_connection(connection_id.to_string(), game_code.to_string());
        self.deliver(outbox).await;
        Ok(outcome)
    }
}
