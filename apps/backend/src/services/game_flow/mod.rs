//! Game flow orchestration service.
//!
//! Bridges the pure domain engine with the injected store and message sink:
//! validates and executes player actions, recomputes candidate snapshots,
//! drives the per-side clocks and timers, and pushes per-player views.
//!
//! Every operation resolves its game through the store, takes the per-game
//! lock for the whole mutation, and only delivers messages after the lock is
//! released.

mod connections;
mod orchestration;
mod player_actions;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;

use crate::config::GameConfig;
use crate::domain::player_view::PlayerGameView;
use crate::store::GameStore;
use crate::ws::sink::MessageSink;

/// Structured diagnostic code accompanying every operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowCode {
    Ok,
    /// The submitted action violated a rule; state is unchanged.
    Rejected,
    /// The opponent had no legal moves, so the turn came straight back.
    TurnSkippedNoMoves,
    GameEnded,
}

/// The caller's updated view of the game plus the diagnostic code.
#[derive(Debug)]
pub struct FlowOutcome {
    pub code: FlowCode,
    pub reason: Option<String>,
    pub view: PlayerGameView,
}

#[derive(Clone)]
pub struct GameFlowService {
    store: Arc<dyn GameStore>,
    sink: Arc<dyn MessageSink>,
    config: GameConfig,
}

impl GameFlowService {
    pub fn new(store: Arc<dyn GameStore>, sink: Arc<dyn MessageSink>, config: GameConfig) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }
}
