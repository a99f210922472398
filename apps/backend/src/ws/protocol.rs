use serde::Serialize;

use crate::domain::player_view::PlayerGameView;
use crate::domain::Side;

pub const PROTOCOL_VERSION: i32 = 1;

/// Remaining clock time for both players, from the receiver's point of view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClockView {
    pub your_remaining_ms: u64,
    pub opponent_remaining_ms: u64,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    LanesWon,
    ClockTimeout,
    DisconnectTimeout,
    Resignation,
    DrawAgreed,
    Stalemate,
    PassedOut,
    Abandoned,
}

/// Typed payloads pushed to a specific connection. The engine fixes no wire
/// format; hosts serialize these however they deliver messages.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    GameCreated {
        game_code: String,
    },

    GameStarted {
        game_code: String,
        view: PlayerGameView,
        clocks: ClockView,
    },

    GameView {
        view: PlayerGameView,
        clocks: ClockView,
    },

    MoveRejected {
        reason: String,
    },

    TurnSkipped {
        side: Side,
    },

    DrawOffered {
        by: Side,
    },

    DrawDeclined {
        by: Side,
    },

    OpponentDisconnected {
        grace_secs: u64,
    },

    OpponentReconnected,

    GameEnded {
        winner: Option<Side>,
        reason: EndReason,
        view: PlayerGameView,
    },
}

impl ServerEvent {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::GameCreated { .. } => "game_created",
            ServerEvent::GameStarted { .. } => "game_started",
            ServerEvent::GameView { .. } => "game_view",
            ServerEvent::MoveRejected { .. } => "move_rejected",
            ServerEvent::TurnSkipped { .. } => "turn_skipped",
            ServerEvent::DrawOffered { .. } => "draw_offered",
            ServerEvent::DrawDeclined { .. } => "draw_declined",
            ServerEvent::OpponentDisconnected { .. } => "opponent_disconnected",
            ServerEvent::OpponentReconnected => "opponent_reconnected",
            ServerEvent::GameEnded { .. } => "game_ended",
        }
    }
}
