//! Game lookup store.
//!
//! The engine never holds process-wide mutable state: the hosting layer owns
//! a `GameStore` implementation and injects it into the service. The store
//! resolves connection ids and game codes to live games; all per-game
//! mutation happens under the `GameHandle` lock.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::clock::{GameClocks, TimerSlots};
use crate::domain::{GameState, Side};

pub type ConnectionId = String;
pub type GameCode = String;

/// A game a host has opened that is still waiting for a guest.
#[derive(Debug, Clone)]
pub struct PendingGame {
    pub code: GameCode,
    pub host_connection: ConnectionId,
    pub created_at: OffsetDateTime,
}

/// The live connection binding for one seat.
#[derive(Debug, Clone)]
pub struct SeatBinding {
    pub connection_id: ConnectionId,
    pub disconnected: bool,
}

impl SeatBinding {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            disconnected: false,
        }
    }
}

/// Everything mutable about one running game: domain state, clocks, seat
/// bindings, and pending timers. Always accessed under the handle's lock.
#[derive(Debug)]
pub struct GameSession {
    pub id: Uuid,
    pub code: GameCode,
    pub game: GameState,
    pub clocks: GameClocks,
    pub clock_duration: Duration,
    pub host_seat: SeatBinding,
    pub guest_seat: SeatBinding,
    pub timers: TimerSlots,
}

impl GameSession {
    pub fn seat(&self, side: Side) -> &SeatBinding {
        match side {
            Side::Host => &self.host_seat,
            Side::Guest => &self.guest_seat,
        }
    }

    pub fn seat_mut(&mut self, side: Side) -> &mut SeatBinding {
        match side {
            Side::Host => &mut self.host_seat,
            Side::Guest => &mut self.guest_seat,
        }
    }

    pub fn side_of(&self, connection_id: &str) -> Option<Side> {
        if self.host_seat.connection_id == connection_id {
            Some(Side::Host)
        } else if self.guest_seat.connection_id == connection_id {
            Some(Side::Guest)
        } else {
            None
        }
    }

    /// The side whose seat is currently marked disconnected, if any.
    pub fn disconnected_side(&self) -> Option<Side> {
        if self.host_seat.disconnected {
            Some(Side::Host)
        } else if self.guest_seat.disconnected {
            Some(Side::Guest)
        } else {
            None
        }
    }
}

/// Shared handle serializing all access to one game.
#[derive(Debug)]
pub struct GameHandle {
    session: Mutex<GameSession>,
}

impl GameHandle {
    pub fn new(session: GameSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock()
    }
}

/// Lookup service for pending and running games.
pub trait GameStore: Send + Sync {
    fn add_pending(&self, pending: PendingGame);
    fn take_pending(&self, code: &str) -> Option<PendingGame>;
    /// Drop any pending game opened by this connection.
    fn remove_pending_by_connection(&self, connection_id: &str);

    fn insert(&self, code: GameCode, handle: Arc<GameHandle>);
    fn find_by_code(&self, code: &str) -> Option<Arc<GameHandle>>;
    fn find_by_connection(&self, connection_id: &str) -> Option<Arc<GameHandle>>;
    fn bind_connection(&self, connection_id: ConnectionId, code: GameCode);
    fn unbind_connection(&self, connection_id: &str);
    /// Whether a code is in use by a pending or running game.
    fn contains_code(&self, code: &str) -> bool;
    fn remove(&self, code: &str);
}

/// In-memory store backed by concurrent maps.
#[derive(Default)]
pub struct InMemoryGameStore {
    pending: DashMap<GameCode, PendingGame>,
    games: DashMap<GameCode, Arc<GameHandle>>,
    by_connection: DashMap<ConnectionId, GameCode>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for InMemoryGameStore {
    fn add_pending(&self, pending: PendingGame) {
        self.pending.insert(pending.code.clone(), pending);
    }

    fn take_pending(&self, code: &str) -> Option<PendingGame> {
        self.pending.remove(code).map(|(_, p)| p)
    }

    fn remove_pending_by_connection(&self, connection_id: &str) {
        self.pending
            .retain(|_, p| p.host_connection != connection_id);
    }

    fn insert(&self, code: GameCode, handle: Arc<GameHandle>) {
        self.games.insert(code, handle);
    }

    fn find_by_code(&self, code: &str) -> Option<Arc<GameHandle>> {
        self.games.get(code).map(|h| Arc::clone(h.value()))
    }

    fn find_by_connection(&self, connection_id: &str) -> Option<Arc<GameHandle>> {
        let code = self.by_connection.get(connection_id)?.value().clone();
        self.find_by_code(&code)
    }

    fn bind_connection(&self, connection_id: ConnectionId, code: GameCode) {
        self.by_connection.insert(connection_id, code);
    }

    fn unbind_connection(&self, connection_id: &str) {
        self.by_connection.remove(connection_id);
    }

    fn contains_code(&self, code: &str) -> bool {
        self.pending.contains_key(code) || self.games.contains_key(code)
    }

    fn remove(&self, code: &str) {
        self.games.remove(code);
        self.by_connection.retain(|_, c| c.as_str() != code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dealing::new_game;

    fn session(code: &str) -> GameSession {
        GameSession {
            id: Uuid::new_v4(),
            code: code.to_string(),
            game: new_game(1),
            clocks: GameClocks::new(),
            clock_duration: Duration::from_secs(300),
            host_seat: SeatBinding::new("conn-h".into()),
            guest_seat: SeatBinding::new("conn-g".into()),
            timers: TimerSlots::default(),
        }
    }

    #[test]
    fn connection_index_follows_lifecycle() {
        let store = InMemoryGameStore::new();
        let handle = Arc::new(GameHandle::new(session("ABCD")));
        store.insert("ABCD".into(), handle);
        store.bind_connection("conn-h".into(), "ABCD".into());
        store.bind_connection("conn-g".into(), "ABCD".into());

        assert!(store.find_by_connection("conn-h").is_some());
        assert!(store.contains_code("ABCD"));

        store.remove("ABCD");
        assert!(store.find_by_connection("conn-h").is_none());
        assert!(store.find_by_connection("conn-g").is_none());
        assert!(!store.contains_code("ABCD"));
    }

    #[test]
    fn pending_games_are_taken_once() {
        let store = InMemoryGameStore::new();
        store.add_pending(PendingGame {
            code: "QQQQ".into(),
            host_connection: "conn-h".into(),
            created_at: OffsetDateTime::now_utc(),
        });
        assert!(store.contains_code("QQQQ"));
        assert!(store.take_pending("QQQQ").is_some());
        assert!(store.take_pending("QQQQ").is_none());
    }

    #[test]
    fn pending_games_die_with_their_host_connection() {
        let store = InMemoryGameStore::new();
        store.add_pending(PendingGame {
            code: "QQQQ".into(),
            host_connection: "conn-h".into(),
            created_at: OffsetDateTime::now_utc(),
        });
        store.remove_pending_by_connection("conn-h");
        assert!(!store.contains_code("QQQQ"));
    }

    #[test]
    fn seat_lookup_by_connection() {
        let s = session("ABCD");
        assert_eq!(s.side_of("conn-h"), Some(Side::Host));
        assert_eq!(s.side_of("conn-g"), Some(Side::Guest));
        assert_eq!(s.side_of("other"), None);
    }
}
