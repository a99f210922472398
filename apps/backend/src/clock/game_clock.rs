//! Per-side chess-style clocks.
//!
//! Each side accumulates thinking time; at most one clock runs at a time,
//! gated by whose turn it is. All methods take `now` explicitly so the logic
//! stays pure and unit-testable without sleeping. Instants come from tokio's
//! clock so the scheduler and these counters agree under test-paused time.

use std::time::Duration;

use tokio::time::Instant;

use crate::domain::Side;

#[derive(Debug, Clone)]
pub struct GameClocks {
    host_elapsed: Duration,
    guest_elapsed: Duration,
    running: Option<(Side, Instant)>,
}

impl GameClocks {
    pub fn new() -> Self {
        Self {
            host_elapsed: Duration::ZERO,
            guest_elapsed: Duration::ZERO,
            running: None,
        }
    }

    pub fn running_side(&self) -> Option<Side> {
        self.running.map(|(side, _)| side)
    }

    /// Start (or switch to) `side`'s clock. Any running clock is stopped and
    /// its time folded into that side's total first.
    pub fn switch_to(&mut self, side: Side, now: Instant) {
        self.halt(now);
        self.running = Some((side, now));
    }

    /// Stop whichever clock is running.
    pub fn halt(&mut self, now: Instant) {
        if let Some((side, since)) = self.running.take() {
            *self.elapsed_mut(side) += now.duration_since(since);
        }
    }

    /// Total time `side` has spent so far, including the live segment if
    /// their clock is running.
    pub fn elapsed(&self, side: Side, now: Instant) -> Duration {
        let base = match side {
            Side::Host => self.host_elapsed,
            Side::Guest => self.guest_elapsed,
        };
        match self.running {
            Some((running, since)) if running == side => base + now.duration_since(since),
            _ => base,
        }
    }

    /// Time left on `side`'s clock against a per-game budget.
    pub fn remaining(&self, side: Side, budget: Duration, now: Instant) -> Duration {
        budget.saturating_sub(self.elapsed(side, now))
    }

    fn elapsed_mut(&mut self, side: Side) -> &mut Duration {
        match side {
            Side::Host => &mut self.host_elapsed,
            Side::Guest => &mut self.guest_elapsed,
        }
    }
}

impl Default for GameClocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_clock_accumulates() {
        let t0 = Instant::now();
        let mut clocks = GameClocks::new();
        clocks.switch_to(Side::Host, t0);

        let t1 = t0 + Duration::from_secs(10);
        assert_eq!(clocks.elapsed(Side::Host, t1), Duration::from_secs(10));
        assert_eq!(clocks.elapsed(Side::Guest, t1), Duration::ZERO);

        clocks.switch_to(Side::Guest, t1);
        let t2 = t1 + Duration::from_secs(4);
        assert_eq!(clocks.elapsed(Side::Host, t2), Duration::from_secs(10));
        assert_eq!(clocks.elapsed(Side::Guest, t2), Duration::from_secs(4));
        assert_eq!(clocks.running_side(), Some(Side::Guest));
    }

    #[test]
    fn switching_back_resumes_accumulation() {
        let t0 = Instant::now();
        let mut clocks = GameClocks::new();
        clocks.switch_to(Side::Host, t0);
        clocks.switch_to(Side::Guest, t0 + Duration::from_secs(3));
        clocks.switch_to(Side::Host, t0 + Duration::from_secs(5));

        let t = t0 + Duration::from_secs(9);
        assert_eq!(clocks.elapsed(Side::Host, t), Duration::from_secs(7));
        assert_eq!(clocks.elapsed(Side::Guest, t), Duration::from_secs(2));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let t0 = Instant::now();
        let mut clocks = GameClocks::new();
        clocks.switch_to(Side::Host, t0);
        let budget = Duration::from_secs(5);
        let late = t0 + Duration::from_secs(60);
        assert_eq!(clocks.remaining(Side::Host, budget, late), Duration::ZERO);
        assert_eq!(clocks.remaining(Side::Guest, budget, late), budget);
    }

    #[test]
    fn halt_freezes_both() {
        let t0 = Instant::now();
        let mut clocks = GameClocks::new();
        clocks.switch_to(Side::Guest, t0);
        clocks.halt(t0 + Duration::from_secs(2));
        let later = t0 + Duration::from_secs(50);
        assert_eq!(clocks.elapsed(Side::Guest, later), Duration::from_secs(2));
        assert_eq!(clocks.running_side(), None);
    }
}
