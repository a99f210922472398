//! One-shot cancellable timers for turn timeouts and disconnect grace.
//!
//! Cancellation is the only control primitive: a `TimerHandle` that is
//! cancelled (or dropped, e.g. by rescheduling over it) makes the pending
//! firing a no-op. Callbacks re-validate game state themselves, so a firing
//! that races a concurrent mutation is harmless either way.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    /// Schedule `fire` to run after `delay` unless cancelled first.
    pub fn spawn<F>(delay: Duration, fire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => fire.await,
            }
        });
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// The two timers a game can have pending. Replacing a slot cancels the
/// previous timer through `TimerHandle::drop`.
#[derive(Debug, Default)]
pub struct TimerSlots {
    pub turn: Option<TimerHandle>,
    pub grace: Option<TimerHandle>,
}

impl TimerSlots {
    pub fn cancel_all(&mut self) {
        self.turn.take();
        self.grace.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _timer = TimerHandle::spawn(Duration::from_secs(5), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!fired.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let timer = TimerHandle::spawn(Duration::from_secs(5), async move {
            flag.store(true, Ordering::SeqCst);
        });
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_a_slot_cancels_the_old_timer() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let mut slots = TimerSlots::default();
        slots.turn = Some(TimerHandle::spawn(Duration::from_secs(5), async move {
            flag.store(true, Ordering::SeqCst);
        }));
        slots.turn = Some(TimerHandle::spawn(Duration::from_secs(60), async {}));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
