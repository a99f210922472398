//! Turn clocks and timer plumbing.

pub mod game_clock;
pub mod timers;

pub use game_clock::GameClocks;
pub use timers::{TimerHandle, TimerSlots};
