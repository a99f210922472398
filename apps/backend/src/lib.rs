#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod ws;

// Re-exports for public API
pub use config::GameConfig;
pub use error::EngineError;
pub use services::game_flow::{FlowCode, FlowOutcome, GameFlowService};
pub use store::{GameStore, InMemoryGameStore};
pub use ws::protocol::ServerEvent;
pub use ws::sink::MessageSink;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
