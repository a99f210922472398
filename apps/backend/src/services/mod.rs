//! Service layer: orchestration on top of the pure domain engine.

pub mod game_flow;
