//! Outbound message boundary: typed payloads and the delivery trait.

pub mod protocol;
pub mod sink;
