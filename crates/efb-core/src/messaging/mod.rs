//! Chat-platform abstractions (Discord today, behind a port).

pub mod port;
pub mod types;
