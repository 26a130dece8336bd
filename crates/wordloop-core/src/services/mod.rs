//! Core services built on the ports.

mod listen_tracker;

pub use listen_tracker::{DEFAULT_FLUSH_INTERVAL, ListenTracker};
