//! Speech engine adapters.

mod simulated;

pub use simulated::{SimulatedEngine, SimulatedTiming};
