#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod engine;
pub mod error;
pub mod queue;
pub mod request;
pub mod scheduler;

// Re-export key types for convenience
pub use engine::{SimulatedEngine, SimulatedTiming};
pub use error::SpeechError;
pub use queue::{EMPTY_TEXT, SpeechQueue};
pub use request::{SpeakOutcome, SpeechNotice, SpeechRequest};
pub use scheduler::{PlaybackScheduler, SchedulerDeps};

#[cfg(test)]
use tokio_test as _;
