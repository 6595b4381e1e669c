//! Ride dispatch matching simulation.
//!
//! Riders, a single dispatcher and a pool of vehicles run as independent
//! tokio tasks and coordinate only through channels. See [agents] for the
//! protocol and [runner] for driving a whole scenario.

pub mod agents;
pub mod barrier;
pub mod clock;
pub mod distributions;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
