//! Scenario setup: build the vehicle pool, the dispatcher and the rider
//! population, wired together by channels.

mod build;
mod params;

pub use build::{build_scenario, default_durations, Scenario};
pub use params::DispatchParams;
