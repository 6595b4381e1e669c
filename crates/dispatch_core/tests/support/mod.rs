#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Once};

use dispatch_core::agents::{RiderId, VehicleId};
use dispatch_core::barrier::Resolution;
use dispatch_core::distributions::DurationProvider;
use dispatch_core::runner::{run_simulation_with, SimulationReport};
use dispatch_core::scenario::DispatchParams;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Install a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

pub async fn run(
    params: &DispatchParams,
    durations: Arc<dyn DurationProvider>,
) -> SimulationReport {
    init_tracing();
    run_simulation_with(params, durations)
        .await
        .expect("simulation should run to completion")
}

/// Protocol invariants that must hold for every run with `num_riders` riders.
pub fn assert_protocol_invariants(report: &SimulationReport, num_riders: usize) {
    // exactly one terminal outcome per rider
    assert_eq!(report.outcomes.len(), num_riders, "every rider resolves");
    let riders: HashSet<RiderId> = report.outcomes.iter().map(|o| o.rider).collect();
    assert_eq!(riders.len(), num_riders, "no rider resolves twice");

    // one broker session per rider, never overlapping
    assert_eq!(report.sessions as usize, num_riders);
    assert_eq!(report.telemetry.sessions.len(), num_riders);
    assert_eq!(report.telemetry.unresolved_sessions(), 0);
    assert!(report.telemetry.max_open_sessions <= 1);
    assert_eq!(report.telemetry.overlapping_sessions(), None);

    // every matched rider produced exactly one trip with the vehicle it was assigned
    let mut trips_by_rider: HashMap<RiderId, Vec<VehicleId>> = HashMap::new();
    for trip in &report.telemetry.completed_trips {
        trips_by_rider.entry(trip.rider).or_default().push(trip.vehicle);
    }
    for outcome in &report.outcomes {
        match outcome.resolution {
            Resolution::Matched { vehicle } => {
                assert_eq!(
                    trips_by_rider.get(&outcome.rider),
                    Some(&vec![vehicle]),
                    "rider {} should ride exactly once with vehicle {}",
                    outcome.rider,
                    vehicle
                );
            }
            Resolution::Unmatched => {
                assert!(!trips_by_rider.contains_key(&outcome.rider));
            }
        }
    }
    assert_eq!(report.telemetry.counts.matched, report.matched());
    assert_eq!(report.telemetry.counts.trips_completed, report.matched());

    // each accepted claim was followed by exactly one trip request or a release
    for summary in &report.vehicles {
        assert_eq!(
            summary.claims,
            summary.trips + summary.released,
            "vehicle {} claims vs trips",
            summary.vehicle
        );
    }
}
