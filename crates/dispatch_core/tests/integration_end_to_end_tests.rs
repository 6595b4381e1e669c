mod support;

use std::sync::Arc;
use std::time::Duration;

use dispatch_core::distributions::{
    DelayBounds, DelayKind, DelayRange, DurationProvider, SeededDurations,
};
use dispatch_core::runner::{run_scenario, run_simulation};
use dispatch_core::scenario::{build_scenario, DispatchParams};
use dispatch_core::telemetry::DispatchEvent;
use dispatch_core::test_helpers::small_params;

use support::{assert_protocol_invariants, init_tracing, run};

/// Seeded vehicle timings with riders arriving on a fixed grid.
#[derive(Debug)]
struct SpacedArrivals {
    gap_ms: u64,
    inner: SeededDurations,
}

impl DurationProvider for SpacedArrivals {
    fn sample(&self, kind: DelayKind, actor: u64, seq: u64) -> Duration {
        match kind {
            DelayKind::RiderArrival => Duration::from_millis(actor * self.gap_ms),
            _ => self.inner.sample(kind, actor, seq),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn seeded_run_upholds_protocol_invariants() {
    let params = small_params(10, 200, 500);
    let durations = Arc::new(SeededDurations::new(params.delays, 7));

    let report = run(&params, durations).await;

    assert_protocol_invariants(&report, 200);
    assert!(report.matched() > 0);
}

#[tokio::test(start_paused = true)]
async fn short_timeout_exercises_unmatched_path_without_breaking_invariants() {
    let params = small_params(3, 120, 5);
    let durations = Arc::new(SeededDurations::new(params.delays, 11));

    let report = run(&params, durations).await;

    assert_protocol_invariants(&report, 120);
    assert!(report.unmatched() > 0, "a 5 ms window should reject some riders");
}

#[tokio::test(start_paused = true)]
async fn arrivals_slower_than_timeout_are_never_unmatched() {
    let params = small_params(3, 25, 500);
    let durations = Arc::new(SpacedArrivals {
        gap_ms: 600,
        inner: SeededDurations::new(params.delays, 3),
    });

    let report = run(&params, durations).await;

    assert_protocol_invariants(&report, 25);
    assert_eq!(report.unmatched(), 0);
    assert_eq!(report.telemetry.unmatched_rate(), 0.0);
    for trip in &report.telemetry.completed_trips {
        assert!((100..=150).contains(&trip.trip_duration()));
        // an idle vehicle polls at least every 50 ms
        assert!(trip.time_to_match() <= 50);
    }
}

#[tokio::test(start_paused = true)]
async fn observer_sees_every_completed_trip() {
    init_tracing();
    let params = small_params(4, 30, 500);
    let durations = Arc::new(SeededDurations::new(params.delays, 5));
    let scenario = build_scenario(&params, durations).expect("scenario");

    let (tx, rx) = std::sync::mpsc::channel();
    let report = run_scenario(scenario, move |event| {
        if let DispatchEvent::TripCompleted { vehicle, rider, .. } = event {
            let _ = tx.send((*vehicle, *rider));
        }
    })
    .await
    .expect("simulation");

    let reported: Vec<_> = rx.try_iter().collect();
    assert_eq!(reported.len(), report.matched());
    assert_protocol_invariants(&report, 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn multi_threaded_run_resolves_every_rider() {
    init_tracing();
    let params = DispatchParams::default()
        .with_population(5, 60)
        .with_solicitation_timeout_ms(200)
        .with_rider_arrival(DelayRange::new(0, 20))
        .with_vehicle_idle(DelayRange::new(1, 5))
        .with_trip_duration(DelayRange::new(5, 10))
        .with_seed(99);

    let report = run_simulation(&params).await.expect("simulation");

    assert_protocol_invariants(&report, 60);
}

#[tokio::test(start_paused = true)]
async fn default_delay_bounds_match_documented_ranges() {
    let bounds = DelayBounds::default();
    assert_eq!(bounds.rider_arrival, DelayRange::new(0, 100));
    assert_eq!(bounds.trip_duration, DelayRange::new(100, 150));

    let params = small_params(2, 10, 500);
    let report = run(&params, Arc::new(SeededDurations::new(bounds, 1))).await;
    assert_protocol_invariants(&report, 10);
    for request in report.telemetry.sessions.iter() {
        assert!(request.requested_at <= report.elapsed_ms);
    }
}
