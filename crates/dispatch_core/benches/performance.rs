//! Performance benchmarks for dispatch_core using Criterion.rs.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::agents::{RiderId, VehicleId};
use dispatch_core::distributions::{DelayBounds, DelayKind, DurationProvider, SeededDurations};
use dispatch_core::runner::run_simulation_with;
use dispatch_core::scenario::DispatchParams;
use dispatch_core::telemetry::{DispatchEvent, DispatchTelemetry, SessionOutcome};

/// Paused current-thread runtime: sleeps auto-advance, so a run costs only
/// the scheduling work.
fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime")
}

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![
        ("small", 10, 100),
        ("medium", 50, 500),
        ("large", 500, 5000),
    ];

    let mut group = c.benchmark_group("simulation_run");
    group.sample_size(10);
    for (name, vehicles, riders) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(vehicles, riders),
            |b, &(vehicles, riders)| {
                let runtime = paused_runtime();
                b.iter(|| {
                    let params = DispatchParams::default()
                        .with_population(vehicles, riders)
                        .with_seed(42);
                    let durations = Arc::new(SeededDurations::new(params.delays, 42));
                    black_box(
                        runtime
                            .block_on(run_simulation_with(&params, durations))
                            .expect("simulation"),
                    );
                });
            },
        );
    }
    group.finish();
}

fn bench_duration_sampling(c: &mut Criterion) {
    let provider = SeededDurations::new(DelayBounds::default(), 42);
    let mut seq = 0u64;

    c.bench_function("seeded_trip_duration_sample", |b| {
        b.iter(|| {
            seq = seq.wrapping_add(1);
            black_box(provider.sample(DelayKind::TripDuration, black_box(7), seq));
        });
    });
}

fn bench_telemetry_record(c: &mut Criterion) {
    // One full matched lifecycle per rider
    let events: Vec<DispatchEvent> = (0..1_000u64)
        .flat_map(|i| {
            let rider = RiderId(i);
            let vehicle = VehicleId(i % 50);
            let t = i * 10;
            [
                DispatchEvent::RideRequested { rider, at_ms: t },
                DispatchEvent::SessionOpened {
                    session: i,
                    rider,
                    at_ms: t,
                },
                DispatchEvent::SessionClosed {
                    session: i,
                    rider,
                    outcome: SessionOutcome::Matched(vehicle),
                    at_ms: t + 3,
                },
                DispatchEvent::TripStarted {
                    vehicle,
                    rider,
                    at_ms: t + 3,
                },
                DispatchEvent::TripCompleted {
                    vehicle,
                    rider,
                    at_ms: t + 120,
                },
            ]
        })
        .collect();

    c.bench_function("telemetry_record_1000_riders", |b| {
        b.iter(|| {
            let mut telemetry = DispatchTelemetry::default();
            for event in &events {
                telemetry.record(*event);
            }
            black_box(telemetry.counts.trips_completed);
        });
    });
}

criterion_group!(
    benches,
    bench_simulation_run,
    bench_duration_sampling,
    bench_telemetry_record
);
criterion_main!(benches);
