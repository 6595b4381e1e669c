use std::sync::Arc;

use crate::agents::{
    request_channel, solicitation_channel, vehicle_channel, Dispatcher, Rider, RiderId, Vehicle,
    VehicleId,
};
use crate::barrier::CompletionBarrier;
use crate::clock::SimulationClock;
use crate::distributions::{DurationProvider, SeededDurations};
use crate::error::ConfigError;
use crate::scenario::params::DispatchParams;
use crate::telemetry::TelemetryCollector;

/// Every actor of one run, built but not yet spawned.
#[derive(Debug)]
pub struct Scenario {
    pub clock: SimulationClock,
    pub dispatcher: Dispatcher,
    pub vehicles: Vec<Vehicle>,
    pub riders: Vec<Rider>,
    pub barrier: CompletionBarrier,
    pub collector: TelemetryCollector,
}

/// Seeded provider over the params' delay bounds. Draws a seed when none is set.
pub fn default_durations(params: &DispatchParams) -> Arc<dyn DurationProvider> {
    let seed = params.seed.unwrap_or_else(rand::random);
    Arc::new(SeededDurations::new(params.delays, seed))
}

/// Create all channels and actors for `params`.
///
/// The clock starts here, so call this from inside the runtime that will run
/// the scenario. No sender is retained outside the actors: once riders finish
/// the dispatcher stops, and once the dispatcher stops idle vehicles stop.
pub fn build_scenario(
    params: &DispatchParams,
    durations: Arc<dyn DurationProvider>,
) -> Result<Scenario, ConfigError> {
    params.validate()?;

    let clock = SimulationClock::start();
    let (events, collector) = TelemetryCollector::channel(clock);
    let (requests, request_inbox) = request_channel();
    let (solicitations, pool) = solicitation_channel();

    let vehicles = (0..params.num_vehicles as u64)
        .map(|id| {
            let (handle, inbox) = vehicle_channel(VehicleId(id));
            Vehicle::new(
                handle,
                inbox,
                pool.clone(),
                Arc::clone(&durations),
                events.clone(),
            )
        })
        .collect();

    let dispatcher = Dispatcher::new(
        request_inbox,
        solicitations,
        pool,
        params.solicitation_timeout(),
        events.clone(),
    );

    let mut barrier = CompletionBarrier::new();
    let riders = (0..params.num_riders as u64)
        .map(|id| {
            let rider = RiderId(id);
            Rider::new(
                rider,
                requests.clone(),
                barrier.register(rider),
                Arc::clone(&durations),
                events.clone(),
            )
        })
        .collect();

    Ok(Scenario {
        clock,
        dispatcher,
        vehicles,
        riders,
        barrier,
        collector,
    })
}
