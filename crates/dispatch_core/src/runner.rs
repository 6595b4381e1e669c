//! Simulation runner: spawns every actor, waits on the completion barrier,
//! then joins the dispatcher and the vehicle pool as they drain.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::agents::VehicleSummary;
use crate::barrier::RiderOutcome;
use crate::distributions::DurationProvider;
use crate::error::SimulationError;
use crate::scenario::{build_scenario, default_durations, DispatchParams, Scenario};
use crate::telemetry::{DispatchEvent, DispatchTelemetry};

/// Result of one completed run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub outcomes: Vec<RiderOutcome>,
    pub telemetry: DispatchTelemetry,
    pub vehicles: Vec<VehicleSummary>,
    pub sessions: u64,
    /// Simulation time from build until the last actor stopped.
    pub elapsed_ms: u64,
}

impl SimulationReport {
    pub fn matched(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_matched()).count()
    }

    pub fn unmatched(&self) -> usize {
        self.outcomes.len() - self.matched()
    }
}

/// Run `params` with the default seeded duration provider.
pub async fn run_simulation(params: &DispatchParams) -> Result<SimulationReport, SimulationError> {
    run_simulation_with(params, default_durations(params)).await
}

pub async fn run_simulation_with(
    params: &DispatchParams,
    durations: Arc<dyn DurationProvider>,
) -> Result<SimulationReport, SimulationError> {
    let scenario = build_scenario(params, durations)?;
    run_scenario(scenario, |_| {}).await
}

/// Spawn and drive a built scenario. `observer` sees every event as it is
/// collected, e.g. to report completed trips live.
pub async fn run_scenario(
    scenario: Scenario,
    observer: impl FnMut(&DispatchEvent) + Send + 'static,
) -> Result<SimulationReport, SimulationError> {
    let Scenario {
        clock,
        dispatcher,
        vehicles,
        riders,
        barrier,
        collector,
    } = scenario;

    info!(
        vehicles = vehicles.len(),
        riders = riders.len(),
        "starting dispatch simulation"
    );

    let telemetry = tokio::spawn(collector.with_observer(observer).collect());
    let vehicle_tasks: Vec<JoinHandle<VehicleSummary>> =
        vehicles.into_iter().map(|v| tokio::spawn(v.run())).collect();
    let dispatcher_task = tokio::spawn(dispatcher.run());
    let rider_tasks: Vec<JoinHandle<()>> =
        riders.into_iter().map(|r| tokio::spawn(r.run())).collect();

    let outcomes = barrier.wait().await;

    for task in rider_tasks {
        task.await.map_err(|source| SimulationError::Join {
            actor: "rider",
            source,
        })?;
    }
    let sessions = dispatcher_task
        .await
        .map_err(|source| SimulationError::Join {
            actor: "dispatcher",
            source,
        })?;
    let mut summaries = Vec::with_capacity(vehicle_tasks.len());
    for task in vehicle_tasks {
        summaries.push(task.await.map_err(|source| SimulationError::Join {
            actor: "vehicle",
            source,
        })?);
    }
    let telemetry = telemetry.await.map_err(|source| SimulationError::Join {
        actor: "telemetry",
        source,
    })?;

    let report = SimulationReport {
        outcomes,
        telemetry,
        vehicles: summaries,
        sessions,
        elapsed_ms: clock.now_ms(),
    };
    info!(
        matched = report.matched(),
        unmatched = report.unmatched(),
        sessions = report.sessions,
        elapsed_ms = report.elapsed_ms,
        "dispatch simulation finished"
    );
    Ok(report)
}

/// Build a multi-threaded runtime and run `params` to completion on it.
pub fn run_blocking(params: &DispatchParams) -> Result<SimulationReport, SimulationError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SimulationError::Runtime)?;
    runtime.block_on(run_simulation(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::FixedDurations;

    #[tokio::test(start_paused = true)]
    async fn empty_population_finishes_immediately() {
        let params = DispatchParams::default().with_population(3, 0);
        let report = run_simulation_with(&params, Arc::new(FixedDurations::from_millis(0, 5, 100)))
            .await
            .expect("simulation");
        assert!(report.outcomes.is_empty());
        assert_eq!(report.sessions, 0);
        assert_eq!(report.vehicles.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn single_rider_single_vehicle_is_matched() {
        let params = DispatchParams::default().with_population(1, 1);
        let report = run_simulation_with(&params, Arc::new(FixedDurations::from_millis(0, 5, 100)))
            .await
            .expect("simulation");
        assert_eq!(report.matched(), 1);
        assert_eq!(report.telemetry.completed_trips.len(), 1);
        assert_eq!(report.telemetry.completed_trips[0].trip_duration(), 100);
    }

    #[test]
    fn blocking_runner_rejects_invalid_params() {
        let params = DispatchParams::default().with_solicitation_timeout_ms(0);
        let err = run_blocking(&params).unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }
}
