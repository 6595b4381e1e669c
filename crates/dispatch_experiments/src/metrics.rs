//! Metrics extraction from simulation results.
//!
//! This module condenses a `SimulationReport` into flat per-run metrics:
//! match rates, time-to-match and time-to-resolve statistics, trip durations
//! and vehicle utilisation.

use dispatch_core::runner::SimulationReport;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SimulationResult {
    /// Total number of riders in the run.
    pub total_riders: usize,
    /// Size of the vehicle pool.
    pub total_vehicles: usize,
    /// Riders served by a vehicle.
    pub matched_riders: usize,
    /// Riders whose solicitation window closed without a vehicle.
    pub unmatched_riders: usize,
    /// matched / total.
    pub match_rate: f64,
    /// Broker sessions the dispatcher ran.
    pub broker_sessions: u64,
    /// Average request-to-match time of matched riders, in milliseconds.
    pub avg_time_to_match_ms: f64,
    pub median_time_to_match_ms: f64,
    pub p90_time_to_match_ms: f64,
    /// Average request-to-resolution time over every rider, matched or not.
    pub avg_time_to_resolve_ms: f64,
    pub median_time_to_resolve_ms: f64,
    pub p90_time_to_resolve_ms: f64,
    /// Average time a vehicle spent driving a trip.
    pub avg_trip_duration_ms: f64,
    pub completed_trips: usize,
    /// Offers vehicles made after their session had already closed.
    pub refused_offers: u64,
    /// Most trips served by a single vehicle.
    pub max_trips_per_vehicle: u64,
    /// Simulated milliseconds until the last actor stopped.
    pub simulated_ms: u64,
}

impl SimulationResult {
    /// Calculate average, median and p90 of a set of values.
    pub(crate) fn calculate_stats(values: &[u64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) as f64 / 2.0
        } else {
            sorted[sorted.len() / 2] as f64
        };
        // floor(0.9 * (n-1)) index
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)] as f64;

        (avg, median, p90)
    }

    pub fn unmatched_rate(&self) -> f64 {
        if self.total_riders == 0 {
            0.0
        } else {
            self.unmatched_riders as f64 / self.total_riders as f64
        }
    }
}

/// Extract metrics from a finished run.
pub fn extract_metrics(report: &SimulationReport) -> SimulationResult {
    let telemetry = &report.telemetry;
    let total_riders = report.outcomes.len();
    let matched_riders = report.matched();

    let time_to_match: Vec<u64> = telemetry
        .completed_trips
        .iter()
        .map(|trip| trip.time_to_match())
        .collect();
    let time_to_resolve: Vec<u64> = telemetry
        .sessions
        .iter()
        .map(|session| session.time_to_resolve())
        .collect();
    let trip_durations: Vec<u64> = telemetry
        .completed_trips
        .iter()
        .map(|trip| trip.trip_duration())
        .collect();

    let (avg_time_to_match_ms, median_time_to_match_ms, p90_time_to_match_ms) =
        SimulationResult::calculate_stats(&time_to_match);
    let (avg_time_to_resolve_ms, median_time_to_resolve_ms, p90_time_to_resolve_ms) =
        SimulationResult::calculate_stats(&time_to_resolve);
    let (avg_trip_duration_ms, _, _) = SimulationResult::calculate_stats(&trip_durations);

    let match_rate = if total_riders > 0 {
        matched_riders as f64 / total_riders as f64
    } else {
        0.0
    };

    SimulationResult {
        total_riders,
        total_vehicles: report.vehicles.len(),
        matched_riders,
        unmatched_riders: report.unmatched(),
        match_rate,
        broker_sessions: report.sessions,
        avg_time_to_match_ms,
        median_time_to_match_ms,
        p90_time_to_match_ms,
        avg_time_to_resolve_ms,
        median_time_to_resolve_ms,
        p90_time_to_resolve_ms,
        avg_trip_duration_ms,
        completed_trips: telemetry.completed_trips.len(),
        refused_offers: report.vehicles.iter().map(|v| v.refused_offers).sum(),
        max_trips_per_vehicle: report.vehicles.iter().map(|v| v.trips).max().unwrap_or(0),
        simulated_ms: report.elapsed_ms,
    }
}
