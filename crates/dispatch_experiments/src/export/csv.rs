use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

const HEADERS: [&str; 26] = [
    "experiment_id",
    "run_id",
    "seed",
    "num_vehicles",
    "num_riders",
    "solicitation_timeout_ms",
    "trip_duration_min_ms",
    "trip_duration_max_ms",
    "vehicle_idle_min_ms",
    "vehicle_idle_max_ms",
    "matched_riders",
    "unmatched_riders",
    "match_rate",
    "broker_sessions",
    "avg_time_to_match_ms",
    "median_time_to_match_ms",
    "p90_time_to_match_ms",
    "avg_time_to_resolve_ms",
    "median_time_to_resolve_ms",
    "p90_time_to_resolve_ms",
    "avg_trip_duration_ms",
    "completed_trips",
    "refused_offers",
    "max_trips_per_vehicle",
    "simulated_ms",
    "unmatched_rate",
];

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(HEADERS)?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let params = &param_set.params;
        let delays = &params.delays;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            param_set.seed.to_string(),
            params.num_vehicles.to_string(),
            params.num_riders.to_string(),
            params.solicitation_timeout_ms.to_string(),
            delays.trip_duration.min_ms.to_string(),
            delays.trip_duration.max_ms.to_string(),
            delays.vehicle_idle.min_ms.to_string(),
            delays.vehicle_idle.max_ms.to_string(),
            result.matched_riders.to_string(),
            result.unmatched_riders.to_string(),
            result.match_rate.to_string(),
            result.broker_sessions.to_string(),
            result.avg_time_to_match_ms.to_string(),
            result.median_time_to_match_ms.to_string(),
            result.p90_time_to_match_ms.to_string(),
            result.avg_time_to_resolve_ms.to_string(),
            result.median_time_to_resolve_ms.to_string(),
            result.p90_time_to_resolve_ms.to_string(),
            result.avg_trip_duration_ms.to_string(),
            result.completed_trips.to_string(),
            result.refused_offers.to_string(),
            result.max_trips_per_vehicle.to_string(),
            result.simulated_ms.to_string(),
            result.unmatched_rate().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
