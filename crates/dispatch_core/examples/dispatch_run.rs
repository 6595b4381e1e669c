//! Run the 500 vehicles / 5000 riders scenario and print each completed trip
//! as it happens.
//!
//! Run with: cargo run -p dispatch_core --example dispatch_run [-- params.json]

use dispatch_core::runner::run_scenario;
use dispatch_core::scenario::{build_scenario, default_durations, DispatchParams};
use dispatch_core::telemetry::DispatchEvent;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let params = match std::env::args().nth(1) {
        Some(path) => DispatchParams::from_json_file(path)?,
        None => DispatchParams::default(),
    };
    let scenario = build_scenario(&params, default_durations(&params))?;

    let report = run_scenario(scenario, |event| {
        if let DispatchEvent::TripCompleted { vehicle, rider, .. } = event {
            println!("Vehicle {:4} done with rider {}", vehicle.0, rider.0);
        }
    })
    .await?;

    println!(
        "--- Dispatch run ({} vehicles, {} riders, {} ms solicitation timeout) ---",
        params.num_vehicles, params.num_riders, params.solicitation_timeout_ms
    );
    println!("Simulation time: {} ms", report.elapsed_ms);
    println!("Broker sessions: {}", report.sessions);
    println!("Matched: {}", report.matched());
    println!("Unmatched: {}", report.unmatched());
    println!(
        "Unmatched rate: {:.2}%",
        report.telemetry.unmatched_rate() * 100.0
    );
    Ok(())
}
