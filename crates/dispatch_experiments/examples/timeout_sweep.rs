//! Example: sweep the solicitation timeout.
//!
//! A short timeout rejects riders a busy pool could have served a moment
//! later; a long one makes every rider behind an unmatched session wait out
//! the full window. This example:
//! 1. Selects a pre-defined parameter space
//! 2. Runs the simulations in parallel on virtual time
//! 3. Prints per-timeout match rate and resolution latency
//! 4. Exports results to CSV and JSON
//!
//! Run with: cargo run -p dispatch_experiments --example timeout_sweep --release

use dispatch_experiments::parameter_spaces;
use dispatch_experiments::{
    export_to_csv, export_to_json, find_best_parameters, find_best_result_index,
    run_parallel_experiments, ServiceWeights,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Other spaces: constrained_pool_space(), supply_demand_space(),
    // trip_length_space(), minimal_space()
    let space = parameter_spaces::timeout_sweep_space();

    let parameter_sets = space.generate();
    println!("Generated {} parameter sets", parameter_sets.len());

    let results = run_parallel_experiments(parameter_sets.clone(), None)?;
    println!("Completed {} simulations\n", results.len());

    println!(
        "{:>10} {:>6} {:>10} {:>10} {:>14} {:>14}",
        "timeout_ms", "run", "matched", "unmatched", "avg_match_ms", "p90_resolve_ms"
    );
    for (result, set) in results.iter().zip(&parameter_sets) {
        println!(
            "{:>10} {:>6} {:>10} {:>10} {:>14.1} {:>14.1}",
            set.params.solicitation_timeout_ms,
            set.run_id,
            result.matched_riders,
            result.unmatched_riders,
            result.avg_time_to_match_ms,
            result.p90_time_to_resolve_ms,
        );
    }

    let weights = ServiceWeights::default();
    if let Some(best_idx) = find_best_result_index(&results, &weights) {
        let best = &results[best_idx];
        println!("\n=== Best Run ===");
        println!("Match rate: {:.2}%", best.match_rate * 100.0);
        println!("Avg time to match: {:.1} ms", best.avg_time_to_match_ms);
        println!("P90 time to resolve: {:.1} ms", best.p90_time_to_resolve_ms);
    }
    if let Some(best_params) = find_best_parameters(&results, &parameter_sets, &weights) {
        println!("Solicitation timeout: {} ms", best_params.params.solicitation_timeout_ms);
        println!("Vehicles: {}", best_params.params.num_vehicles);
        println!("Riders: {}", best_params.params.num_riders);
    }

    export_to_csv(&results, &parameter_sets, "timeout_sweep_results.csv")?;
    println!("\nExported to timeout_sweep_results.csv");
    export_to_json(&results, "timeout_sweep_results.json")?;
    println!("Exported to timeout_sweep_results.json");

    Ok(())
}
