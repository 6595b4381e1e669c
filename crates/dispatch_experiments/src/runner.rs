//! Parallel simulation execution using rayon.
//!
//! Each simulation gets its own paused current-thread tokio runtime: virtual
//! time advances whenever every actor is asleep, so runs finish as fast as
//! the CPU allows and rayon spreads them across cores.

use dispatch_core::runner::{run_simulation, SimulationReport};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;

use crate::metrics::{extract_metrics, SimulationResult};
use crate::parameters::ParameterSet;

/// Run one parameter set on a fresh virtual-time runtime and return the
/// full report.
pub fn run_single_report(param_set: &ParameterSet) -> Result<SimulationReport, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .map_err(|error| format!("Failed to build runtime: {error}"))?;

    let params = param_set.dispatch_params();
    debug!(
        experiment = %param_set.experiment_id,
        run = param_set.run_id,
        vehicles = params.num_vehicles,
        riders = params.num_riders,
        timeout_ms = params.solicitation_timeout_ms,
        "running parameter set"
    );
    runtime
        .block_on(run_simulation(&params))
        .map_err(|error| format!("Simulation {} failed: {error}", param_set.experiment_id))
}

/// Run a single simulation and extract its metrics.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, String> {
    run_single_report(param_set).map(|report| extract_metrics(&report))
}

/// Run multiple simulations in parallel with a progress bar.
///
/// Results are in the same order as `parameter_sets`. The first failing run
/// aborts the sweep.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, String> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with optional progress bar.
///
/// # Arguments
///
/// * `parameter_sets` - Vector of parameter sets to run
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
/// * `show_progress` - Whether to display a progress bar
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, String> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map_err(|error| format!("Invalid progress template: {error}"))?
            .progress_chars("#>-");
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|error| format!("Failed to create thread pool: {error}"))?;

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, String>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;

    #[test]
    fn test_single_simulation() {
        let space = ParameterSpace::grid()
            .num_riders(vec![20])
            .num_vehicles(vec![3]);
        let sets = space.generate();
        let result = run_single_simulation(&sets[0]).unwrap();

        assert_eq!(result.total_riders, 20);
        assert_eq!(result.total_vehicles, 3);
        assert_eq!(result.matched_riders + result.unmatched_riders, 20);
        assert_eq!(result.broker_sessions, 20);
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let sets = ParameterSpace::grid()
            .num_riders(vec![30])
            .num_vehicles(vec![2])
            .solicitation_timeout_ms(vec![40])
            .generate();

        let first = run_single_simulation(&sets[0]).unwrap();
        let second = run_single_simulation(&sets[0]).unwrap();
        assert_eq!(first.matched_riders, second.matched_riders);
        assert_eq!(first.simulated_ms, second.simulated_ms);
    }

    #[test]
    fn test_parallel_experiments() {
        let space = ParameterSpace::grid()
            .num_riders(vec![10, 20])
            .num_vehicles(vec![2, 4]);
        let sets = space.generate();
        let results = run_parallel_experiments_with_progress(sets.clone(), Some(2), false).unwrap();

        assert_eq!(results.len(), 4);
        for (result, set) in results.iter().zip(&sets) {
            assert_eq!(result.total_riders, set.params.num_riders);
            assert_eq!(result.total_vehicles, set.params.num_vehicles);
        }
    }

    #[test]
    fn test_invalid_parameters_fail_the_sweep() {
        let sets = ParameterSpace::grid()
            .num_riders(vec![5])
            .solicitation_timeout_ms(vec![0])
            .generate();
        let err = run_parallel_experiments_with_progress(sets, Some(1), false).unwrap_err();
        assert!(err.contains("exp_0"));
    }
}
