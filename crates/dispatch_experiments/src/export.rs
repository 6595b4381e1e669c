//! Result export and analysis utilities.
//!
//! This module exports experiment results to CSV and JSON, and finds the best
//! parameter combination by service score.

use std::path::Path;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;
use crate::scoring::ServiceWeights;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/ranking.rs"]
mod ranking;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export simulation results to JSON format as one array of objects.
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export simulation results with parameters to CSV format.
///
/// Parameters and results are paired by index (results[i] corresponds to
/// parameter_sets[i]).
///
/// # Errors
///
/// Returns an error if there is nothing to export, the lengths differ, or
/// file creation or CSV writing fails.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    writer_utils::ensure_same_len(results, parameter_sets)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

/// Find the parameter set whose run has the highest service score.
///
/// Returns None if inputs are empty or mismatched.
pub fn find_best_parameters<'a>(
    results: &'a [SimulationResult],
    parameter_sets: &'a [ParameterSet],
    weights: &ServiceWeights,
) -> Option<&'a ParameterSet> {
    ranking::find_best_parameters_impl(results, parameter_sets, weights)
}

/// Index of the result with the highest service score.
pub fn find_best_result_index(
    results: &[SimulationResult],
    weights: &ServiceWeights,
) -> Option<usize> {
    ranking::find_best_index_by_score(results, weights)
}
