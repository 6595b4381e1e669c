use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;
use crate::scoring::{calculate_service_scores, ServiceWeights};

pub(crate) fn find_best_index_by_score(
    results: &[SimulationResult],
    weights: &ServiceWeights,
) -> Option<usize> {
    calculate_service_scores(results, weights)
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
}

pub(crate) fn find_best_parameters_impl<'a>(
    results: &[SimulationResult],
    parameter_sets: &'a [ParameterSet],
    weights: &ServiceWeights,
) -> Option<&'a ParameterSet> {
    if results.is_empty() || results.len() != parameter_sets.len() {
        return None;
    }

    let best_idx = find_best_index_by_score(results, weights)?;
    parameter_sets.get(best_idx)
}
