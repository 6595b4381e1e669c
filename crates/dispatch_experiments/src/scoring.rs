//! Service score calculation.
//!
//! Combines the metrics of every run in a sweep into one comparable score.
//! Each metric is min-max normalised across the sweep, so scores only rank
//! runs against each other.

use crate::metrics::SimulationResult;

/// Weights for the service score. Higher weights give a metric more
/// influence.
///
/// # Default Weights
///
/// - Match rate: 0.5
/// - Time to match: 0.2 (inverted, lower is better)
/// - Time to resolve: 0.3 (inverted, lower is better)
#[derive(Debug, Clone, Copy)]
pub struct ServiceWeights {
    pub match_rate_weight: f64,
    pub time_to_match_weight: f64,
    /// Applies to the p90 resolution time, which covers unmatched riders
    /// waiting out the full solicitation window.
    pub time_to_resolve_weight: f64,
}

impl Default for ServiceWeights {
    fn default() -> Self {
        Self {
            match_rate_weight: 0.5,
            time_to_match_weight: 0.2,
            time_to_resolve_weight: 0.3,
        }
    }
}

impl ServiceWeights {
    pub fn new(
        match_rate_weight: f64,
        time_to_match_weight: f64,
        time_to_resolve_weight: f64,
    ) -> Self {
        Self {
            match_rate_weight,
            time_to_match_weight,
            time_to_resolve_weight,
        }
    }
}

/// Min-max normalisation to [0, 1]; 0.5 when every value is equal.
fn normalize_metric(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.5
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}

fn bounds(results: &[SimulationResult], metric: impl Fn(&SimulationResult) -> f64) -> (f64, f64) {
    results
        .iter()
        .map(metric)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        })
}

/// Calculate service scores for all results, in input order.
pub fn calculate_service_scores(
    results: &[SimulationResult],
    weights: &ServiceWeights,
) -> Vec<f64> {
    if results.is_empty() {
        return vec![];
    }

    let (match_rate_min, match_rate_max) = bounds(results, |r| r.match_rate);
    let (match_time_min, match_time_max) = bounds(results, |r| r.avg_time_to_match_ms);
    let (resolve_min, resolve_max) = bounds(results, |r| r.p90_time_to_resolve_ms);

    results
        .iter()
        .map(|result| {
            let match_rate_norm =
                normalize_metric(result.match_rate, match_rate_min, match_rate_max);
            let match_time_norm = 1.0
                - normalize_metric(result.avg_time_to_match_ms, match_time_min, match_time_max);
            let resolve_norm =
                1.0 - normalize_metric(result.p90_time_to_resolve_ms, resolve_min, resolve_max);

            match_rate_norm * weights.match_rate_weight
                + match_time_norm * weights.time_to_match_weight
                + resolve_norm * weights.time_to_resolve_weight
        })
        .collect()
}
