//! Parameter variation framework for exploring the dispatch parameter space.
//!
//! This module provides tools for defining parameter spaces and generating
//! parameter sets for parallel experimentation. Supports grid search and
//! random sampling strategies.

use dispatch_core::distributions::DelayRange;
use dispatch_core::scenario::DispatchParams;

mod combinations;
mod sampling;
#[cfg(test)]
mod tests;

use combinations::ParameterVariations;

/// Golden-ratio multiplier used to spread derived seeds.
const SEED_SPREAD: u64 = 0x9e37_79b9;

/// A single parameter configuration for a simulation run.
///
/// Wraps `DispatchParams` with experiment metadata for tracking and
/// reproducibility.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Base dispatch parameters.
    pub params: DispatchParams,
    /// Identifier shared by every run of one parameter combination.
    pub experiment_id: String,
    /// Replicate index within the experiment.
    pub run_id: usize,
    /// Seed used for this run.
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(params: DispatchParams, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// The dispatch params with this run's seed applied.
    pub fn dispatch_params(&self) -> DispatchParams {
        self.params.clone().with_seed(self.seed)
    }
}

/// Defines a parameter space for exploration.
///
/// Dimensions left empty fall back to the base parameters.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: DispatchParams,
    num_vehicles: Vec<usize>,
    num_riders: Vec<usize>,
    solicitation_timeouts_ms: Vec<u64>,
    trip_durations: Vec<DelayRange>,
    vehicle_idle: Vec<DelayRange>,
    /// Independent seeded runs per combination.
    runs: usize,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base: DispatchParams::default(),
            num_vehicles: vec![],
            num_riders: vec![],
            solicitation_timeouts_ms: vec![],
            trip_durations: vec![],
            vehicle_idle: vec![],
            runs: 1,
        }
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    pub fn num_vehicles(mut self, counts: Vec<usize>) -> Self {
        self.num_vehicles = counts;
        self
    }

    pub fn num_riders(mut self, counts: Vec<usize>) -> Self {
        self.num_riders = counts;
        self
    }

    pub fn solicitation_timeout_ms(mut self, timeouts: Vec<u64>) -> Self {
        self.solicitation_timeouts_ms = timeouts;
        self
    }

    pub fn trip_duration(mut self, ranges: Vec<DelayRange>) -> Self {
        self.trip_durations = ranges;
        self
    }

    pub fn vehicle_idle(mut self, ranges: Vec<DelayRange>) -> Self {
        self.vehicle_idle = ranges;
        self
    }

    /// Number of seeded replicates per combination (at least one).
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs.max(1);
        self
    }

    /// Set base parameters (used as defaults).
    pub fn with_base(mut self, base: DispatchParams) -> Self {
        self.base = base;
        self
    }

    /// Generate all parameter sets using grid search (Cartesian product).
    ///
    /// Each combination is repeated `runs` times with a distinct seed; the
    /// replicates share an `experiment_id`.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);

        variations
            .generate_combinations()
            .enumerate()
            .flat_map(|(experiment_id, combo)| {
                let params = combo.apply(&self.base);
                (0..self.runs).map(move |run_id| {
                    let seed = (experiment_id as u64)
                        .wrapping_mul(SEED_SPREAD)
                        .wrapping_add(run_id as u64);
                    ParameterSet::new(
                        params.clone(),
                        format!("exp_{}", experiment_id),
                        run_id,
                        seed,
                    )
                })
            })
            .collect()
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}
