use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

use super::combinations::ParameterVariations;
use super::{ParameterSet, ParameterSpace, SEED_SPREAD};

impl ParameterSpace {
    /// Generate random parameter sets (Monte Carlo sampling).
    ///
    /// Samples up to `count` distinct combinations from the defined space.
    /// Returns fewer when the space has fewer distinct combinations.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);
        let target = count.min(variations.len());

        let mut rng = StdRng::seed_from_u64(seed);
        let mut parameter_sets = Vec::with_capacity(target);
        let mut seen = HashSet::new();
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 10_000;

        while parameter_sets.len() < target && attempts < MAX_ATTEMPTS {
            attempts += 1;

            let picks = (
                variations.num_vehicles.choose(&mut rng),
                variations.num_riders.choose(&mut rng),
                variations.solicitation_timeouts_ms.choose(&mut rng),
                variations.trip_durations.choose(&mut rng),
                variations.vehicle_idle.choose(&mut rng),
            );
            let (
                Some(&num_vehicles),
                Some(&num_riders),
                Some(&timeout_ms),
                Some(&trip_duration),
                Some(&vehicle_idle),
            ) = picks
            else {
                break;
            };

            let key = (
                num_vehicles,
                num_riders,
                timeout_ms,
                trip_duration.min_ms,
                trip_duration.max_ms,
                vehicle_idle.min_ms,
                vehicle_idle.max_ms,
            );
            if !seen.insert(key) {
                continue;
            }

            let params = self
                .base
                .clone()
                .with_population(num_vehicles, num_riders)
                .with_solicitation_timeout_ms(timeout_ms)
                .with_trip_duration(trip_duration)
                .with_vehicle_idle(vehicle_idle);
            let seed_value = seed
                .wrapping_add(parameter_sets.len() as u64)
                .wrapping_mul(SEED_SPREAD);

            parameter_sets.push(ParameterSet::new(
                params,
                format!("random_{}", parameter_sets.len()),
                0,
                seed_value,
            ));
        }

        parameter_sets
    }
}
