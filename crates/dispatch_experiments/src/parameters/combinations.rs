use dispatch_core::distributions::DelayRange;
use dispatch_core::scenario::DispatchParams;

use super::ParameterSpace;

/// Represents a single parameter combination.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ParameterCombination {
    pub(super) num_vehicles: usize,
    pub(super) num_riders: usize,
    pub(super) solicitation_timeout_ms: u64,
    pub(super) trip_duration: DelayRange,
    pub(super) vehicle_idle: DelayRange,
}

impl ParameterCombination {
    pub(super) fn apply(&self, base: &DispatchParams) -> DispatchParams {
        base.clone()
            .with_population(self.num_vehicles, self.num_riders)
            .with_solicitation_timeout_ms(self.solicitation_timeout_ms)
            .with_trip_duration(self.trip_duration)
            .with_vehicle_idle(self.vehicle_idle)
    }
}

/// Holds all parameter variations to explore.
pub(super) struct ParameterVariations {
    pub(super) num_vehicles: Vec<usize>,
    pub(super) num_riders: Vec<usize>,
    pub(super) solicitation_timeouts_ms: Vec<u64>,
    pub(super) trip_durations: Vec<DelayRange>,
    pub(super) vehicle_idle: Vec<DelayRange>,
}

fn or_base<T: Clone>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

impl ParameterVariations {
    pub(super) fn from_space(space: &ParameterSpace) -> Self {
        let base = &space.base;
        Self {
            num_vehicles: or_base(&space.num_vehicles, base.num_vehicles),
            num_riders: or_base(&space.num_riders, base.num_riders),
            solicitation_timeouts_ms: or_base(
                &space.solicitation_timeouts_ms,
                base.solicitation_timeout_ms,
            ),
            trip_durations: or_base(&space.trip_durations, base.delays.trip_duration),
            vehicle_idle: or_base(&space.vehicle_idle, base.delays.vehicle_idle),
        }
    }

    /// Generate all combinations using Cartesian product.
    pub(super) fn generate_combinations(&self) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.num_vehicles.iter().flat_map(move |&num_vehicles| {
            self.num_riders.iter().flat_map(move |&num_riders| {
                self.expand_with_timeouts(num_vehicles, num_riders)
            })
        })
    }

    fn expand_with_timeouts(
        &self,
        num_vehicles: usize,
        num_riders: usize,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.solicitation_timeouts_ms
            .iter()
            .flat_map(move |&solicitation_timeout_ms| {
                self.expand_with_delays(num_vehicles, num_riders, solicitation_timeout_ms)
            })
    }

    fn expand_with_delays(
        &self,
        num_vehicles: usize,
        num_riders: usize,
        solicitation_timeout_ms: u64,
    ) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.trip_durations.iter().flat_map(move |&trip_duration| {
            self.vehicle_idle
                .iter()
                .map(move |&vehicle_idle| ParameterCombination {
                    num_vehicles,
                    num_riders,
                    solicitation_timeout_ms,
                    trip_duration,
                    vehicle_idle,
                })
        })
    }

    /// Total number of combinations.
    pub(super) fn len(&self) -> usize {
        self.num_vehicles.len()
            * self.num_riders.len()
            * self.solicitation_timeouts_ms.len()
            * self.trip_durations.len()
            * self.vehicle_idle.len()
    }
}
