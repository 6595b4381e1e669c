//! Pre-defined parameter space configurations for experimentation.

use dispatch_core::distributions::DelayRange;

use crate::ParameterSpace;

/// Solicitation timeouts from far below a typical trip length to the 500 ms
/// default, at the default 500 / 5000 population.
pub fn timeout_sweep_space() -> ParameterSpace {
    ParameterSpace::grid()
        .solicitation_timeout_ms(vec![5, 10, 25, 50, 100, 150, 250, 500])
        .runs(3)
}

/// Small pools where vehicles are busy most of the time, so the timeout
/// actually decides outcomes.
pub fn constrained_pool_space() -> ParameterSpace {
    ParameterSpace::grid()
        .num_vehicles(vec![5, 10, 25, 50])
        .num_riders(vec![1000])
        .solicitation_timeout_ms(vec![25, 100, 250, 500])
        .runs(2)
}

pub fn supply_demand_space() -> ParameterSpace {
    ParameterSpace::grid()
        .num_vehicles(vec![10, 50, 100, 500])
        .num_riders(vec![500, 1000, 5000])
}

/// Trip length against vehicle polling interval.
pub fn trip_length_space() -> ParameterSpace {
    ParameterSpace::grid()
        .num_vehicles(vec![20])
        .num_riders(vec![1000])
        .trip_duration(vec![
            DelayRange::new(10, 20),
            DelayRange::new(100, 150),
            DelayRange::new(500, 1000),
        ])
        .vehicle_idle(vec![DelayRange::new(1, 5), DelayRange::new(1, 50)])
}

pub fn minimal_space() -> ParameterSpace {
    ParameterSpace::grid()
        .num_vehicles(vec![5])
        .num_riders(vec![100])
        .solicitation_timeout_ms(vec![50, 500])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_spaces_generate_valid_sets() {
        for space in [
            timeout_sweep_space(),
            constrained_pool_space(),
            supply_demand_space(),
            trip_length_space(),
            minimal_space(),
        ] {
            let sets = space.generate();
            assert!(!sets.is_empty());
            for set in &sets {
                set.dispatch_params().validate().expect("valid params");
            }
        }
    }

    #[test]
    fn test_timeout_sweep_space_size() {
        assert_eq!(timeout_sweep_space().generate().len(), 8 * 3);
    }
}
