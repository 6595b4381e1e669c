use super::*;

#[test]
fn test_grid_search_single_parameter() {
    let space = ParameterSpace::grid().solicitation_timeout_ms(vec![50, 100, 500]);
    let sets = space.generate();
    assert_eq!(sets.len(), 3);
    assert_eq!(sets[2].params.solicitation_timeout_ms, 500);
}

#[test]
fn test_grid_search_multiple_parameters() {
    let space = ParameterSpace::grid()
        .solicitation_timeout_ms(vec![100, 500])
        .num_vehicles(vec![5, 50]);
    let sets = space.generate();
    assert_eq!(sets.len(), 4);
}

#[test]
fn test_unspecified_dimensions_use_base() {
    let base = DispatchParams::default().with_population(7, 70);
    let sets = ParameterSpace::grid()
        .with_base(base)
        .solicitation_timeout_ms(vec![10, 20])
        .generate();

    for set in &sets {
        assert_eq!(set.params.num_vehicles, 7);
        assert_eq!(set.params.num_riders, 70);
    }
}

#[test]
fn test_runs_share_experiment_id_with_distinct_seeds() {
    let sets = ParameterSpace::grid()
        .num_vehicles(vec![5, 10])
        .runs(3)
        .generate();
    assert_eq!(sets.len(), 6);

    let first: Vec<_> = sets.iter().filter(|s| s.experiment_id == "exp_0").collect();
    assert_eq!(first.len(), 3);
    assert_eq!(
        first.iter().map(|s| s.run_id).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_ne!(first[0].seed, first[1].seed);
    assert_eq!(first[1].dispatch_params().seed, Some(first[1].seed));
}

#[test]
fn test_delay_dimensions_expand_grid() {
    let sets = ParameterSpace::grid()
        .trip_duration(vec![DelayRange::new(10, 20), DelayRange::new(100, 150)])
        .vehicle_idle(vec![DelayRange::new(1, 5), DelayRange::new(1, 50)])
        .generate();
    assert_eq!(sets.len(), 4);
    assert_eq!(sets[3].params.delays.trip_duration, DelayRange::new(100, 150));
    assert_eq!(sets[3].params.delays.vehicle_idle, DelayRange::new(1, 50));
}

#[test]
fn test_random_sampling() {
    let space = ParameterSpace::grid()
        .solicitation_timeout_ms(vec![10, 50, 100, 500])
        .num_vehicles(vec![5, 10, 20]);
    let sets = space.sample_random(10, 42);
    assert_eq!(sets.len(), 10);

    let mut keys: Vec<_> = sets
        .iter()
        .map(|s| (s.params.num_vehicles, s.params.solicitation_timeout_ms))
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 10);
}

#[test]
fn test_random_sampling_caps_at_space_size() {
    let space = ParameterSpace::grid().num_vehicles(vec![1, 2]);
    let sets = space.sample_random(10, 7);
    assert_eq!(sets.len(), 2);
}
