//! Test helpers for deterministic dispatch runs.
//!
//! This module provides a scripted duration provider so tests can place rider
//! arrivals at exact offsets while keeping vehicle timings fixed.

use std::sync::Arc;
use std::time::Duration;

use crate::distributions::{DelayKind, DurationProvider};
use crate::scenario::DispatchParams;

/// Fixed vehicle timings plus a per-rider arrival offset.
///
/// Riders beyond the end of `arrivals_ms` arrive immediately.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDurations {
    pub arrivals_ms: Vec<u64>,
    pub vehicle_idle_ms: u64,
    pub trip_duration_ms: u64,
}

impl ScriptedDurations {
    pub fn new(arrivals_ms: Vec<u64>, vehicle_idle_ms: u64, trip_duration_ms: u64) -> Self {
        Self {
            arrivals_ms,
            vehicle_idle_ms,
            trip_duration_ms,
        }
    }

    /// Riders arrive every `gap_ms`, starting at zero.
    pub fn evenly_spaced(
        riders: usize,
        gap_ms: u64,
        vehicle_idle_ms: u64,
        trip_duration_ms: u64,
    ) -> Self {
        let arrivals_ms = (0..riders as u64).map(|i| i * gap_ms).collect();
        Self::new(arrivals_ms, vehicle_idle_ms, trip_duration_ms)
    }

    pub fn shared(self) -> Arc<dyn DurationProvider> {
        Arc::new(self)
    }
}

impl DurationProvider for ScriptedDurations {
    fn sample(&self, kind: DelayKind, actor: u64, _seq: u64) -> Duration {
        let ms = match kind {
            DelayKind::RiderArrival => usize::try_from(actor)
                .ok()
                .and_then(|i| self.arrivals_ms.get(i).copied())
                .unwrap_or(0),
            DelayKind::VehicleIdle => self.vehicle_idle_ms,
            DelayKind::TripDuration => self.trip_duration_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Small population with the given solicitation timeout and a fixed seed.
pub fn small_params(num_vehicles: usize, num_riders: usize, timeout_ms: u64) -> DispatchParams {
    DispatchParams::default()
        .with_population(num_vehicles, num_riders)
        .with_solicitation_timeout_ms(timeout_ms)
        .with_seed(42)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_arrivals_follow_rider_ordinal() {
        let provider = ScriptedDurations::evenly_spaced(3, 600, 5, 150);
        assert_eq!(provider.sample(DelayKind::RiderArrival, 0, 0), Duration::ZERO);
        assert_eq!(
            provider.sample(DelayKind::RiderArrival, 2, 0),
            Duration::from_millis(1200)
        );
        assert_eq!(provider.sample(DelayKind::RiderArrival, 9, 0), Duration::ZERO);
        assert_eq!(
            provider.sample(DelayKind::TripDuration, 1, 4),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn small_params_are_valid() {
        let params = small_params(1, 2, 500);
        params.validate().expect("valid");
        assert_eq!(params.seed, Some(42));
    }
}
