//! Random delay providers for rider arrival jitter, vehicle idle back-off and
//! trip duration.
//!
//! Providers are stateless: each sample is derived from the delay kind, the
//! actor ordinal and a per-actor sequence number, so the same seed always
//! yields the same delays regardless of task scheduling order.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which delay an actor is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayKind {
    RiderArrival,
    VehicleIdle,
    TripDuration,
}

impl DelayKind {
    fn salt(self) -> u64 {
        match self {
            DelayKind::RiderArrival => 0x5249_4445,
            DelayKind::VehicleIdle => 0x4944_4c45,
            DelayKind::TripDuration => 0x5452_4950,
        }
    }
}

/// Trait for sampling bounded delays.
pub trait DurationProvider: Send + Sync + std::fmt::Debug {
    /// Sample a delay of `kind` for the actor with ordinal `actor`.
    /// `seq` counts previous samples of the same kind by that actor.
    fn sample(&self, kind: DelayKind, actor: u64, seq: u64) -> Duration;
}

/// Inclusive millisecond range for one kind of delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min_ms > self.max_ms {
            return Err(ConfigError::InvalidRange {
                name,
                min_ms: self.min_ms,
                max_ms: self.max_ms,
            });
        }
        Ok(())
    }

    fn sample_with<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// Bounds for every delay kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayBounds {
    pub rider_arrival: DelayRange,
    pub vehicle_idle: DelayRange,
    pub trip_duration: DelayRange,
}

impl DelayBounds {
    pub fn range(&self, kind: DelayKind) -> DelayRange {
        match kind {
            DelayKind::RiderArrival => self.rider_arrival,
            DelayKind::VehicleIdle => self.vehicle_idle,
            DelayKind::TripDuration => self.trip_duration,
        }
    }
}

impl Default for DelayBounds {
    fn default() -> Self {
        Self {
            rider_arrival: DelayRange::new(0, 100),
            vehicle_idle: DelayRange::new(1, 50),
            trip_duration: DelayRange::new(100, 150),
        }
    }
}

/// Uniform delays within [DelayBounds], reproducible per seed.
#[derive(Debug, Clone)]
pub struct SeededDurations {
    pub bounds: DelayBounds,
    pub seed: u64,
}

impl SeededDurations {
    pub fn new(bounds: DelayBounds, seed: u64) -> Self {
        Self { bounds, seed }
    }
}

impl DurationProvider for SeededDurations {
    fn sample(&self, kind: DelayKind, actor: u64, seq: u64) -> Duration {
        // splitmix-style mixing keeps neighbouring actors/sequences decorrelated
        let key = self
            .seed
            .wrapping_add(kind.salt())
            .wrapping_add(actor.wrapping_mul(0x9e37_79b9_7f4a_7c15))
            .wrapping_add(seq.wrapping_mul(0xbf58_476d_1ce4_e5b9));
        let mut rng = StdRng::seed_from_u64(key);
        self.bounds.range(kind).sample_with(&mut rng)
    }
}

/// Constant delays per kind; useful for deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDurations {
    pub rider_arrival: Duration,
    pub vehicle_idle: Duration,
    pub trip_duration: Duration,
}

impl FixedDurations {
    pub fn from_millis(rider_arrival_ms: u64, vehicle_idle_ms: u64, trip_duration_ms: u64) -> Self {
        Self {
            rider_arrival: Duration::from_millis(rider_arrival_ms),
            vehicle_idle: Duration::from_millis(vehicle_idle_ms),
            trip_duration: Duration::from_millis(trip_duration_ms),
        }
    }
}

impl DurationProvider for FixedDurations {
    fn sample(&self, kind: DelayKind, _actor: u64, _seq: u64) -> Duration {
        match kind {
            DelayKind::RiderArrival => self.rider_arrival,
            DelayKind::VehicleIdle => self.vehicle_idle,
            DelayKind::TripDuration => self.trip_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_samples_stay_within_bounds() {
        let provider = SeededDurations::new(DelayBounds::default(), 42);
        for actor in 0..50 {
            for seq in 0..5 {
                let arrival = provider.sample(DelayKind::RiderArrival, actor, seq);
                assert!(arrival <= Duration::from_millis(100));

                let idle = provider.sample(DelayKind::VehicleIdle, actor, seq);
                assert!(idle >= Duration::from_millis(1) && idle <= Duration::from_millis(50));

                let trip = provider.sample(DelayKind::TripDuration, actor, seq);
                assert!(trip >= Duration::from_millis(100) && trip <= Duration::from_millis(150));
            }
        }
    }

    #[test]
    fn seeded_samples_are_reproducible() {
        let a = SeededDurations::new(DelayBounds::default(), 7);
        let b = SeededDurations::new(DelayBounds::default(), 7);
        for actor in 0..10 {
            assert_eq!(
                a.sample(DelayKind::TripDuration, actor, 3),
                b.sample(DelayKind::TripDuration, actor, 3)
            );
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let bounds = DelayBounds {
            rider_arrival: DelayRange::fixed(20),
            ..DelayBounds::default()
        };
        let provider = SeededDurations::new(bounds, 1);
        assert_eq!(
            provider.sample(DelayKind::RiderArrival, 9, 0),
            Duration::from_millis(20)
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DelayRange::new(10, 5).validate("trip_duration").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { name: "trip_duration", .. }));
    }

    #[test]
    fn fixed_durations_ignore_actor_and_sequence() {
        let provider = FixedDurations::from_millis(0, 5, 120);
        assert_eq!(provider.sample(DelayKind::VehicleIdle, 3, 99), Duration::from_millis(5));
        assert_eq!(provider.sample(DelayKind::TripDuration, 0, 0), Duration::from_millis(120));
    }
}
