use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distributions::{DelayBounds, DelayRange};
use crate::error::ConfigError;

/// Default vehicle pool size.
const DEFAULT_NUM_VEHICLES: usize = 500;

/// Default rider population: ten riders per vehicle.
const DEFAULT_NUM_RIDERS: usize = DEFAULT_NUM_VEHICLES * 10;

/// Default dispatcher solicitation window.
const DEFAULT_SOLICITATION_TIMEOUT_MS: u64 = 500;

/// Parameters for building a dispatch scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchParams {
    pub num_vehicles: usize,
    pub num_riders: usize,
    /// How long the dispatcher waits for a vehicle offer per request.
    pub solicitation_timeout_ms: u64,
    /// Random delay bounds for arrival jitter, idle back-off and trips.
    pub delays: DelayBounds,
    /// Seed for the default duration provider. If None, a random seed is drawn.
    pub seed: Option<u64>,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            num_vehicles: DEFAULT_NUM_VEHICLES,
            num_riders: DEFAULT_NUM_RIDERS,
            solicitation_timeout_ms: DEFAULT_SOLICITATION_TIMEOUT_MS,
            delays: DelayBounds::default(),
            seed: None,
        }
    }
}

impl DispatchParams {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solicitation_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.delays.rider_arrival.validate("rider_arrival")?;
        self.delays.vehicle_idle.validate("vehicle_idle")?;
        self.delays.trip_duration.validate("trip_duration")?;
        // a zero back-off would let idle vehicles spin without yielding to the timer
        if self.delays.vehicle_idle.max_ms == 0 {
            return Err(ConfigError::ZeroIdleBackoff);
        }
        Ok(())
    }

    pub fn solicitation_timeout(&self) -> Duration {
        Duration::from_millis(self.solicitation_timeout_ms)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_population(mut self, num_vehicles: usize, num_riders: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self.num_riders = num_riders;
        self
    }

    pub fn with_solicitation_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.solicitation_timeout_ms = timeout_ms;
        self
    }

    pub fn with_rider_arrival(mut self, range: DelayRange) -> Self {
        self.delays.rider_arrival = range;
        self
    }

    pub fn with_vehicle_idle(mut self, range: DelayRange) -> Self {
        self.delays.vehicle_idle = range;
        self
    }

    pub fn with_trip_duration(mut self, range: DelayRange) -> Self {
        self.delays.trip_duration = range;
        self
    }
}
