use tokio::time::Instant;

/// Simulation start reference. Timestamps are milliseconds since start and
/// follow tokio's clock, so paused test runtimes produce exact values.
#[derive(Debug, Clone, Copy)]
pub struct SimulationClock {
    started: Instant,
}

impl SimulationClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.ms_at(Instant::now())
    }

    /// Milliseconds between simulation start and `instant` (saturating at zero).
    pub fn ms_at(&self, instant: Instant) -> u64 {
        let elapsed = instant.saturating_duration_since(self.started);
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::start()
    }
}
