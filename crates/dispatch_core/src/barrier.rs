//! Process-wide completion barrier.
//!
//! Each rider is registered once at creation and receives a
//! [CompletionToken]. The token is resolved exactly once, either by the rider
//! itself (unmatched) or by the vehicle that drove it (matched). The barrier
//! collects the outcomes centrally instead of sharing a counter.

use tokio::sync::mpsc;

use crate::agents::{RiderId, VehicleId};

/// Terminal state of one rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Matched { vehicle: VehicleId },
    Unmatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiderOutcome {
    pub rider: RiderId,
    pub resolution: Resolution,
}

impl RiderOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self.resolution, Resolution::Matched { .. })
    }
}

/// One rider's share of the barrier. Consumed on resolution, so a rider can
/// never be counted twice.
#[derive(Debug)]
pub struct CompletionToken {
    rider: RiderId,
    tx: mpsc::UnboundedSender<RiderOutcome>,
}

impl CompletionToken {
    pub fn rider(&self) -> RiderId {
        self.rider
    }

    pub fn resolve(self, resolution: Resolution) {
        let _ = self.tx.send(RiderOutcome {
            rider: self.rider,
            resolution,
        });
    }
}

/// Awaits the terminal outcome of every registered rider.
#[derive(Debug)]
pub struct CompletionBarrier {
    expected: usize,
    tx: mpsc::UnboundedSender<RiderOutcome>,
    rx: mpsc::UnboundedReceiver<RiderOutcome>,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            expected: 0,
            tx,
            rx,
        }
    }

    pub fn register(&mut self, rider: RiderId) -> CompletionToken {
        self.expected += 1;
        CompletionToken {
            rider,
            tx: self.tx.clone(),
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Block until every registered rider resolved.
    ///
    /// Returns early with fewer outcomes only if tokens were dropped without
    /// being resolved, which happens when actor tasks are torn down.
    pub async fn wait(self) -> Vec<RiderOutcome> {
        let Self {
            expected,
            tx,
            mut rx,
        } = self;
        drop(tx);

        let mut outcomes = Vec::with_capacity(expected);
        while outcomes.len() < expected {
            match rx.recv().await {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }
        outcomes
    }
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}
