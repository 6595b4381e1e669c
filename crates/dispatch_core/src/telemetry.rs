//! Telemetry / KPIs: dispatch events and the records folded from them.
//!
//! Actors emit [DispatchEvent]s through an [EventSink]; emission is
//! fire-and-forget and never blocks an actor. A [TelemetryCollector] folds the
//! stream into [DispatchTelemetry] once every sink has been dropped.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::agents::{RiderId, VehicleId};
use crate::clock::SimulationClock;

/// How a broker session resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Matched(VehicleId),
    Unmatched,
}

/// One observable step of the protocol. Timestamps are simulation ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    RideRequested {
        rider: RiderId,
        at_ms: u64,
    },
    SessionOpened {
        session: u64,
        rider: RiderId,
        at_ms: u64,
    },
    SessionClosed {
        session: u64,
        rider: RiderId,
        outcome: SessionOutcome,
        at_ms: u64,
    },
    TripStarted {
        vehicle: VehicleId,
        rider: RiderId,
        at_ms: u64,
    },
    TripCompleted {
        vehicle: VehicleId,
        rider: RiderId,
        at_ms: u64,
    },
}

/// Sending half of the event stream, cloned into every actor.
#[derive(Debug, Clone)]
pub struct EventSink {
    clock: SimulationClock,
    tx: Option<mpsc::UnboundedSender<DispatchEvent>>,
}

impl EventSink {
    /// A sink that timestamps but discards every event.
    pub fn disabled(clock: SimulationClock) -> Self {
        Self { clock, tx: None }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn emit(&self, event: DispatchEvent) {
        if let Some(tx) = &self.tx {
            // collector gone means nobody is listening any more
            let _ = tx.send(event);
        }
    }
}

/// Completed broker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    pub session: u64,
    pub rider: RiderId,
    pub requested_at: u64,
    pub opened_at: u64,
    pub closed_at: u64,
    pub outcome: SessionOutcome,
}

impl SessionRecord {
    /// Time the dispatcher spent brokering this request.
    pub fn broker_duration(&self) -> u64 {
        self.closed_at.saturating_sub(self.opened_at)
    }

    /// Time from the rider's request until the session resolved.
    pub fn time_to_resolve(&self) -> u64 {
        self.closed_at.saturating_sub(self.requested_at)
    }
}

/// One completed trip, recorded when the vehicle finishes driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedTripRecord {
    pub vehicle: VehicleId,
    pub rider: RiderId,
    pub requested_at: u64,
    pub matched_at: u64,
    pub started_at: u64,
    pub completed_at: u64,
}

impl CompletedTripRecord {
    /// Time from request to the dispatcher's match.
    pub fn time_to_match(&self) -> u64 {
        self.matched_at.saturating_sub(self.requested_at)
    }

    /// Time from match until the vehicle picked up the trip request.
    pub fn time_to_start(&self) -> u64 {
        self.started_at.saturating_sub(self.matched_at)
    }

    pub fn trip_duration(&self) -> u64 {
        self.completed_at.saturating_sub(self.started_at)
    }
}

/// Aggregated counts over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub requests: usize,
    pub sessions: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub trips_started: usize,
    pub trips_completed: usize,
}

/// Everything observed during one simulation run.
#[derive(Debug, Clone, Default)]
pub struct DispatchTelemetry {
    pub counts: OutcomeCounts,
    pub sessions: Vec<SessionRecord>,
    pub completed_trips: Vec<CompletedTripRecord>,
    /// Highest number of simultaneously open broker sessions seen.
    pub max_open_sessions: usize,
    requested_at: HashMap<RiderId, u64>,
    matched_at: HashMap<RiderId, u64>,
    open_sessions: HashMap<u64, (RiderId, u64)>,
    started_trips: HashMap<(VehicleId, RiderId), u64>,
}

impl DispatchTelemetry {
    pub fn record(&mut self, event: DispatchEvent) {
        match event {
            DispatchEvent::RideRequested { rider, at_ms } => {
                self.counts.requests += 1;
                self.requested_at.insert(rider, at_ms);
            }
            DispatchEvent::SessionOpened {
                session,
                rider,
                at_ms,
            } => {
                self.counts.sessions += 1;
                self.open_sessions.insert(session, (rider, at_ms));
                self.max_open_sessions = self.max_open_sessions.max(self.open_sessions.len());
            }
            DispatchEvent::SessionClosed {
                session,
                rider,
                outcome,
                at_ms,
            } => {
                let opened_at = self
                    .open_sessions
                    .remove(&session)
                    .map(|(_, opened_at)| opened_at)
                    .unwrap_or(at_ms);
                match outcome {
                    SessionOutcome::Matched(_) => {
                        self.counts.matched += 1;
                        self.matched_at.insert(rider, at_ms);
                    }
                    SessionOutcome::Unmatched => self.counts.unmatched += 1,
                }
                self.sessions.push(SessionRecord {
                    session,
                    rider,
                    requested_at: self.requested_at.get(&rider).copied().unwrap_or(opened_at),
                    opened_at,
                    closed_at: at_ms,
                    outcome,
                });
            }
            DispatchEvent::TripStarted {
                vehicle,
                rider,
                at_ms,
            } => {
                self.counts.trips_started += 1;
                self.started_trips.insert((vehicle, rider), at_ms);
            }
            DispatchEvent::TripCompleted {
                vehicle,
                rider,
                at_ms,
            } => {
                self.counts.trips_completed += 1;
                let started_at = self
                    .started_trips
                    .remove(&(vehicle, rider))
                    .unwrap_or(at_ms);
                let matched_at = self.matched_at.get(&rider).copied().unwrap_or(started_at);
                self.completed_trips.push(CompletedTripRecord {
                    vehicle,
                    rider,
                    requested_at: self.requested_at.get(&rider).copied().unwrap_or(matched_at),
                    matched_at,
                    started_at,
                    completed_at: at_ms,
                });
            }
        }
    }

    /// First pair of sessions whose active windows overlap, if any.
    pub fn overlapping_sessions(&self) -> Option<(u64, u64)> {
        let mut windows: Vec<_> = self
            .sessions
            .iter()
            .map(|s| (s.opened_at, s.closed_at, s.session))
            .collect();
        windows.sort_by_key(|&(opened, _, session)| (opened, session));
        windows.windows(2).find_map(|pair| {
            let (_, prev_closed, prev) = pair[0];
            let (next_opened, _, next) = pair[1];
            (next_opened < prev_closed).then_some((prev, next))
        })
    }

    /// Sessions still open when the stream ended (should be zero after a clean run).
    pub fn unresolved_sessions(&self) -> usize {
        self.open_sessions.len()
    }

    pub fn unmatched_rate(&self) -> f64 {
        if self.counts.sessions == 0 {
            return 0.0;
        }
        self.counts.unmatched as f64 / self.counts.sessions as f64
    }
}

type EventObserver = Box<dyn FnMut(&DispatchEvent) + Send>;

/// Receiving half of the event stream.
pub struct TelemetryCollector {
    rx: mpsc::UnboundedReceiver<DispatchEvent>,
    observer: Option<EventObserver>,
}

impl TelemetryCollector {
    pub fn channel(clock: SimulationClock) -> (EventSink, TelemetryCollector) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            EventSink { clock, tx: Some(tx) },
            TelemetryCollector { rx, observer: None },
        )
    }

    /// Call `observer` for every event as it arrives, e.g. to print trips live.
    pub fn with_observer(mut self, observer: impl FnMut(&DispatchEvent) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Fold events until every [EventSink] has been dropped.
    pub async fn collect(mut self) -> DispatchTelemetry {
        let mut telemetry = DispatchTelemetry::default();
        while let Some(event) = self.rx.recv().await {
            if let Some(observer) = self.observer.as_mut() {
                observer(&event);
            }
            telemetry.record(event);
        }
        telemetry
    }
}

impl std::fmt::Debug for TelemetryCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryCollector")
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
