use std::sync::Arc;
use std::time::Duration;

use async_channel::TryRecvError;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::{SolicitationReceiver, TripRequest, VehicleHandle, VehicleId, VehicleInbox};
use crate::barrier::Resolution;
use crate::distributions::{DelayKind, DurationProvider};
use crate::telemetry::{DispatchEvent, EventSink};

/// Lower bound on the idle back-off so a polling vehicle always yields.
const MIN_IDLE_BACKOFF: Duration = Duration::from_millis(1);

/// What one vehicle did over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleSummary {
    pub vehicle: VehicleId,
    /// Offers the dispatcher accepted.
    pub claims: u64,
    /// Offers refused because the session had already timed out.
    pub refused_offers: u64,
    /// Accepted offers given back because the assignment never reached the rider.
    pub released: u64,
    pub trips: u64,
}

/// One unit of capacity, alternating between polling for solicitations and
/// driving the rider it was assigned.
#[derive(Debug)]
pub struct Vehicle {
    handle: VehicleHandle,
    solicitations: SolicitationReceiver,
    inbox: VehicleInbox,
    durations: Arc<dyn DurationProvider>,
    events: EventSink,
}

impl Vehicle {
    /// `handle` must be the sending side of `inbox`.
    pub fn new(
        handle: VehicleHandle,
        inbox: VehicleInbox,
        solicitations: SolicitationReceiver,
        durations: Arc<dyn DurationProvider>,
        events: EventSink,
    ) -> Self {
        Self {
            handle,
            solicitations,
            inbox,
            durations,
            events,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.handle.id()
    }

    /// Poll until the dispatcher is gone and no committed rider is pending.
    ///
    /// Each iteration tries, without blocking: claim a solicitation (unless an
    /// accepted offer is still waiting for its rider), else drop a released
    /// claim, else start a pending trip, else back off for a short random delay.
    pub async fn run(mut self) -> VehicleSummary {
        let id = self.id();
        let mut summary = VehicleSummary {
            vehicle: id,
            ..VehicleSummary::default()
        };
        // session whose offer was accepted and whose rider has not shown up yet
        let mut claimed: Option<u64> = None;
        let mut dispatcher_gone = false;
        let mut idle_seq = 0u64;

        loop {
            if claimed.is_none() {
                match self.solicitations.try_recv() {
                    Ok(solicitation) => {
                        let session = solicitation.session();
                        match solicitation.offer(self.handle.clone()) {
                            Ok(()) => {
                                trace!(vehicle = %id, session, "offer accepted");
                                summary.claims += 1;
                                claimed = Some(session);
                            }
                            Err(_) => {
                                trace!(vehicle = %id, session, "offer refused, session resolved");
                                summary.refused_offers += 1;
                            }
                        }
                        continue;
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Closed) => dispatcher_gone = true,
                }
            }

            if let Ok(session) = self.inbox.releases.try_recv() {
                if claimed == Some(session) {
                    debug!(vehicle = %id, session, "claim released, rider never arrived");
                    claimed = None;
                    summary.released += 1;
                } else {
                    warn!(vehicle = %id, session, "release for a session we do not hold");
                }
                continue;
            }

            match self.inbox.trips.try_recv() {
                Ok(trip) => {
                    if claimed.take().is_none() {
                        warn!(vehicle = %id, rider = %trip.rider, "trip request without a claim");
                    }
                    self.drive(trip, summary.trips).await;
                    summary.trips += 1;
                    continue;
                }
                Err(mpsc::error::TryRecvError::Empty) => {}
                // unreachable while we hold our own handle
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }

            if dispatcher_gone && claimed.is_none() {
                break;
            }

            let backoff = self
                .durations
                .sample(DelayKind::VehicleIdle, id.0, idle_seq)
                .max(MIN_IDLE_BACKOFF);
            idle_seq += 1;
            tokio::time::sleep(backoff).await;
        }

        debug!(vehicle = %id, trips = summary.trips, claims = summary.claims, "vehicle stopping");
        summary
    }

    async fn drive(&self, trip: TripRequest, seq: u64) {
        let vehicle = self.id();
        let TripRequest { rider, completion } = trip;

        self.events.emit(DispatchEvent::TripStarted {
            vehicle,
            rider,
            at_ms: self.events.now_ms(),
        });
        tokio::time::sleep(self.durations.sample(DelayKind::TripDuration, vehicle.0, seq)).await;
        self.events.emit(DispatchEvent::TripCompleted {
            vehicle,
            rider,
            at_ms: self.events.now_ms(),
        });

        debug!(vehicle = %vehicle, rider = %rider, "trip completed");
        completion.resolve(Resolution::Matched { vehicle });
    }
}
