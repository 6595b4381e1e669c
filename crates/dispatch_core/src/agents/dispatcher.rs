use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use super::{
    Assignment, RequestReceiver, RideRequest, RiderId, Solicitation, SolicitationReceiver,
    SolicitationSender, VehicleHandle,
};
use crate::telemetry::{DispatchEvent, EventSink, SessionOutcome};

/// The single broker between riders and the vehicle pool.
///
/// Requests are handled strictly one at a time. Each broker session announces
/// one [Solicitation] and races the first vehicle offer against the
/// solicitation timeout; whichever comes first decides the rider's
/// [Assignment].
#[derive(Debug)]
pub struct Dispatcher {
    requests: RequestReceiver,
    solicitations: SolicitationSender,
    /// Receiving side of our own announcements, used to withdraw one that no
    /// vehicle claimed before the timeout.
    withdrawals: SolicitationReceiver,
    timeout: Duration,
    events: EventSink,
    sessions: u64,
}

impl Dispatcher {
    pub fn new(
        requests: RequestReceiver,
        solicitations: SolicitationSender,
        withdrawals: SolicitationReceiver,
        timeout: Duration,
        events: EventSink,
    ) -> Self {
        Self {
            requests,
            solicitations,
            withdrawals,
            timeout,
            events,
            sessions: 0,
        }
    }

    /// Broker requests until every rider has dropped its request sender.
    /// Returns the number of sessions run.
    pub async fn run(mut self) -> u64 {
        while let Some(request) = self.requests.recv().await {
            self.broker(request).await;
        }
        debug!(sessions = self.sessions, "request channel closed, dispatcher stopping");
        // dropping `self` closes the solicitation channel, which lets idle vehicles stop
        self.sessions
    }

    /// Run one broker session to resolution.
    ///
    /// Opening the session is what accepts the request: the rider's
    /// `accepted` slot fires here, and the solicitation timeout starts with it.
    pub async fn broker(&mut self, request: RideRequest) -> SessionOutcome {
        self.sessions += 1;
        let session = self.sessions;
        let RideRequest {
            rider,
            accepted,
            assignment,
        } = request;

        trace!(session, rider = %rider, "session opened");
        self.events.emit(DispatchEvent::SessionOpened {
            session,
            rider,
            at_ms: self.events.now_ms(),
        });

        let outcome = if accepted.send(()).is_err() {
            // nobody is waiting, so do not tie up a vehicle for it
            debug!(session, rider = %rider, "rider left before its request was accepted");
            SessionOutcome::Unmatched
        } else {
            let reply = match self.solicit(session).await {
                Some(vehicle) => {
                    debug!(session, rider = %rider, vehicle = %vehicle.id(), "matched");
                    Assignment::Vehicle(vehicle)
                }
                None => {
                    debug!(session, rider = %rider, "no vehicle offered within timeout");
                    Assignment::NoVehicle
                }
            };
            deliver(session, rider, assignment, reply)
        };

        self.events.emit(DispatchEvent::SessionClosed {
            session,
            rider,
            outcome,
            at_ms: self.events.now_ms(),
        });
        outcome
    }

    /// Announce a solicitation and wait for an offer, bounded by the timeout.
    async fn solicit(&self, session: u64) -> Option<VehicleHandle> {
        let (offer_tx, mut offer_rx) = oneshot::channel();
        let solicitations = &self.solicitations;
        let offer_slot = &mut offer_rx;
        let announce_and_wait = async move {
            solicitations
                .send(Solicitation::new(session, offer_tx))
                .await
                .ok()?;
            offer_slot.await.ok()
        };

        if let Ok(Some(vehicle)) = tokio::time::timeout(self.timeout, announce_and_wait).await {
            return Some(vehicle);
        }

        // Timer won. Close the slot first so no vehicle can commit after this
        // point, then honour an offer that was delivered before the close.
        offer_rx.close();
        let late = offer_rx.try_recv().ok();
        while self.withdrawals.try_recv().is_ok() {
            trace!(session, "withdrew unclaimed solicitation");
        }
        late
    }
}

/// Hand `reply` to the rider. A vehicle that cannot be delivered gets its
/// claim released and the session counts as unmatched.
fn deliver(
    session: u64,
    rider: RiderId,
    assignment: oneshot::Sender<Assignment>,
    reply: Assignment,
) -> SessionOutcome {
    let outcome = match &reply {
        Assignment::Vehicle(vehicle) => SessionOutcome::Matched(vehicle.id()),
        Assignment::NoVehicle => SessionOutcome::Unmatched,
    };
    match assignment.send(reply) {
        Ok(()) => outcome,
        Err(Assignment::Vehicle(vehicle)) => {
            let id = vehicle.id();
            warn!(session, rider = %rider, vehicle = %id, "rider left, releasing vehicle");
            if !vehicle.release(session) {
                warn!(session, vehicle = %id, "vehicle could not be released");
            }
            SessionOutcome::Unmatched
        }
        Err(Assignment::NoVehicle) => {
            debug!(session, rider = %rider, "rider left before learning it was unmatched");
            SessionOutcome::Unmatched
        }
    }
}
