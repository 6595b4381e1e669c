use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{Assignment, RequestSender, RideRequest, RiderId, TripRequest};
use crate::barrier::{CompletionToken, Resolution};
use crate::distributions::{DelayKind, DurationProvider};
use crate::telemetry::{DispatchEvent, EventSink};

/// One ride request from arrival to hand-off.
#[derive(Debug)]
pub struct Rider {
    id: RiderId,
    requests: RequestSender,
    completion: CompletionToken,
    durations: Arc<dyn DurationProvider>,
    events: EventSink,
}

impl Rider {
    pub fn new(
        id: RiderId,
        requests: RequestSender,
        completion: CompletionToken,
        durations: Arc<dyn DurationProvider>,
        events: EventSink,
    ) -> Self {
        Self {
            id,
            requests,
            completion,
            durations,
            events,
        }
    }

    pub fn id(&self) -> RiderId {
        self.id
    }

    pub async fn run(self) {
        let Self {
            id,
            requests,
            completion,
            durations,
            events,
        } = self;

        tokio::time::sleep(durations.sample(DelayKind::RiderArrival, id.0, 0)).await;

        let (request, ticket) = RideRequest::new(id);
        events.emit(DispatchEvent::RideRequested {
            rider: id,
            at_ms: events.now_ms(),
        });
        if requests.send(request).await.is_err() {
            warn!(rider = %id, "dispatcher unavailable, giving up");
            completion.resolve(Resolution::Unmatched);
            return;
        }
        // the dispatcher stops once every rider has let go of the request channel
        drop(requests);

        // a buffered request is not accepted until the dispatcher opens its session
        if ticket.accepted.await.is_err() {
            warn!(rider = %id, "dispatcher dropped the request before accepting it");
            completion.resolve(Resolution::Unmatched);
            return;
        }
        trace!(rider = %id, "request accepted");

        match ticket.assignment.await {
            Ok(Assignment::Vehicle(vehicle)) => {
                debug!(rider = %id, vehicle = %vehicle.id(), "vehicle assigned");
                let trip = TripRequest {
                    rider: id,
                    completion,
                };
                if let Err(trip) = vehicle.request_trip(trip).await {
                    warn!(rider = %id, vehicle = %vehicle.id(), "assigned vehicle is gone");
                    trip.completion.resolve(Resolution::Unmatched);
                }
            }
            Ok(Assignment::NoVehicle) => {
                debug!(rider = %id, "no vehicle within the solicitation window");
                completion.resolve(Resolution::Unmatched);
            }
            Err(_) => {
                warn!(rider = %id, "dispatcher dropped the request unanswered");
                completion.resolve(Resolution::Unmatched);
            }
        }
    }
}
