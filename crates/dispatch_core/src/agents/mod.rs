//! Rider, dispatcher and vehicle actors plus the messages they exchange.
//!
//! Actors share nothing but channels. The request channel is many-to-one into
//! the dispatcher, the solicitation channel is one-to-many into the vehicle
//! pool (multi-consumer, so each announcement is received by exactly one
//! vehicle), and every rider and vehicle owns a private inbound channel.
//!
//! The request channel's buffer slot is not acceptance. A request counts as
//! accepted only when the dispatcher opens its broker session and fires the
//! request's `accepted` slot, so the solicitation timeout runs from that point.

mod dispatcher;
mod rider;
mod vehicle;

use std::fmt;

use tokio::sync::{mpsc, oneshot};

use crate::barrier::CompletionToken;

pub use dispatcher::Dispatcher;
pub use rider::Rider;
pub use vehicle::{Vehicle, VehicleSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RiderId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rider asking the dispatcher for a vehicle. Carries the rider's private
/// acceptance and assignment slots, each of which accepts exactly one message.
#[derive(Debug)]
pub struct RideRequest {
    pub rider: RiderId,
    /// Fired by the dispatcher when the broker session for this request opens.
    pub accepted: oneshot::Sender<()>,
    pub assignment: oneshot::Sender<Assignment>,
}

/// The rider's side of a [RideRequest].
#[derive(Debug)]
pub struct RequestTicket {
    pub accepted: oneshot::Receiver<()>,
    pub assignment: oneshot::Receiver<Assignment>,
}

impl RideRequest {
    pub fn new(rider: RiderId) -> (Self, RequestTicket) {
        let (accepted, accepted_rx) = oneshot::channel();
        let (assignment, assignment_rx) = oneshot::channel();
        (
            Self {
                rider,
                accepted,
                assignment,
            },
            RequestTicket {
                accepted: accepted_rx,
                assignment: assignment_rx,
            },
        )
    }
}

/// The dispatcher's answer to a [RideRequest].
#[derive(Debug)]
pub enum Assignment {
    Vehicle(VehicleHandle),
    NoVehicle,
}

/// Sent by a rider on its assigned vehicle's trip channel. The vehicle
/// resolves the completion token once the trip is over.
#[derive(Debug)]
pub struct TripRequest {
    pub rider: RiderId,
    pub completion: CompletionToken,
}

/// Address of one vehicle: its identity, private trip channel and release
/// channel.
#[derive(Debug, Clone)]
pub struct VehicleHandle {
    id: VehicleId,
    trips: mpsc::Sender<TripRequest>,
    releases: mpsc::Sender<u64>,
}

impl VehicleHandle {
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Hand a trip to the vehicle. Returns the request if the vehicle is gone.
    pub async fn request_trip(&self, trip: TripRequest) -> Result<(), TripRequest> {
        self.trips.send(trip).await.map_err(|rejected| rejected.0)
    }

    /// Give back the vehicle's claim on `session` when the assignment could not
    /// be delivered. Returns `false` if the vehicle is gone or already has a
    /// release pending.
    pub fn release(&self, session: u64) -> bool {
        self.releases.try_send(session).is_ok()
    }
}

/// Receiving side of a vehicle's private channels.
#[derive(Debug)]
pub struct VehicleInbox {
    trips: mpsc::Receiver<TripRequest>,
    releases: mpsc::Receiver<u64>,
}

/// The dispatcher announcing that it is looking for a vehicle.
#[derive(Debug)]
pub struct Solicitation {
    session: u64,
    offer: oneshot::Sender<VehicleHandle>,
}

impl Solicitation {
    pub fn new(session: u64, offer: oneshot::Sender<VehicleHandle>) -> Self {
        Self { session, offer }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Offer `vehicle` for this session. `Ok` means the dispatcher will assign
    /// the vehicle; `Err` means the session already resolved without it.
    pub fn offer(self, vehicle: VehicleHandle) -> Result<(), VehicleHandle> {
        self.offer.send(vehicle)
    }
}

pub type RequestSender = mpsc::Sender<RideRequest>;
pub type RequestReceiver = mpsc::Receiver<RideRequest>;
pub type SolicitationSender = async_channel::Sender<Solicitation>;
pub type SolicitationReceiver = async_channel::Receiver<Solicitation>;

/// Shared rider → dispatcher channel. A single slot keeps riders queued on
/// send while the dispatcher is busy brokering; a buffered request is still
/// waiting for acceptance.
pub fn request_channel() -> (RequestSender, RequestReceiver) {
    mpsc::channel(1)
}

/// Shared dispatcher → vehicle pool channel. Holds at most the one
/// outstanding announcement.
pub fn solicitation_channel() -> (SolicitationSender, SolicitationReceiver) {
    async_channel::bounded(1)
}

/// Private trip and release channels for one vehicle, capacity one each.
pub fn vehicle_channel(id: VehicleId) -> (VehicleHandle, VehicleInbox) {
    let (trips, trips_rx) = mpsc::channel(1);
    let (releases, releases_rx) = mpsc::channel(1);
    (
        VehicleHandle {
            id,
            trips,
            releases,
        },
        VehicleInbox {
            trips: trips_rx,
            releases: releases_rx,
        },
    )
}
