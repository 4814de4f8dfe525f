use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::engine::directory::DriverDirectory;
use crate::engine::fare::{FareCalculator, FareQuote, Surcharges};
use crate::engine::ids::IdGenerator;
use crate::engine::settlement::Payer;
use crate::error::{AppError, Rejection};
use crate::geo::Location;
use crate::models::driver::Driver;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::receipt::Receipt;
use crate::models::ride::{RideEvent, RideId, RideRequest, RideStatus};
use crate::models::user::{Passenger, Role, UserId};
use crate::models::vehicle::{Vehicle, VehicleType};
use crate::observability::metrics::Metrics;

/// Owns every ride request and drives it through
/// `REQUESTED -> ACCEPTED -> IN_PROGRESS -> COMPLETED`, or `REQUESTED -> CANCELLED`.
///
/// Rides reference drivers and passengers by id only; the live records sit in the
/// directory and passenger registry held here. Callers serialize access to one
/// instance (see `AppState`), so none of these methods lock internally.
pub struct RideService {
    rides: Vec<RideRequest>,
    positions: HashMap<RideId, usize>,
    last_ride_id: u64,
    last_payment_id: u64,
    drivers: DriverDirectory,
    passengers: HashMap<UserId, Passenger>,
    payments: HashMap<String, Payment>,
    receipts: HashMap<String, Receipt>,
    fares: FareCalculator,
    ids: IdGenerator,
    events_tx: broadcast::Sender<RideEvent>,
    metrics: Metrics,
}

impl RideService {
    pub fn new(
        fares: FareCalculator,
        events_tx: broadcast::Sender<RideEvent>,
        metrics: Metrics,
    ) -> Self {
        Self {
            rides: Vec::new(),
            positions: HashMap::new(),
            last_ride_id: 0,
            last_payment_id: 0,
            drivers: DriverDirectory::new(),
            passengers: HashMap::new(),
            payments: HashMap::new(),
            receipts: HashMap::new(),
            fares,
            ids: IdGenerator::new(),
            events_tx,
            metrics,
        }
    }

    pub fn onboard_passenger(&mut self, name: String) -> Passenger {
        let id = UserId(self.ids.issue(Role::Passenger.id_prefix()));
        let passenger = Passenger::new(id, name);
        self.passengers.insert(passenger.id().clone(), passenger.clone());
        passenger
    }

    pub fn onboard_driver(&mut self, name: String, location: Location) -> Driver {
        let id = UserId(self.ids.issue(Role::Driver.id_prefix()));
        let driver = Driver::new(id, name, location);
        self.register_driver(driver.clone());
        driver
    }

    pub fn register_driver(&mut self, driver: Driver) {
        self.drivers.register(driver);
        self.refresh_driver_gauge();
    }

    /// Takes the driver out of matching. Rides they already hold keep going.
    pub fn unregister_driver(&mut self, id: &UserId) -> bool {
        let removed = self.drivers.unregister(id);
        if removed {
            info!(driver_id = %id, "driver unregistered");
        }
        self.refresh_driver_gauge();
        removed
    }

    pub fn passenger(&self, id: &UserId) -> Result<&Passenger, AppError> {
        self.passengers
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("passenger {id} not found")))
    }

    pub fn driver(&self, id: &UserId) -> Result<&Driver, AppError> {
        self.drivers
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))
    }

    pub fn drivers(&self) -> Vec<Driver> {
        self.drivers.iter().cloned().collect()
    }

    pub fn assign_vehicle(&mut self, id: &UserId, vehicle: Vehicle) -> Result<Driver, AppError> {
        let driver = self.driver_mut(id)?;
        driver.assign_vehicle(vehicle);
        Ok(driver.clone())
    }

    pub fn set_availability(&mut self, id: &UserId, available: bool) -> Result<Driver, AppError> {
        let driver = self.driver_mut(id)?;
        driver.set_availability(available);
        let driver = driver.clone();
        self.refresh_driver_gauge();
        Ok(driver)
    }

    pub fn set_location(&mut self, id: &UserId, location: Location) -> Result<Driver, AppError> {
        let driver = self.driver_mut(id)?;
        driver.set_location(location);
        Ok(driver.clone())
    }

    pub fn quote(&self, pickup: Location, destination: Location, overrides: Surcharges) -> FareQuote {
        self.fares.quote(pickup, destination, overrides)
    }

    pub fn find_nearest(&self, pickup: Location, vehicle_type: Option<VehicleType>) -> Option<&Driver> {
        self.drivers.find_nearest(pickup, vehicle_type)
    }

    /// Quotes the trip and opens a REQUESTED ride if the payer can cover the quote.
    pub fn create_request(
        &mut self,
        passenger_id: &UserId,
        pickup: Location,
        destination: Location,
        payer: &dyn Payer,
    ) -> Result<RideRequest, AppError> {
        self.passenger(passenger_id)?;

        let fare = self.fares.quote(pickup, destination, Surcharges::default()).amount;
        if !payer.has_sufficient_balance(fare) {
            warn!(
                passenger_id = %passenger_id,
                payer_id = payer.id(),
                fare = %fare,
                "insufficient balance; ride request rejected"
            );
            self.metrics
                .ride_requests_total
                .with_label_values(&["rejected"])
                .inc();
            return Err(Rejection::InsufficientFunds { required: fare }.into());
        }

        self.last_ride_id += 1;
        let ride = RideRequest::new(
            RideId::sequence(self.last_ride_id),
            passenger_id.clone(),
            pickup,
            destination,
            fare,
        );

        self.positions.insert(ride.id.clone(), self.rides.len());
        self.rides.push(ride.clone());
        self.metrics
            .ride_requests_total
            .with_label_values(&["created"])
            .inc();
        self.publish(&ride);

        info!(ride_id = %ride.id, passenger_id = %passenger_id, fare = %fare, "ride requested");
        Ok(ride)
    }

    pub fn cancel(&mut self, ride_id: &RideId, requester: &UserId) -> Result<RideRequest, AppError> {
        let idx = self.position(ride_id)?;
        let ride = &self.rides[idx];

        if &ride.passenger_id != requester {
            return Err(Rejection::NotRideOwner.into());
        }
        ensure_status(ride, RideStatus::Requested, "cancel")?;

        self.transition(idx, RideStatus::Cancelled);
        Ok(self.rides[idx].clone())
    }

    /// Driver-side accept: only an available driver holding a vehicle gets through.
    pub fn accept(&mut self, ride_id: &RideId, driver_id: &UserId) -> Result<RideRequest, AppError> {
        self.driver(driver_id)?.ensure_can_accept()?;
        self.assign_driver(ride_id, driver_id)
    }

    pub fn assign_driver(&mut self, ride_id: &RideId, driver_id: &UserId) -> Result<RideRequest, AppError> {
        let idx = self.position(ride_id)?;
        ensure_status(&self.rides[idx], RideStatus::Requested, "accept")?;

        self.driver_mut(driver_id)?.set_availability(false);
        self.refresh_driver_gauge();
        self.rides[idx].driver_id = Some(driver_id.clone());
        self.transition(idx, RideStatus::Accepted);

        Ok(self.rides[idx].clone())
    }

    pub fn pickup(&mut self, ride_id: &RideId, driver_id: &UserId) -> Result<RideRequest, AppError> {
        self.driver(driver_id)?;
        let idx = self.position(ride_id)?;
        let ride = &self.rides[idx];

        if !ride.is_driven_by(driver_id) {
            return Err(Rejection::DriverNotAssigned.into());
        }
        ensure_status(ride, RideStatus::Accepted, "pick up")?;

        self.transition(idx, RideStatus::InProgress);
        Ok(self.rides[idx].clone())
    }

    /// Completes the ride, then settles a freshly computed fare against `payer`.
    ///
    /// The COMPLETED transition, driver release and history updates are committed
    /// before the debit. A failed debit is recorded as a FAILED payment and reported
    /// as `SettlementFailed`; nothing is rolled back.
    pub fn complete(
        &mut self,
        ride_id: &RideId,
        driver_id: &UserId,
        payer: &mut dyn Payer,
    ) -> Result<RideRequest, AppError> {
        self.driver(driver_id)?;
        let idx = self.position(ride_id)?;
        let ride = &self.rides[idx];

        if !ride.is_driven_by(driver_id) {
            return Err(Rejection::DriverNotAssigned.into());
        }
        ensure_status(ride, RideStatus::InProgress, "complete")?;

        self.rides[idx].completed_at = Some(Utc::now());
        self.transition(idx, RideStatus::Completed);

        let (pickup, destination) = (self.rides[idx].pickup, self.rides[idx].destination);
        let fare = self.fares.quote(pickup, destination, Surcharges::default()).amount;
        let debited = payer.debit(fare);

        self.last_payment_id += 1;
        let payment = Payment {
            id: format!("PAYMENT_{}", self.last_payment_id),
            ride_id: ride_id.clone(),
            payer_id: payer.id().to_string(),
            amount: fare,
            method: payer.method(),
            status: if debited.is_ok() {
                PaymentStatus::Completed
            } else {
                PaymentStatus::Failed
            },
            created_at: Utc::now(),
            processed_at: Some(Utc::now()),
        };
        self.rides[idx].payment_id = Some(payment.id.clone());
        self.payments.insert(payment.id.clone(), payment);

        let passenger_id = self.rides[idx].passenger_id.clone();
        if let Some(passenger) = self.passengers.get_mut(&passenger_id) {
            passenger.ride_history.push(ride_id.clone());
        }
        let driver = self.driver_mut(driver_id)?;
        driver.completed_rides.push(ride_id.clone());
        driver.set_availability(true);
        self.refresh_driver_gauge();

        match debited {
            Ok(()) => {
                self.metrics
                    .settlement_amount
                    .with_label_values(&["success"])
                    .observe(decimal_to_f64(fare));
                info!(ride_id = %ride_id, driver_id = %driver_id, fare = %fare, "ride settled");
                Ok(self.rides[idx].clone())
            }
            Err(err) => {
                self.metrics
                    .settlement_amount
                    .with_label_values(&["failed"])
                    .observe(decimal_to_f64(fare));
                warn!(ride_id = %ride_id, fare = %fare, error = %err, "settlement failed after completion");
                Err(AppError::SettlementFailed {
                    ride_id: ride_id.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    pub fn ride(&self, ride_id: &RideId) -> Result<&RideRequest, AppError> {
        Ok(&self.rides[self.position(ride_id)?])
    }

    pub fn status_of(&self, ride_id: &RideId) -> Result<RideStatus, AppError> {
        self.ride(ride_id).map(|ride| ride.status)
    }

    pub fn list_rides(&self, status: Option<RideStatus>) -> Vec<RideRequest> {
        self.rides
            .iter()
            .filter(|ride| status.is_none_or(|wanted| ride.status == wanted))
            .cloned()
            .collect()
    }

    /// Every ride the user took part in as passenger or assigned driver, oldest first.
    pub fn history_for(&self, user_id: &UserId) -> Vec<RideRequest> {
        self.rides
            .iter()
            .filter(|ride| ride.involves(user_id))
            .cloned()
            .collect()
    }

    pub fn passenger_history(&self, passenger_id: &UserId) -> Result<Vec<RideRequest>, AppError> {
        let passenger = self.passenger(passenger_id)?;
        self.resolve(&passenger.ride_history)
    }

    pub fn completed_rides(&self, driver_id: &UserId) -> Result<Vec<RideRequest>, AppError> {
        let driver = self.driver(driver_id)?;
        self.resolve(&driver.completed_rides)
    }

    pub fn payment(&self, id: &str) -> Option<&Payment> {
        self.payments.get(id)
    }

    pub fn generate_receipt(&mut self, ride_id: &RideId) -> Result<Receipt, AppError> {
        let idx = self.position(ride_id)?;
        let ride = &self.rides[idx];
        let payment = ride.payment_id.as_deref().and_then(|id| self.payments.get(id));
        let receipt = Receipt::for_ride(ride, payment);

        self.rides[idx].receipt_id = Some(receipt.id.clone());
        self.receipts.insert(receipt.id.clone(), receipt.clone());
        Ok(receipt)
    }

    /// Most recently generated receipt for the ride.
    pub fn receipt(&self, ride_id: &RideId) -> Result<&Receipt, AppError> {
        self.ride(ride_id)?
            .receipt_id
            .as_deref()
            .and_then(|id| self.receipts.get(id))
            .ok_or_else(|| AppError::NotFound(format!("receipt for ride {ride_id} not found")))
    }

    pub fn ride_count(&self) -> usize {
        self.rides.len()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    fn position(&self, ride_id: &RideId) -> Result<usize, AppError> {
        self.positions
            .get(ride_id)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("ride {ride_id} not found")))
    }

    fn driver_mut(&mut self, id: &UserId) -> Result<&mut Driver, AppError> {
        self.drivers
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))
    }

    fn resolve(&self, ids: &[RideId]) -> Result<Vec<RideRequest>, AppError> {
        ids.iter().map(|id| self.ride(id).cloned()).collect()
    }

    fn transition(&mut self, idx: usize, status: RideStatus) {
        let ride = &mut self.rides[idx];
        let from = ride.status;
        ride.status = status;

        self.metrics
            .ride_transitions_total
            .with_label_values(&[status.as_str()])
            .inc();
        info!(ride_id = %self.rides[idx].id, from = %from, to = %status, "ride status changed");
        self.publish(&self.rides[idx]);
    }

    fn publish(&self, ride: &RideRequest) {
        let _ = self.events_tx.send(RideEvent::from(ride));
    }

    fn refresh_driver_gauge(&self) {
        self.metrics
            .available_drivers
            .set(self.drivers.available_count() as i64);
    }
}

fn ensure_status(ride: &RideRequest, expected: RideStatus, action: &'static str) -> Result<(), Rejection> {
    if ride.status == expected {
        Ok(())
    } else {
        Err(Rejection::InvalidTransition {
            from: ride.status,
            action,
        })
    }
}

fn decimal_to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
