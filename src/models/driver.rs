use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::geo::Location;
use crate::models::ride::RideId;
use crate::models::user::{Identity, Role, UserId};
use crate::models::vehicle::{Vehicle, VehicleType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    #[serde(flatten)]
    pub identity: Identity,
    pub available: bool,
    pub location: Location,
    pub vehicle: Option<Vehicle>,
    pub completed_rides: Vec<RideId>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn new(id: UserId, name: String, location: Location) -> Self {
        Self {
            identity: Identity::new(id, name, Role::Driver),
            available: true,
            location,
            vehicle: None,
            completed_rides: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.identity.id
    }

    pub fn vehicle_type(&self) -> Option<VehicleType> {
        self.vehicle.as_ref().map(|vehicle| vehicle.vehicle_type)
    }

    /// A driver may only accept rides while available and with a vehicle.
    pub fn ensure_can_accept(&self) -> Result<(), Rejection> {
        if !self.available {
            return Err(Rejection::DriverUnavailable);
        }
        if self.vehicle.is_none() {
            return Err(Rejection::NoVehicleAssigned);
        }
        Ok(())
    }

    pub fn set_availability(&mut self, available: bool) {
        self.available = available;
        self.updated_at = Utc::now();
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
        self.updated_at = Utc::now();
    }

    pub fn assign_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicle = Some(vehicle);
        self.updated_at = Utc::now();
    }
}
