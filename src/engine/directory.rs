use std::collections::HashMap;

use crate::geo::{distance, Location};
use crate::models::driver::Driver;
use crate::models::user::UserId;
use crate::models::vehicle::VehicleType;

/// Every driver record ever registered, plus the matching pool of currently
/// registered ids in registration order.
///
/// Unregistering only leaves the pool. The record stays reachable by id so a
/// ride already held by that driver can still be picked up and completed.
#[derive(Debug, Default)]
pub struct DriverDirectory {
    drivers: HashMap<UserId, Driver>,
    registered: Vec<UserId>,
}

impl DriverDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a known id keeps the stored record and only restores it to the pool.
    pub fn register(&mut self, driver: Driver) {
        let id = driver.id().clone();
        self.drivers.entry(id.clone()).or_insert(driver);
        if !self.is_registered(&id) {
            self.registered.push(id);
        }
    }

    /// Returns whether the driver was in the pool.
    pub fn unregister(&mut self, id: &UserId) -> bool {
        let before = self.registered.len();
        self.registered.retain(|registered| registered != id);
        self.registered.len() != before
    }

    pub fn is_registered(&self, id: &UserId) -> bool {
        self.registered.contains(id)
    }

    pub fn get(&self, id: &UserId) -> Option<&Driver> {
        self.drivers.get(id)
    }

    pub fn get_mut(&mut self, id: &UserId) -> Option<&mut Driver> {
        self.drivers.get_mut(id)
    }

    /// Drivers in the pool, oldest registration first.
    pub fn iter(&self) -> impl Iterator<Item = &Driver> {
        self.registered.iter().filter_map(|id| self.drivers.get(id))
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.iter().filter(|driver| driver.available).count()
    }

    /// Closest available driver to `pickup`, optionally restricted to one vehicle type.
    /// Ties go to the driver registered first.
    pub fn find_nearest(&self, pickup: Location, vehicle_type: Option<VehicleType>) -> Option<&Driver> {
        self.iter()
            .filter(|driver| driver.available)
            .filter(|driver| match vehicle_type {
                Some(wanted) => driver.vehicle_type() == Some(wanted),
                None => true,
            })
            .min_by_key(|driver| distance(driver.location, pickup))
    }
}
