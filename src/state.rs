use std::sync::{Mutex, MutexGuard};

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::engine::fare::FareCalculator;
use crate::engine::lifecycle::RideService;
use crate::error::AppError;
use crate::models::ride::RideEvent;
use crate::models::wallet::Wallet;
use crate::observability::metrics::Metrics;

pub struct AppState {
    rides: Mutex<RideService>,
    pub wallets: DashMap<String, Wallet>,
    pub ride_events_tx: broadcast::Sender<RideEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, fares: FareCalculator) -> Self {
        let (ride_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);
        let metrics = Metrics::new();
        let rides = RideService::new(fares, ride_events_tx.clone(), metrics.clone());

        Self {
            rides: Mutex::new(rides),
            wallets: DashMap::new(),
            ride_events_tx,
            metrics,
        }
    }

    /// Exclusive access to the ride service; every ride mutation goes through here.
    pub fn rides(&self) -> Result<MutexGuard<'_, RideService>, AppError> {
        self.rides
            .lock()
            .map_err(|err| AppError::Internal(format!("ride service lock poisoned: {err}")))
    }
}
