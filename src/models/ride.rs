use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::geo::Location;
use crate::models::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(pub String);

impl RideId {
    pub fn sequence(n: u64) -> Self {
        Self(format!("RIDE_{n}"))
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 5] = [
        RideStatus::Requested,
        RideStatus::Accepted,
        RideStatus::InProgress,
        RideStatus::Completed,
        RideStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Requested => "REQUESTED",
            RideStatus::Accepted => "ACCEPTED",
            RideStatus::InProgress => "IN_PROGRESS",
            RideStatus::Completed => "COMPLETED",
            RideStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// Whether a ride in this status must reference a driver.
    pub fn has_driver(self) -> bool {
        matches!(
            self,
            RideStatus::Accepted | RideStatus::InProgress | RideStatus::Completed
        )
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| AppError::InvalidStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: RideId,
    pub passenger_id: UserId,
    pub pickup: Location,
    pub destination: Location,
    pub driver_id: Option<UserId>,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_fare: Decimal,
    pub payment_id: Option<String>,
    pub receipt_id: Option<String>,
}

impl RideRequest {
    pub fn new(
        id: RideId,
        passenger_id: UserId,
        pickup: Location,
        destination: Location,
        estimated_fare: Decimal,
    ) -> Self {
        Self {
            id,
            passenger_id,
            pickup,
            destination,
            driver_id: None,
            status: RideStatus::Requested,
            created_at: Utc::now(),
            completed_at: None,
            estimated_fare,
            payment_id: None,
            receipt_id: None,
        }
    }

    pub fn is_driven_by(&self, driver_id: &UserId) -> bool {
        self.driver_id.as_ref() == Some(driver_id)
    }

    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.passenger_id == user_id || self.is_driven_by(user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideEvent {
    pub ride_id: RideId,
    pub status: RideStatus,
    pub driver_id: Option<UserId>,
    pub at: DateTime<Utc>,
}

impl From<&RideRequest> for RideEvent {
    fn from(ride: &RideRequest) -> Self {
        Self {
            ride_id: ride.id.clone(),
            status: ride.status,
            driver_id: ride.driver_id.clone(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RideStatus;
    use crate::error::AppError;

    #[test]
    fn status_parses_its_wire_names() {
        for status in RideStatus::ALL {
            assert_eq!(status.as_str().parse::<RideStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_contract_violation() {
        let err = "FINISHED".parse::<RideStatus>().unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(ref raw) if raw == "FINISHED"));
    }

    #[test]
    fn only_completed_and_cancelled_are_terminal() {
        let terminal: Vec<_> = RideStatus::ALL
            .into_iter()
            .filter(|status| status.is_terminal())
            .collect();
        assert_eq!(terminal, vec![RideStatus::Completed, RideStatus::Cancelled]);
    }

    #[test]
    fn serde_matches_as_str() {
        let json = serde_json::to_string(&RideStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
