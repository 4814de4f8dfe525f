use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Suv,
    Bike,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub vehicle_type: VehicleType,
    pub model: String,
    pub plate_number: String,
    pub capacity: u8,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        vehicle_type: VehicleType,
        model: impl Into<String>,
        plate_number: impl Into<String>,
        capacity: u8,
    ) -> Self {
        Self {
            id: id.into(),
            vehicle_type,
            model: model.into(),
            plate_number: plate_number.into(),
            capacity,
            created_at: Utc::now(),
        }
    }
}
