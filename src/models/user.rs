use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ride::RideId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Passenger,
    Driver,
}

impl Role {
    pub fn id_prefix(self) -> &'static str {
        match self {
            Role::Passenger => "PA",
            Role::Driver => "DR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(id: UserId, name: String, role: Role) -> Self {
        Self {
            id,
            name,
            role,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(flatten)]
    pub identity: Identity,
    pub ride_history: Vec<RideId>,
}

impl Passenger {
    pub fn new(id: UserId, name: String) -> Self {
        Self {
            identity: Identity::new(id, name, Role::Passenger),
            ride_history: Vec::new(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.identity.id
    }
}
