use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A point on the fixed A-Z axis, stored as its index 0-25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(u8);

impl Location {
    pub fn from_letter(letter: char) -> Result<Self, AppError> {
        if letter.is_ascii_uppercase() {
            Ok(Self(letter as u8 - b'A'))
        } else {
            Err(AppError::InvalidLocation(letter.to_string()))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

impl FromStr for Location {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                Self::from_letter(letter).map_err(|_| AppError::InvalidLocation(raw.to_string()))
            }
            _ => Err(AppError::InvalidLocation(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Location {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.letter().to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Number of steps between two points on the axis.
pub fn distance(a: Location, b: Location) -> u32 {
    u32::from(a.index().abs_diff(b.index()))
}
