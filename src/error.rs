use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::models::ride::{RideId, RideStatus};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid location {0:?}: expected a single letter A-Z")]
    InvalidLocation(String),

    #[error("invalid ride status {0:?}")]
    InvalidStatus(String),

    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("no drivers available")]
    NoAvailableDrivers,

    #[error("settlement failed for {ride_id}: {reason}")]
    SettlementFailed { ride_id: RideId, reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Expected business outcomes that refuse an operation without changing any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("insufficient funds: fare {required} exceeds payer balance")]
    InsufficientFunds { required: Decimal },

    #[error("requester does not own the ride")]
    NotRideOwner,

    #[error("driver is not assigned to the ride")]
    DriverNotAssigned,

    #[error("cannot {action} a ride in status {from}")]
    InvalidTransition {
        from: RideStatus,
        action: &'static str,
    },

    #[error("driver is not available")]
    DriverUnavailable,

    #[error("driver has no vehicle assigned")]
    NoVehicleAssigned,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_)
            | AppError::InvalidLocation(_)
            | AppError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(Rejection::InsufficientFunds { .. }) => StatusCode::PAYMENT_REQUIRED,
            AppError::Rejected(_) => StatusCode::CONFLICT,
            AppError::NoAvailableDrivers => StatusCode::SERVICE_UNAVAILABLE,
            AppError::SettlementFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
