use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::ride::RideRequest;
use crate::models::user::{Passenger, UserId};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/passengers", post(create_passenger))
        .route("/passengers/:id/rides", get(list_rides))
        .route("/passengers/:id/history", get(ride_history))
}

#[derive(Deserialize)]
pub struct CreatePassengerRequest {
    pub name: String,
}

async fn create_passenger(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePassengerRequest>,
) -> Result<Json<Passenger>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let passenger = state.rides()?.onboard_passenger(payload.name);
    Ok(Json(passenger))
}

async fn list_rides(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RideRequest>>, AppError> {
    let id = UserId(id);
    let rides = state.rides()?;
    rides.passenger(&id)?;
    Ok(Json(rides.history_for(&id)))
}

async fn ride_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RideRequest>>, AppError> {
    let history = state.rides()?.passenger_history(&UserId(id))?;
    Ok(Json(history))
}
