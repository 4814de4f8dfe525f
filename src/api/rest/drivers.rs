use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::ride::RideRequest;
use crate::models::user::UserId;
use crate::models::vehicle::{Vehicle, VehicleType};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver).get(list_drivers))
        .route("/drivers/nearest", get(nearest_driver))
        .route("/drivers/:id", delete(unregister_driver))
        .route("/drivers/:id/vehicle", put(assign_vehicle))
        .route("/drivers/:id/availability", patch(update_availability))
        .route("/drivers/:id/location", patch(update_location))
        .route("/drivers/:id/rides", get(list_rides))
        .route("/drivers/:id/completed", get(completed_rides))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub location: String,
}

#[derive(Deserialize)]
pub struct NearestQuery {
    pub pickup: String,
    pub vehicle_type: Option<VehicleType>,
}

#[derive(Deserialize)]
pub struct AssignVehicleRequest {
    pub id: String,
    pub vehicle_type: VehicleType,
    pub model: String,
    pub plate_number: String,
    pub capacity: u8,
}

#[derive(Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub available: bool,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: String,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    let location = payload.location.parse()?;

    let driver = state.rides()?.onboard_driver(payload.name, location);
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Driver>>, AppError> {
    Ok(Json(state.rides()?.drivers()))
}

async fn nearest_driver(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<Driver>, AppError> {
    let pickup = query.pickup.parse()?;
    let rides = state.rides()?;
    let driver = rides
        .find_nearest(pickup, query.vehicle_type)
        .ok_or(AppError::NoAvailableDrivers)?;

    Ok(Json(driver.clone()))
}

async fn unregister_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.rides()?.unregister_driver(&UserId(id));
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AssignVehicleRequest>,
) -> Result<Json<Driver>, AppError> {
    if payload.capacity == 0 {
        return Err(AppError::BadRequest("capacity must be > 0".to_string()));
    }

    let vehicle = Vehicle::new(
        payload.id,
        payload.vehicle_type,
        payload.model,
        payload.plate_number,
        payload.capacity,
    );
    let driver = state.rides()?.assign_vehicle(&UserId(id), vehicle)?;
    Ok(Json(driver))
}

async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = state
        .rides()?
        .set_availability(&UserId(id), payload.available)?;
    Ok(Json(driver))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Driver>, AppError> {
    let location = payload.location.parse()?;
    let driver = state.rides()?.set_location(&UserId(id), location)?;
    Ok(Json(driver))
}

async fn list_rides(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RideRequest>>, AppError> {
    let id = UserId(id);
    let rides = state.rides()?;
    rides.driver(&id)?;
    Ok(Json(rides.history_for(&id)))
}

async fn completed_rides(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RideRequest>>, AppError> {
    let completed = state.rides()?.completed_rides(&UserId(id))?;
    Ok(Json(completed))
}
