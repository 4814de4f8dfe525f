use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::api::rest::wallets::wallet_not_found;
use crate::engine::fare::{FareQuote, Surcharges};
use crate::error::AppError;
use crate::models::receipt::Receipt;
use crate::models::ride::{RideId, RideRequest, RideStatus};
use crate::models::user::UserId;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", post(create_quote))
        .route("/rides", post(create_ride).get(list_rides))
        .route("/rides/:id", get(get_ride))
        .route("/rides/:id/cancel", post(cancel_ride))
        .route("/rides/:id/accept", post(accept_ride))
        .route("/rides/:id/pickup", post(pickup_passenger))
        .route("/rides/:id/complete", post(complete_ride))
        .route("/rides/:id/receipt", post(generate_receipt).get(get_receipt))
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub pickup: String,
    pub destination: String,
    #[serde(flatten)]
    pub surcharges: Surcharges,
}

#[derive(Deserialize)]
pub struct CreateRideRequest {
    pub passenger_id: String,
    pub pickup: String,
    pub destination: String,
    pub wallet_id: String,
}

#[derive(Deserialize)]
pub struct ListRidesQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct PassengerAction {
    pub passenger_id: String,
}

#[derive(Deserialize)]
pub struct DriverAction {
    pub driver_id: String,
}

#[derive(Deserialize)]
pub struct CompleteRideRequest {
    pub driver_id: String,
    pub wallet_id: String,
}

async fn create_quote(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<FareQuote>, AppError> {
    let pickup = payload.pickup.parse()?;
    let destination = payload.destination.parse()?;

    let quote = state.rides()?.quote(pickup, destination, payload.surcharges);
    Ok(Json(quote))
}

async fn create_ride(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRideRequest>,
) -> Result<Json<RideRequest>, AppError> {
    let pickup = payload.pickup.parse()?;
    let destination = payload.destination.parse()?;

    let mut rides = state.rides()?;
    let wallet = state
        .wallets
        .get(&payload.wallet_id)
        .ok_or_else(|| wallet_not_found(&payload.wallet_id))?;

    let ride = rides.create_request(&UserId(payload.passenger_id), pickup, destination, &*wallet)?;
    Ok(Json(ride))
}

async fn list_rides(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRidesQuery>,
) -> Result<Json<Vec<RideRequest>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<RideStatus>)
        .transpose()?;

    Ok(Json(state.rides()?.list_rides(status)))
}

async fn get_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, AppError> {
    let rides = state.rides()?;
    let ride = rides.ride(&RideId(id))?;
    Ok(Json(ride.clone()))
}

async fn cancel_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<PassengerAction>,
) -> Result<Json<RideRequest>, AppError> {
    let ride = state
        .rides()?
        .cancel(&RideId(id), &UserId(payload.passenger_id))?;
    Ok(Json(ride))
}

async fn accept_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<DriverAction>,
) -> Result<Json<RideRequest>, AppError> {
    let ride = state
        .rides()?
        .accept(&RideId(id), &UserId(payload.driver_id))?;
    Ok(Json(ride))
}

async fn pickup_passenger(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<DriverAction>,
) -> Result<Json<RideRequest>, AppError> {
    let ride = state
        .rides()?
        .pickup(&RideId(id), &UserId(payload.driver_id))?;
    Ok(Json(ride))
}

async fn complete_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CompleteRideRequest>,
) -> Result<Json<RideRequest>, AppError> {
    let mut rides = state.rides()?;
    let mut wallet = state
        .wallets
        .get_mut(&payload.wallet_id)
        .ok_or_else(|| wallet_not_found(&payload.wallet_id))?;

    let ride = rides.complete(&RideId(id), &UserId(payload.driver_id), &mut *wallet)?;
    Ok(Json(ride))
}

async fn generate_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, AppError> {
    let receipt = state.rides()?.generate_receipt(&RideId(id))?;
    Ok(Json(receipt))
}

async fn get_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, AppError> {
    let rides = state.rides()?;
    let receipt = rides.receipt(&RideId(id))?;
    Ok(Json(receipt.clone()))
}
