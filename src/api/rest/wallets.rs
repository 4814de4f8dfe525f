use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::engine::ids::random_id;
use crate::error::AppError;
use crate::models::payment::PaymentMethod;
use crate::models::wallet::Wallet;
use crate::state::AppState;

const WALLET_PREFIX: &str = "WA";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets", post(create_wallet))
        .route("/wallets/:id", get(get_wallet))
}

#[derive(Deserialize)]
pub struct CreateWalletRequest {
    pub name: String,
    pub method: PaymentMethod,
    pub balance: Decimal,
}

async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWalletRequest>,
) -> Result<Json<Wallet>, AppError> {
    if payload.balance < Decimal::ZERO {
        return Err(AppError::BadRequest("balance must be >= 0".to_string()));
    }

    let mut rng = rand::thread_rng();
    loop {
        let id = random_id(WALLET_PREFIX, &mut rng);
        if let Entry::Vacant(slot) = state.wallets.entry(id.clone()) {
            let wallet = Wallet::new(id, payload.name, payload.method, payload.balance);
            slot.insert(wallet.clone());
            return Ok(Json(wallet));
        }
    }
}

async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Wallet>, AppError> {
    let wallet = state.wallets.get(&id).ok_or_else(|| wallet_not_found(&id))?;
    Ok(Json(wallet.value().clone()))
}

pub fn wallet_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("wallet {id} not found"))
}
