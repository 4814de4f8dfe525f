use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::payment::PaymentMethod;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    #[error("payer unavailable: {0}")]
    Unavailable(String),
}

/// Balance capability of whoever pays for a ride.
///
/// Consulted once when the ride is requested and debited once when it completes.
/// Implementations must leave the balance untouched when `debit` fails.
pub trait Payer: Send + Sync {
    fn id(&self) -> &str;
    fn method(&self) -> PaymentMethod;
    fn has_sufficient_balance(&self, amount: Decimal) -> bool;
    fn debit(&mut self, amount: Decimal) -> Result<(), SettlementError>;
}
