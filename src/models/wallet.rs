use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::settlement::{Payer, SettlementError};
use crate::models::payment::PaymentMethod;

/// In-memory balance holder standing in for a payment provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub name: String,
    pub method: PaymentMethod,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        method: PaymentMethod,
        balance: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            method,
            balance,
            created_at: Utc::now(),
        }
    }
}

impl Payer for Wallet {
    fn id(&self) -> &str {
        &self.id
    }

    fn method(&self) -> PaymentMethod {
        self.method
    }

    fn has_sufficient_balance(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    fn debit(&mut self, amount: Decimal) -> Result<(), SettlementError> {
        if !self.has_sufficient_balance(amount) {
            return Err(SettlementError::InsufficientBalance {
                available: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::Wallet;
    use crate::engine::settlement::{Payer, SettlementError};
    use crate::models::payment::PaymentMethod;

    #[test]
    fn debit_reduces_balance() {
        let mut wallet = Wallet::new("WA-1", "Stripe", PaymentMethod::CreditCard, dec!(10));
        wallet.debit(dec!(5.5)).unwrap();
        assert_eq!(wallet.balance, dec!(4.5));
    }

    #[test]
    fn overdraft_is_refused_and_balance_untouched() {
        let mut wallet = Wallet::new("WA-1", "PayPal", PaymentMethod::Paypal, dec!(3));
        let err = wallet.debit(dec!(5)).unwrap_err();
        assert!(matches!(err, SettlementError::InsufficientBalance { .. }));
        assert_eq!(wallet.balance, dec!(3));
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let wallet = Wallet::new("WA-1", "Crypto", PaymentMethod::Crypto, dec!(5.5));
        assert!(wallet.has_sufficient_balance(dec!(5.5)));
        assert!(!wallet.has_sufficient_balance(dec!(5.51)));
    }
}
