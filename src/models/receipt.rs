use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::models::ride::{RideId, RideRequest};

const TAX_RATE: Decimal = dec!(0.10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub ride_id: RideId,
    pub fare: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    pub fn for_ride(ride: &RideRequest, payment: Option<&Payment>) -> Self {
        let fare = ride.estimated_fare;
        let taxes = (fare * TAX_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Self {
            id: format!("RECEIPT_{}", ride.id),
            ride_id: ride.id.clone(),
            fare,
            taxes,
            total: fare + taxes,
            payment_method: payment.map(|payment| payment.method),
            payment_status: payment.map_or(PaymentStatus::Pending, |payment| payment.status),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::Receipt;
    use crate::models::payment::PaymentStatus;
    use crate::models::ride::{RideId, RideRequest};
    use crate::models::user::UserId;

    #[test]
    fn unpaid_ride_gets_pending_receipt_with_tax() {
        let ride = RideRequest::new(
            RideId::sequence(7),
            UserId("PA-0000000001".to_string()),
            "A".parse().unwrap(),
            "D".parse().unwrap(),
            dec!(5.5),
        );

        let receipt = Receipt::for_ride(&ride, None);

        assert_eq!(receipt.id, "RECEIPT_RIDE_7");
        assert_eq!(receipt.taxes, dec!(0.55));
        assert_eq!(receipt.total, dec!(6.05));
        assert_eq!(receipt.payment_status, PaymentStatus::Pending);
        assert!(receipt.payment_method.is_none());
    }
}
