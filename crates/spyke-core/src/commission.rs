//! # Commission Offers
//!
//! The platform proposes a revenue split; the seller must accept one before
//! any product can be listed.
//!
//! ```text
//!              counter(rate)            accept_counter()
//!  ┌─────────┐ ───────────► ┌───────────┐ ──────────────► ┌──────────┐
//!  │ Pending │              │ Countered │                 │ Accepted │
//!  └─────────┘ ◄─────────── └───────────┘                 └──────────┘
//!     │  │      counter(rate)     │                            ▲
//!     │  └────── accept() ────────┼────────────────────────────┘
//!     │                           │
//!     └────── reject() ───────────┴──────────► Rejected
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::validate_commission_rate_bps;

/// Where the negotiation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CommissionStatus {
    /// Offer sent, waiting for the seller.
    Pending,
    /// Seller proposed a different rate, waiting for the platform.
    Countered {
        #[serde(rename = "rateBps")]
        rate_bps: u32,
    },
    Accepted,
    Rejected,
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommissionStatus::Pending => write!(f, "pending"),
            CommissionStatus::Countered { rate_bps } => write!(f, "countered at {} bps", rate_bps),
            CommissionStatus::Accepted => write!(f, "accepted"),
            CommissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A platform commission offer for one seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommissionOffer {
    pub id: String,

    /// Platform share in basis points (1500 = 15%).
    pub rate_bps: u32,

    pub status: CommissionStatus,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CommissionOffer {
    /// Creates a pending offer.
    pub fn new(id: impl Into<String>, rate_bps: u32) -> CoreResult<Self> {
        validate_commission_rate_bps(rate_bps)?;
        Ok(CommissionOffer {
            id: id.into(),
            rate_bps,
            status: CommissionStatus::Pending,
            updated_at: Utc::now(),
        })
    }

    /// Seller accepts the current rate.
    pub fn accept(&mut self) -> CoreResult<()> {
        self.require_open("accept")?;
        self.set_status(CommissionStatus::Accepted);
        Ok(())
    }

    /// Seller declines the offer; terminal.
    pub fn reject(&mut self) -> CoreResult<()> {
        self.require_open("reject")?;
        self.set_status(CommissionStatus::Rejected);
        Ok(())
    }

    /// Seller proposes `rate_bps` instead.
    pub fn counter(&mut self, rate_bps: u32) -> CoreResult<()> {
        self.require_open("counter")?;
        validate_commission_rate_bps(rate_bps)?;
        self.set_status(CommissionStatus::Countered { rate_bps });
        Ok(())
    }

    /// Platform agrees to the seller's counter rate.
    pub fn accept_counter(&mut self) -> CoreResult<()> {
        match self.status {
            CommissionStatus::Countered { rate_bps } => {
                self.rate_bps = rate_bps;
                self.set_status(CommissionStatus::Accepted);
                Ok(())
            }
            status => Err(CoreError::InvalidCommissionTransition {
                action: "accept counter on",
                status,
            }),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == CommissionStatus::Accepted
    }

    /// Gate used before listing products.
    pub fn ensure_accepted(&self) -> CoreResult<()> {
        if self.is_accepted() {
            Ok(())
        } else {
            Err(CoreError::CommissionNotAccepted {
                status: self.status,
            })
        }
    }

    /// Platform share of `amount`, rounded half up to the cent.
    pub fn platform_fee(&self, amount: Money) -> Money {
        let fee = (i128::from(amount.cents()) * i128::from(self.rate_bps) + 5000) / 10_000;
        Money::from_cents(fee as i64)
    }

    /// What the seller keeps from `amount`.
    pub fn seller_payout(&self, amount: Money) -> Money {
        amount - self.platform_fee(amount)
    }

    fn require_open(&self, action: &'static str) -> CoreResult<()> {
        match self.status {
            CommissionStatus::Pending | CommissionStatus::Countered { .. } => Ok(()),
            status => Err(CoreError::InvalidCommissionTransition { action, status }),
        }
    }

    fn set_status(&mut self, status: CommissionStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_pending() {
        let mut offer = CommissionOffer::new("c1", 1500).unwrap();
        assert!(offer.ensure_accepted().is_err());

        offer.accept().unwrap();
        assert!(offer.is_accepted());
        assert!(offer.ensure_accepted().is_ok());
    }

    #[test]
    fn test_counter_then_platform_accepts() {
        let mut offer = CommissionOffer::new("c1", 2000).unwrap();
        offer.counter(1200).unwrap();
        assert_eq!(offer.status, CommissionStatus::Countered { rate_bps: 1200 });
        assert_eq!(offer.rate_bps, 2000);

        offer.accept_counter().unwrap();
        assert_eq!(offer.rate_bps, 1200);
        assert!(offer.is_accepted());
    }

    #[test]
    fn test_closed_offers_reject_transitions() {
        let mut offer = CommissionOffer::new("c1", 1500).unwrap();
        offer.reject().unwrap();

        assert!(matches!(
            offer.accept(),
            Err(CoreError::InvalidCommissionTransition { .. })
        ));
        assert!(offer.counter(1000).is_err());
        assert!(matches!(
            offer.ensure_accepted(),
            Err(CoreError::CommissionNotAccepted {
                status: CommissionStatus::Rejected
            })
        ));
    }

    #[test]
    fn test_accept_counter_requires_counter() {
        let mut offer = CommissionOffer::new("c1", 1500).unwrap();
        let err = offer.accept_counter().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot accept counter on a commission offer that is pending"
        );
    }

    #[test]
    fn test_rate_bounds() {
        assert!(CommissionOffer::new("c1", 10_001).is_err());
        let mut offer = CommissionOffer::new("c1", 1500).unwrap();
        assert!(offer.counter(20_000).is_err());
        assert_eq!(offer.status, CommissionStatus::Pending);
    }

    #[test]
    fn test_fee_split() {
        let offer = CommissionOffer::new("c1", 1500).unwrap();
        let sale = Money::from_cents(4999);

        assert_eq!(offer.platform_fee(sale).cents(), 750);
        assert_eq!(offer.seller_payout(sale).cents(), 4249);
    }

    #[test]
    fn test_status_json() {
        let json = serde_json::to_value(CommissionStatus::Countered { rate_bps: 1200 }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "countered", "rateBps": 1200}));
    }
}
