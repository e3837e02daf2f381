//! Protocol fee calculation
//!
//! The claim fee is a fixed fraction of each escrowed amount, rounded down.
//! The remainder is the net payout to the claimant.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default claim fee: 1%.
pub const DEFAULT_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Split of one escrowed amount into protocol fee and net payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub fee: u64,
    pub net: u64,
}

/// Fixed-rate fee policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeePolicy {
    /// Fraction of the amount retained as fee, in `[0, 1)`
    pub rate: Decimal,
}

impl FeePolicy {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    /// Whether the rate lies in `[0, 1)`.
    pub fn is_valid(&self) -> bool {
        self.rate >= Decimal::ZERO && self.rate < Decimal::ONE
    }

    /// Fee for `amount`, rounded down. `None` on arithmetic overflow.
    pub fn fee_for(&self, amount: u64) -> Option<u64> {
        Decimal::from(amount)
            .checked_mul(self.rate)?
            .floor()
            .to_u64()
    }

    /// Fee and net payout for `amount`. `None` on arithmetic overflow or
    /// when the fee would exceed the amount.
    pub fn split(&self, amount: u64) -> Option<FeeSplit> {
        let fee = self.fee_for(amount)?;
        let net = amount.checked_sub(fee)?;
        Some(FeeSplit { fee, net })
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_RATE)
    }
}
