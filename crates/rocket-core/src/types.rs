// crates/rocket-core/src/types.rs
//
// Primitive value types shared across the workspace.
//
// Parties and assets are both identified by 20-byte EVM-style addresses; an
// asset is named by its token address. Amounts are unsigned 256-bit integers
// in base units (see `units`).

use serde::{Deserialize, Serialize};

pub use alloy_primitives::Address;

use crate::error::RocketError;

/// Token address identifying an asset (principal asset or market currency).
pub type AssetId = Address;

/// Amount in base units (18 decimals).
pub type Amount = alloy_primitives::U256;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fixed lock between purchase and release of principal: 21 days.
pub const LOCK_DURATION_SECS: u64 = 21 * SECONDS_PER_DAY;

/// Reference currency in which the oracle values both sides of a quote.
pub const DEFAULT_REFERENCE_CURRENCY: &str = "USD";

/// Multiplier returned by a discount curve, applied as `value * numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub numerator: Amount,
    pub denominator: Amount,
}

impl Discount {
    /// Build a discount from plain integers, e.g. `Discount::new(9, 10)` for 10% off.
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator: Amount::from(numerator),
            denominator: Amount::from(denominator),
        }
    }

    /// The identity multiplier (no discount).
    pub fn none() -> Self {
        Self::new(1, 1)
    }

    /// Reject a zero denominator. Curves are trusted otherwise.
    pub fn validate(&self) -> Result<(), RocketError> {
        if self.denominator.is_zero() {
            return Err(RocketError::DivisionByZero(
                "discount curve returned a zero denominator".to_string(),
            ));
        }
        Ok(())
    }
}
