use thiserror::Error;

use crate::types::{Address, Amount, AssetId, Timestamp};

/// Desk-wide error types for the Rocket bond desk.
///
/// Every variant aborts the triggering operation with no state change.
#[derive(Debug, Error)]
pub enum RocketError {
    /// Zero amount, unparseable amount, or a quote that floors to zero.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Deallocation or deposit exceeds the principal still available in a market.
    #[error("Insufficient allocation in market {market}: requested {requested}, available {available}")]
    InsufficientAllocation {
        market: AssetId,
        requested: Amount,
        available: Amount,
    },

    /// The quoted price is above the buyer's ceiling.
    #[error("Max price exceeded: quoted {price}, max {max_price}")]
    MaxPriceExceeded { price: Amount, max_price: Amount },

    /// Harvest with nothing pending for the caller.
    #[error("No order for {buyer}")]
    NoOrder { buyer: Address },

    /// Harvest before the order's lock has elapsed.
    #[error("Order not matured: matures at {matures_at}, now {now}")]
    NotMatured { matures_at: Timestamp, now: Timestamp },

    /// Deposit while the buyer already holds an unsettled order.
    #[error("Order already pending for {buyer}")]
    OrderAlreadyPending { buyer: Address },

    /// The asset transfer collaborator rejected a move.
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// A collaborator returned a zero divisor (discount denominator or market value).
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Checked 256-bit arithmetic overflowed.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// The price oracle could not value an asset.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing storage error (state file IO, poisoned locks).
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for RocketError {
    fn from(e: serde_json::Error) -> Self {
        RocketError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for RocketError {
    fn from(e: std::io::Error) -> Self {
        RocketError::Storage(e.to_string())
    }
}
