// crates/rocket-ledger/src/events.rs
//
// Journal entries emitted by every successful desk operation.

use std::fmt;

use serde::{Deserialize, Serialize};

use rocket_core::{format_units, Address, Amount, AssetId, Timestamp};

/// Events a desk keeps by default; older entries are dropped first.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1_000;

/// A state change recorded by the desk, stamped with the operation's clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    Allocated {
        operator: Address,
        market: AssetId,
        amount: Amount,
        at: Timestamp,
    },
    Deallocated {
        operator: Address,
        market: AssetId,
        amount: Amount,
        at: Timestamp,
    },
    Deposited {
        buyer: Address,
        market: AssetId,
        principal_amount: Amount,
        price: Amount,
        treasury: Address,
        matures_at: Timestamp,
        at: Timestamp,
    },
    Harvested {
        buyer: Address,
        market: AssetId,
        principal_amount: Amount,
        at: Timestamp,
    },
}

impl LedgerEvent {
    /// Timestamp of the operation that produced the event.
    pub fn at(&self) -> Timestamp {
        match self {
            LedgerEvent::Allocated { at, .. }
            | LedgerEvent::Deallocated { at, .. }
            | LedgerEvent::Deposited { at, .. }
            | LedgerEvent::Harvested { at, .. } => *at,
        }
    }

    /// Short lowercase name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::Allocated { .. } => "allocated",
            LedgerEvent::Deallocated { .. } => "deallocated",
            LedgerEvent::Deposited { .. } => "deposited",
            LedgerEvent::Harvested { .. } => "harvested",
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::Allocated {
                operator,
                market,
                amount,
                ..
            } => write!(
                f,
                "{} allocated {} principal to market {}",
                operator,
                format_units(*amount),
                market
            ),
            LedgerEvent::Deallocated {
                operator,
                market,
                amount,
                ..
            } => write!(
                f,
                "{} deallocated {} principal from market {}",
                operator,
                format_units(*amount),
                market
            ),
            LedgerEvent::Deposited {
                buyer,
                market,
                principal_amount,
                price,
                matures_at,
                ..
            } => write!(
                f,
                "{} bought {} principal for {} in market {}, matures at {}",
                buyer,
                format_units(*principal_amount),
                format_units(*price),
                market,
                matures_at
            ),
            LedgerEvent::Harvested {
                buyer,
                principal_amount,
                ..
            } => write!(
                f,
                "{} harvested {} principal",
                buyer,
                format_units(*principal_amount)
            ),
        }
    }
}
